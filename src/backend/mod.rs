//! The data backend: a remote-style table with four generic operations.
//! Everything above this layer only sees [`Backend`].

#[cfg(feature = "rest")]
pub mod rest;
pub mod sqlite;

use crate::error::{FuelError, Result};
use crate::models::{NewRecord, Record, RecordId, RecordPatch, SELECT_COLUMNS};
use crate::settings::{BackendKind, Settings};

/// Number of records fetched for the history view.
pub const ROWS_TO_SHOW: usize = 50;

#[derive(Debug, Clone, PartialEq)]
pub struct SelectQuery {
    pub columns: &'static [&'static str],
    pub order_by: &'static str,
    pub descending: bool,
    pub limit: usize,
}

impl SelectQuery {
    /// The history query: every column, newest first, at most `limit` rows.
    pub fn latest(limit: usize) -> Self {
        Self {
            columns: SELECT_COLUMNS,
            order_by: "created_at",
            descending: true,
            limit,
        }
    }

    pub(crate) fn check_columns(&self) -> Result<()> {
        for col in self.columns.iter().chain(std::iter::once(&self.order_by)) {
            if !SELECT_COLUMNS.contains(col) {
                return Err(FuelError::Backend(format!("Unknown column: {col}")));
            }
        }
        if !self.columns.contains(&"id") {
            return Err(FuelError::Backend("Query must select the id column".into()));
        }
        Ok(())
    }
}

/// Generic CRUD over the fuel table. Calls are blocking round trips; a
/// failure carries a human-readable message and is never retried here.
pub trait Backend {
    fn select(&self, query: &SelectQuery) -> Result<Vec<Record>>;
    fn insert(&self, record: &NewRecord) -> Result<()>;
    fn update(&self, id: &RecordId, patch: &RecordPatch) -> Result<()>;
    fn delete(&self, id: &RecordId) -> Result<()>;
    /// Short human description for status output.
    fn describe(&self) -> String;
}

/// Build the backend configured in `settings`.
pub fn open(settings: &Settings) -> Result<Box<dyn Backend>> {
    match settings.backend {
        BackendKind::Sqlite => {
            std::fs::create_dir_all(settings.data_dir_path())?;
            let backend = sqlite::SqliteBackend::open(&settings.db_path(), &settings.table)?;
            Ok(Box::new(backend))
        }
        #[cfg(feature = "rest")]
        BackendKind::Rest => {
            let url = settings
                .rest_url
                .as_deref()
                .filter(|u| !u.is_empty())
                .ok_or_else(|| FuelError::Settings("rest_url is not set. Run `fuelog init --rest-url ...`".into()))?;
            let key = settings
                .rest_key()
                .ok_or_else(|| FuelError::Settings("rest_key is not set (or FUELOG_REST_KEY)".into()))?;
            Ok(Box::new(rest::RestBackend::new(url, &settings.table, &key)?))
        }
        #[cfg(not(feature = "rest"))]
        BackendKind::Rest => Err(FuelError::Settings(
            "The hosted backend requires the 'rest' feature".into(),
        )),
    }
}
