//! Turns fetched records plus the current edit session into render
//! instructions. Presentation layers (the TUI table, the CLI table) only
//! consume [`HistoryView`]; nothing here touches the terminal.

use tracing::{debug, error};

use crate::backend::{Backend, SelectQuery, ROWS_TO_SHOW};
use crate::editor::EditSession;
use crate::error::Result;
use crate::fmt::{compute_total, format_date, format_decimal, format_odometer};
use crate::models::{Column, Record, RecordId};

/// Number of most recent records that may be edited or deleted.
pub const ROWS_TO_EDIT: usize = 5;

pub type FetchResult = Result<Vec<Record>>;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputKind {
    Date,
    Number { step: f64 },
}

impl InputKind {
    pub fn for_column(column: Column) -> Self {
        match column {
            Column::TaskDate => InputKind::Date,
            Column::TaskName | Column::Litros | Column::Precio => InputKind::Number { step: 0.001 },
        }
    }

    /// Whether a typed character can appear in this kind of input.
    pub fn accepts(self, c: char) -> bool {
        match self {
            InputKind::Date => c.is_ascii_digit() || c == '-',
            InputKind::Number { .. } => c.is_ascii_digit() || c == '.' || c == '-',
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct InputView {
    pub column: Column,
    pub kind: InputKind,
    pub value: String,
    pub required: bool,
    pub focused: bool,
    pub invalid: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CellView {
    Display { column: Column, text: String },
    Input(InputView),
}

impl CellView {
    pub fn column(&self) -> Column {
        match self {
            CellView::Display { column, .. } => *column,
            CellView::Input(input) => input.column,
        }
    }

    pub fn text(&self) -> &str {
        match self {
            CellView::Display { text, .. } => text,
            CellView::Input(input) => &input.value,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowActions {
    EditDelete,
    SaveCancel,
    ReadOnly,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RowView {
    pub id: RecordId,
    pub index: usize,
    /// Date, km, liters, price, in that order.
    pub cells: Vec<CellView>,
    /// Total cost, already formatted with its currency sign.
    pub total: String,
    pub actions: RowActions,
}

impl RowView {
    pub fn is_editable(&self) -> bool {
        self.index < ROWS_TO_EDIT
    }

    pub fn is_editing(&self) -> bool {
        self.actions == RowActions::SaveCancel
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum HistoryView {
    Rows(Vec<RowView>),
    /// Single placeholder row shown when the fetch failed.
    Error(String),
}

impl HistoryView {
    pub fn rows(&self) -> &[RowView] {
        match self {
            HistoryView::Rows(rows) => rows,
            HistoryView::Error(_) => &[],
        }
    }

    pub fn row(&self, id: &RecordId) -> Option<&RowView> {
        self.rows().iter().find(|r| &r.id == id)
    }
}

pub const LOAD_ERROR_MESSAGE: &str = "Could not load the history. Check the backend settings.";

/// Fetch the latest records, newest first. Failures are logged here and
/// handed to [`render_history`] as a value.
pub fn fetch_history(backend: &dyn Backend) -> FetchResult {
    let result = backend.select(&SelectQuery::latest(ROWS_TO_SHOW));
    match &result {
        Ok(records) => debug!(count = records.len(), "history loaded"),
        Err(e) => error!(error = %e, "failed to load history"),
    }
    result
}

fn display_cells(record: &Record) -> Vec<CellView> {
    vec![
        CellView::Display {
            column: Column::TaskDate,
            text: format_date(record.task_date.as_deref()),
        },
        CellView::Display {
            column: Column::TaskName,
            text: format_odometer(record.task_name),
        },
        CellView::Display {
            column: Column::Litros,
            text: format_decimal(record.litros),
        },
        CellView::Display {
            column: Column::Precio,
            text: format_decimal(record.precio),
        },
    ]
}

/// One row per record, in fetch order. The first [`ROWS_TO_EDIT`] rows get
/// edit/delete actions; the row held by `session` shows its inputs instead.
pub fn render_history(fetched: &FetchResult, session: &EditSession) -> HistoryView {
    let records = match fetched {
        Ok(records) => records,
        Err(_) => return HistoryView::Error(LOAD_ERROR_MESSAGE.to_string()),
    };

    let rows = records
        .iter()
        .enumerate()
        .map(|(index, record)| {
            let editable = index < ROWS_TO_EDIT;
            let draft = session.draft().filter(|d| editable && d.id() == &record.id);
            let (cells, actions) = match draft {
                Some(draft) => (draft.input_cells(), RowActions::SaveCancel),
                None if editable => (display_cells(record), RowActions::EditDelete),
                None => (display_cells(record), RowActions::ReadOnly),
            };
            RowView {
                id: record.id.clone(),
                index,
                cells,
                total: format!("${}", compute_total(record.litros, record.precio)),
                actions,
            }
        })
        .collect();
    HistoryView::Rows(rows)
}
