use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Columns read by the history view, in display order after `id`/`created_at`.
pub const SELECT_COLUMNS: &[&str] = &["id", "created_at", "task_date", "task_name", "litros", "precio"];

/// Backend-assigned identifier. Local rows use integer ids, hosted tables
/// may use bigints or UUIDs, so it is kept as opaque text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct RecordId(pub String);

impl RecordId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<i64> for RecordId {
    fn from(id: i64) -> Self {
        Self(id.to_string())
    }
}

impl From<&str> for RecordId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawScalar {
    Int(i64),
    Float(f64),
    Text(String),
}

impl<'de> Deserialize<'de> for RecordId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match RawScalar::deserialize(deserializer)? {
            RawScalar::Int(i) => Self(i.to_string()),
            RawScalar::Float(f) => Self(f.to_string()),
            RawScalar::Text(s) => Self(s),
        })
    }
}

// Hosted tables created by hand often store these as text or numeric, so
// numbers are accepted either way.
fn de_opt_i64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<i64>, D::Error> {
    Ok(match Option::<RawScalar>::deserialize(deserializer)? {
        Some(RawScalar::Int(i)) => Some(i),
        Some(RawScalar::Float(f)) if f.is_finite() => Some(f.trunc() as i64),
        Some(RawScalar::Text(s)) => s.trim().parse().ok(),
        _ => None,
    })
}

fn de_opt_f64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
    Ok(match Option::<RawScalar>::deserialize(deserializer)? {
        Some(RawScalar::Int(i)) => Some(i as f64),
        Some(RawScalar::Float(f)) => Some(f),
        Some(RawScalar::Text(s)) => s.trim().parse().ok(),
        None => None,
    })
}

/// One fuel purchase as stored by the backend.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Record {
    pub id: RecordId,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub task_date: Option<String>,
    /// Odometer reading in km.
    #[serde(default, deserialize_with = "de_opt_i64")]
    pub task_name: Option<i64>,
    #[serde(default, deserialize_with = "de_opt_f64")]
    pub litros: Option<f64>,
    #[serde(default, deserialize_with = "de_opt_f64")]
    pub precio: Option<f64>,
}

/// A normalized record ready to insert; `id` and `created_at` are left to the backend.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewRecord {
    pub task_date: String,
    pub task_name: i64,
    pub litros: f64,
    pub precio: f64,
}

/// Normalized partial update. Absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RecordPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task_name: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub litros: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub precio: Option<f64>,
}

impl RecordPatch {
    pub fn is_empty(&self) -> bool {
        self.task_date.is_none()
            && self.task_name.is_none()
            && self.litros.is_none()
            && self.precio.is_none()
    }
}

/// The user-editable columns of a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    TaskDate,
    TaskName,
    Litros,
    Precio,
}

impl Column {
    pub fn as_str(self) -> &'static str {
        match self {
            Column::TaskDate => "task_date",
            Column::TaskName => "task_name",
            Column::Litros => "litros",
            Column::Precio => "precio",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Column::TaskDate => "Date",
            Column::TaskName => "Km",
            Column::Litros => "Liters",
            Column::Precio => "Price",
        }
    }
}
