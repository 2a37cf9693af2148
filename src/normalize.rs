//! Parsing and rounding rules applied to user input before anything is
//! persisted. Shared by the entry form, the inline editor and the CLI.

use std::fmt;

use crate::models::{Column, NewRecord, RecordPatch};

/// A single field that failed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldError {
    pub column: Column,
    pub message: String,
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.column.label(), self.message)
    }
}

/// Every failing field of one submission, in field order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ValidationErrors(pub Vec<FieldError>);

impl ValidationErrors {
    pub fn fields(&self) -> &[FieldError] {
        &self.0
    }

    pub fn has(&self, column: Column) -> bool {
        self.0.iter().any(|e| e.column == column)
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0.iter().map(|e| e.to_string()).collect();
        f.write_str(&parts.join("; "))
    }
}

impl std::error::Error for ValidationErrors {}

/// Raw text of the four entry fields, as typed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntryInput {
    pub odometer: String,
    pub date: String,
    pub liters: String,
    pub price: String,
}

/// Parse a decimal and round it to 3 places, half away from zero.
///
/// Plain decimal text is rounded on its digits so ties like `1.5555` are
/// decided by what the user typed rather than by the nearest binary float.
/// Exponent notation falls back to float rounding.
pub fn round3(raw: &str) -> Option<f64> {
    let raw = raw.trim();
    let value: f64 = raw.parse().ok()?;
    if !value.is_finite() {
        return None;
    }
    Some(round_decimal_text(raw).unwrap_or_else(|| (value * 1000.0).round() / 1000.0))
}

fn round_decimal_text(raw: &str) -> Option<f64> {
    let (negative, unsigned) = match raw.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, raw.strip_prefix('+').unwrap_or(raw)),
    };
    let (int_part, frac_part) = unsigned.split_once('.').unwrap_or((unsigned, ""));
    let is_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
    if !is_digits(int_part) || !is_digits(frac_part) || (int_part.is_empty() && frac_part.is_empty()) {
        return None;
    }

    let kept: String = frac_part.chars().chain(std::iter::repeat('0')).take(3).collect();
    let mut scaled: u128 = format!("{int_part}{kept}").parse().ok()?;
    if frac_part.as_bytes().get(3).is_some_and(|d| *d >= b'5') {
        scaled = scaled.checked_add(1)?;
    }

    let magnitude = scaled as f64 / 1000.0;
    Some(if negative { -magnitude } else { magnitude })
}

/// Liters and price: a number > 0 after rounding to 3 places.
pub fn parse_positive_decimal(column: Column, raw: &str) -> Result<f64, FieldError> {
    match round3(raw) {
        Some(v) if v > 0.0 => Ok(v),
        _ => Err(FieldError {
            column,
            message: "must be a positive number".to_string(),
        }),
    }
}

/// Odometer: a non-negative integer. A fractional part is dropped, the way
/// the numeric input's integer parse reads it.
pub fn parse_odometer(raw: &str) -> Result<i64, FieldError> {
    let raw = raw.trim();
    let parsed = raw.parse::<i64>().ok().or_else(|| {
        raw.parse::<f64>()
            .ok()
            .filter(|f| f.is_finite() && f.abs() < i64::MAX as f64)
            .map(|f| f.trunc() as i64)
    });
    match parsed {
        Some(km) if km >= 0 => Ok(km),
        _ => Err(FieldError {
            column: Column::TaskName,
            message: "must be a non-negative whole number".to_string(),
        }),
    }
}

/// Date: required, otherwise taken as given.
pub fn require_date(raw: &str) -> Result<String, FieldError> {
    let raw = raw.trim();
    if raw.is_empty() {
        Err(FieldError {
            column: Column::TaskDate,
            message: "is required".to_string(),
        })
    } else {
        Ok(raw.to_string())
    }
}

fn take<T>(result: Result<T, FieldError>, errors: &mut Vec<FieldError>) -> Option<T> {
    result.map_err(|e| errors.push(e)).ok()
}

pub fn normalize_entry(input: &EntryInput) -> Result<NewRecord, ValidationErrors> {
    let mut errors = Vec::new();
    let task_name = take(parse_odometer(&input.odometer), &mut errors);
    let task_date = take(require_date(&input.date), &mut errors);
    let litros = take(parse_positive_decimal(Column::Litros, &input.liters), &mut errors);
    let precio = take(parse_positive_decimal(Column::Precio, &input.price), &mut errors);

    match (task_date, task_name, litros, precio) {
        (Some(task_date), Some(task_name), Some(litros), Some(precio)) => Ok(NewRecord {
            task_date,
            task_name,
            litros,
            precio,
        }),
        _ => Err(ValidationErrors(errors)),
    }
}

/// Validate the edited inputs of one row. Every column present is checked,
/// and all failures are reported together.
pub fn normalize_patch(inputs: &[(Column, &str)]) -> Result<RecordPatch, ValidationErrors> {
    let mut errors = Vec::new();
    let mut patch = RecordPatch::default();
    for &(column, raw) in inputs {
        match column {
            Column::TaskDate => patch.task_date = take(require_date(raw), &mut errors),
            Column::TaskName => patch.task_name = take(parse_odometer(raw), &mut errors),
            Column::Litros => patch.litros = take(parse_positive_decimal(column, raw), &mut errors),
            Column::Precio => patch.precio = take(parse_positive_decimal(column, raw), &mut errors),
        }
    }
    if errors.is_empty() {
        Ok(patch)
    } else {
        Err(ValidationErrors(errors))
    }
}
