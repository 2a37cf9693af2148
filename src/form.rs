use chrono::Local;
use tracing::{error, info};

use crate::backend::Backend;
use crate::error::{FuelError, Result};
use crate::models::{Column, NewRecord};
use crate::normalize::{normalize_entry, EntryInput, ValidationErrors};
use crate::router::View;

/// Today's local date as `YYYY-MM-DD`.
pub fn today() -> String {
    Local::now().format("%Y-%m-%d").to_string()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Odometer,
    Date,
    Liters,
    Price,
}

impl FormField {
    pub const ORDER: [FormField; 4] = [FormField::Odometer, FormField::Date, FormField::Liters, FormField::Price];

    pub fn label(self) -> &'static str {
        match self {
            FormField::Odometer => "Km",
            FormField::Date => "Date",
            FormField::Liters => "Liters",
            FormField::Price => "Price / liter",
        }
    }

    pub fn column(self) -> Column {
        match self {
            FormField::Odometer => Column::TaskName,
            FormField::Date => Column::TaskDate,
            FormField::Liters => Column::Litros,
            FormField::Price => Column::Precio,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SubmitOutcome {
    pub record: NewRecord,
    /// Set when the history panel is showing and must be refetched.
    pub reload_history: bool,
}

#[derive(Debug, Clone)]
pub struct EntryForm {
    pub input: EntryInput,
    focused: usize,
    errors: ValidationErrors,
}

impl EntryForm {
    pub fn new(today: &str) -> Self {
        Self {
            input: EntryInput {
                date: today.to_string(),
                ..EntryInput::default()
            },
            focused: 0,
            errors: ValidationErrors::default(),
        }
    }

    pub fn reset_date(&mut self, today: &str) {
        self.input.date = today.to_string();
    }

    pub fn focused(&self) -> FormField {
        FormField::ORDER[self.focused]
    }

    pub fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    pub fn value(&self, field: FormField) -> &str {
        match field {
            FormField::Odometer => &self.input.odometer,
            FormField::Date => &self.input.date,
            FormField::Liters => &self.input.liters,
            FormField::Price => &self.input.price,
        }
    }

    fn value_mut(&mut self, field: FormField) -> &mut String {
        match field {
            FormField::Odometer => &mut self.input.odometer,
            FormField::Date => &mut self.input.date,
            FormField::Liters => &mut self.input.liters,
            FormField::Price => &mut self.input.price,
        }
    }

    pub fn focus_next(&mut self) {
        self.focused = (self.focused + 1) % FormField::ORDER.len();
    }

    pub fn focus_prev(&mut self) {
        self.focused = (self.focused + FormField::ORDER.len() - 1) % FormField::ORDER.len();
    }

    pub fn push_char(&mut self, c: char) {
        let accepted = c.is_ascii_digit() || c == '.' || c == '-';
        if accepted {
            let field = self.focused();
            self.value_mut(field).push(c);
        }
    }

    pub fn backspace(&mut self) {
        let field = self.focused();
        self.value_mut(field).pop();
    }

    /// Normalize and insert the entry. Nothing is sent if validation fails.
    /// On success the form is cleared, the date set to `today` and focus
    /// returned to the km field; on any failure the typed values stay.
    pub fn submit(&mut self, backend: &dyn Backend, active: View, today: &str) -> Result<SubmitOutcome> {
        let record = match normalize_entry(&self.input) {
            Ok(record) => record,
            Err(errors) => {
                self.errors = errors.clone();
                return Err(FuelError::Validation(errors));
            }
        };
        self.errors = ValidationErrors::default();

        if let Err(e) = backend.insert(&record) {
            error!(error = %e, "failed to save fill-up");
            return Err(e);
        }
        info!(km = record.task_name, date = %record.task_date, "fill-up saved");

        *self = EntryForm::new(today);
        Ok(SubmitOutcome {
            record,
            reload_history: active == View::History,
        })
    }
}
