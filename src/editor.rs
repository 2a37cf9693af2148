//! Inline editing of history rows.
//!
//! [`EditSession`] is the single slot that owns the one row allowed to be in
//! edit mode. Every transition goes through it; a second row can only be
//! edited once the slot is released by save, cancel or toggle.

use tracing::{error, info};

use crate::backend::Backend;
use crate::error::{FuelError, Result};
use crate::history::{CellView, InputKind, InputView, RowView};
use crate::models::{Column, RecordId};
use crate::normalize::{normalize_patch, ValidationErrors};

pub const ALREADY_EDITING_MESSAGE: &str = "Save or cancel the record being edited first.";

/// What the caller must do after a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditTransition {
    Editing(RecordId),
    /// Back to viewing. When `reload` is set the history must be refetched
    /// and re-rendered from the backend.
    Viewing { reload: bool },
}

#[derive(Debug, Clone, PartialEq)]
struct DraftInput {
    column: Column,
    kind: InputKind,
    value: String,
}

/// The in-progress edit of one row.
#[derive(Debug, Clone, PartialEq)]
pub struct EditDraft {
    id: RecordId,
    inputs: Vec<DraftInput>,
    focused: usize,
    errors: ValidationErrors,
}

impl EditDraft {
    fn from_row(row: &RowView) -> Self {
        let inputs = row
            .cells
            .iter()
            .map(|cell| {
                let column = cell.column();
                let value = match (column, cell.text()) {
                    // "-" stands for a stored km of 0 (or none)
                    (Column::TaskName, "-") => "0".to_string(),
                    (_, "-") => String::new(),
                    (_, text) => text.to_string(),
                };
                DraftInput {
                    column,
                    kind: InputKind::for_column(column),
                    value,
                }
            })
            .collect();
        Self {
            id: row.id.clone(),
            inputs,
            focused: 0,
            errors: ValidationErrors::default(),
        }
    }

    pub fn id(&self) -> &RecordId {
        &self.id
    }

    pub fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    pub fn value(&self, column: Column) -> Option<&str> {
        self.inputs
            .iter()
            .find(|i| i.column == column)
            .map(|i| i.value.as_str())
    }

    pub fn set_value(&mut self, column: Column, value: &str) {
        if let Some(input) = self.inputs.iter_mut().find(|i| i.column == column) {
            input.value = value.to_string();
        }
    }

    pub fn focused_column(&self) -> Option<Column> {
        self.inputs.get(self.focused).map(|i| i.column)
    }

    pub fn focus_next(&mut self) {
        if !self.inputs.is_empty() {
            self.focused = (self.focused + 1) % self.inputs.len();
        }
    }

    pub fn focus_prev(&mut self) {
        if !self.inputs.is_empty() {
            self.focused = (self.focused + self.inputs.len() - 1) % self.inputs.len();
        }
    }

    pub fn push_char(&mut self, c: char) {
        if let Some(input) = self.inputs.get_mut(self.focused) {
            if input.kind.accepts(c) {
                input.value.push(c);
            }
        }
    }

    pub fn backspace(&mut self) {
        if let Some(input) = self.inputs.get_mut(self.focused) {
            input.value.pop();
        }
    }

    pub(crate) fn input_cells(&self) -> Vec<CellView> {
        self.inputs
            .iter()
            .enumerate()
            .map(|(i, input)| {
                CellView::Input(InputView {
                    column: input.column,
                    kind: input.kind,
                    value: input.value.clone(),
                    required: true,
                    focused: i == self.focused,
                    invalid: self.errors.has(input.column),
                })
            })
            .collect()
    }
}

#[derive(Debug, Default)]
pub struct EditSession {
    draft: Option<EditDraft>,
}

impl EditSession {
    pub fn draft(&self) -> Option<&EditDraft> {
        self.draft.as_ref()
    }

    pub fn draft_mut(&mut self) -> Option<&mut EditDraft> {
        self.draft.as_mut()
    }

    pub fn editing_id(&self) -> Option<&RecordId> {
        self.draft.as_ref().map(|d| &d.id)
    }

    pub fn is_editing(&self) -> bool {
        self.draft.is_some()
    }

    /// The edit action on `row`: start editing it, stop editing it if it is
    /// already the active row, or refuse while another row holds the slot.
    pub fn toggle(&mut self, row: &RowView) -> Result<EditTransition> {
        match &self.draft {
            Some(draft) if draft.id == row.id => {
                self.draft = None;
                Ok(EditTransition::Viewing { reload: true })
            }
            Some(_) => Err(FuelError::EditRejected(ALREADY_EDITING_MESSAGE.to_string())),
            None if !row.is_editable() => Err(FuelError::NotEditable(row.id.to_string())),
            None => {
                self.draft = Some(EditDraft::from_row(row));
                Ok(EditTransition::Editing(row.id.clone()))
            }
        }
    }

    /// Drop the edits. The history is reloaded so the row shows what the
    /// backend actually holds.
    pub fn cancel(&mut self) -> EditTransition {
        self.draft = None;
        EditTransition::Viewing { reload: true }
    }

    /// Validate and persist the active draft. On any failure the row stays
    /// in edit mode and nothing already typed is lost.
    pub fn save(&mut self, backend: &dyn Backend) -> Result<EditTransition> {
        let draft = self
            .draft
            .as_mut()
            .ok_or_else(|| FuelError::Other("No record is being edited".into()))?;

        let inputs: Vec<(Column, &str)> = draft
            .inputs
            .iter()
            .map(|i| (i.column, i.value.as_str()))
            .collect();
        let patch = match normalize_patch(&inputs) {
            Ok(patch) => patch,
            Err(errors) => {
                draft.errors = errors.clone();
                return Err(FuelError::Validation(errors));
            }
        };
        draft.errors = ValidationErrors::default();

        if let Err(e) = backend.update(&draft.id, &patch) {
            error!(id = %draft.id, error = %e, "failed to update record");
            return Err(e);
        }
        info!(id = %draft.id, "record updated");
        self.draft = None;
        Ok(EditTransition::Viewing { reload: true })
    }

    /// Release the slot if its row is no longer among the editable rows of
    /// a fresh render (deleted elsewhere, or pushed out by newer records).
    pub fn retain_visible(&mut self, rows: &[RowView]) -> bool {
        let keep = match &self.draft {
            Some(draft) => rows.iter().any(|r| r.id == draft.id && r.is_editable()),
            None => true,
        };
        if !keep {
            self.draft = None;
        }
        keep
    }
}

/// Delete one of the editable rows. The caller is responsible for having
/// asked the user to confirm.
pub fn delete_record(backend: &dyn Backend, session: &EditSession, row: &RowView) -> Result<()> {
    if !row.is_editable() {
        return Err(FuelError::NotEditable(row.id.to_string()));
    }
    if session.is_editing() {
        return Err(FuelError::EditRejected(ALREADY_EDITING_MESSAGE.to_string()));
    }
    match backend.delete(&row.id) {
        Ok(()) => {
            info!(id = %row.id, "record deleted");
            Ok(())
        }
        Err(e) => {
            error!(id = %row.id, error = %e, "failed to delete record");
            Err(e)
        }
    }
}
