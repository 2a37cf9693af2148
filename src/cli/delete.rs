use colored::Colorize;

use super::{open_backend, prompt};
use crate::editor::{delete_record, EditSession};
use crate::error::{FuelError, Result};
use crate::history::{fetch_history, render_history};
use crate::models::RecordId;

pub fn run(id: &str, yes: bool) -> Result<()> {
    let backend = open_backend()?;
    let session = EditSession::default();
    let view = render_history(&Ok(fetch_history(backend.as_ref())?), &session);
    let id = RecordId::from(id);
    let row = view
        .row(&id)
        .filter(|r| r.is_editable())
        .ok_or_else(|| FuelError::NotEditable(id.to_string()))?;

    if !yes {
        let answer = prompt(&format!("Delete record {id}? This cannot be undone. (y/n) "))?;
        if !answer.eq_ignore_ascii_case("y") {
            println!("Cancelled.");
            return Ok(());
        }
    }

    delete_record(backend.as_ref(), &session, row)?;
    println!("{} record {id}", "Deleted".green());
    Ok(())
}
