use colored::Colorize;

use super::open_backend;
use crate::editor::EditSession;
use crate::error::{FuelError, Result};
use crate::history::{fetch_history, render_history};
use crate::models::{Column, RecordId};

pub fn run(
    id: &str,
    km: Option<&str>,
    date: Option<&str>,
    liters: Option<&str>,
    price: Option<&str>,
) -> Result<()> {
    let changes: Vec<(Column, &str)> = [
        (Column::TaskName, km),
        (Column::TaskDate, date),
        (Column::Litros, liters),
        (Column::Precio, price),
    ]
    .into_iter()
    .filter_map(|(col, v)| v.map(|v| (col, v)))
    .collect();
    if changes.is_empty() {
        return Err(FuelError::Other(
            "Nothing to change. Pass --km, --date, --liters or --price.".into(),
        ));
    }

    let backend = open_backend()?;
    let mut session = EditSession::default();
    let view = render_history(&Ok(fetch_history(backend.as_ref())?), &session);
    let id = RecordId::from(id);
    let row = view
        .row(&id)
        .ok_or_else(|| FuelError::NotEditable(id.to_string()))?;

    session.toggle(row)?;
    if let Some(draft) = session.draft_mut() {
        for (column, value) in &changes {
            draft.set_value(*column, value);
        }
    }
    session.save(backend.as_ref())?;

    println!("{} record {id}", "Updated".green());
    Ok(())
}
