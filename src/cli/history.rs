use colored::Colorize;
use comfy_table::{Cell, CellAlignment, Table};

use super::open_backend;
use crate::editor::EditSession;
use crate::error::Result;
use crate::history::{fetch_history, render_history, HistoryView, RowActions, LOAD_ERROR_MESSAGE};

pub fn run(limit: usize) -> Result<()> {
    let backend = open_backend()?;
    let records = match fetch_history(backend.as_ref()) {
        Ok(records) => records,
        Err(e) => {
            println!("{}", LOAD_ERROR_MESSAGE.red());
            return Err(e);
        }
    };
    let view = render_history(&Ok(records), &EditSession::default());
    print!("{}", history_table(&view, limit));
    Ok(())
}

/// Render the history as a text table. Shows at most `limit` rows.
pub fn history_table(view: &HistoryView, limit: usize) -> String {
    let rows = view.rows();
    if rows.is_empty() {
        return "No fill-ups yet. Add one with: fuelog add --km <km> --liters <l> --price <p>\n".to_string();
    }

    let mut table = Table::new();
    table.set_header(vec!["ID", "Date", "Km", "Liters", "Price", "Total", "Actions"]);
    for row in rows.iter().take(limit) {
        let mut cells = vec![Cell::new(&row.id)];
        for cell in &row.cells {
            cells.push(Cell::new(cell.text()).set_alignment(CellAlignment::Right));
        }
        cells.push(Cell::new(&row.total).set_alignment(CellAlignment::Right));
        cells.push(Cell::new(match row.actions {
            RowActions::EditDelete | RowActions::SaveCancel => "edit/delete",
            RowActions::ReadOnly => "read-only",
        }));
        table.add_row(cells);
    }
    format!("{}\n{table}\n", "Fuel history".bold())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::tests::make_records;

    #[test]
    fn test_table_marks_editable_rows() {
        colored::control::set_override(false);
        let view = render_history(&Ok(make_records(7)), &EditSession::default());
        let out = history_table(&view, 50);
        assert_eq!(out.matches("edit/delete").count(), 5);
        assert_eq!(out.matches("read-only").count(), 2);
        assert!(out.contains("$60.00"));
    }

    #[test]
    fn test_table_limit() {
        colored::control::set_override(false);
        let view = render_history(&Ok(make_records(10)), &EditSession::default());
        let out = history_table(&view, 3);
        assert_eq!(out.matches("edit/delete").count(), 3);
        assert!(!out.contains("read-only"));
    }

    #[test]
    fn test_empty_history() {
        let view = render_history(&Ok(Vec::new()), &EditSession::default());
        assert!(history_table(&view, 50).starts_with("No fill-ups yet"));
    }
}
