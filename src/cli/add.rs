use colored::Colorize;

use super::open_backend;
use crate::error::Result;
use crate::form::{today, EntryForm};
use crate::normalize::EntryInput;
use crate::router::View;

pub fn run(km: &str, liters: &str, price: &str, date: Option<&str>) -> Result<()> {
    let backend = open_backend()?;
    let today = today();
    let mut form = EntryForm::new(&today);
    form.input = EntryInput {
        odometer: km.to_string(),
        date: date.unwrap_or(&today).to_string(),
        liters: liters.to_string(),
        price: price.to_string(),
    };

    let outcome = form.submit(backend.as_ref(), View::Entry, &today)?;
    let r = outcome.record;
    println!(
        "{} {} km on {}: {:.3} l at {:.3} (total {:.2})",
        "Saved".green(),
        r.task_name,
        r.task_date,
        r.litros,
        r.precio,
        r.litros * r.precio
    );
    Ok(())
}
