use crate::backend;
use crate::error::Result;
use crate::fmt::money;
use crate::history::fetch_history;
use crate::settings::{load_settings, BackendKind};

pub fn run() -> Result<()> {
    let settings = load_settings();

    println!("Data dir:   {}", settings.data_dir);
    println!("Log file:   {}", settings.log_path().display());
    match settings.backend {
        BackendKind::Sqlite => println!("Database:   {}", settings.db_path().display()),
        BackendKind::Rest => println!(
            "Hosted URL: {}",
            settings.rest_url.as_deref().unwrap_or("(not set)")
        ),
    }
    println!("Table:      {}", settings.table);

    let backend = backend::open(&settings)?;
    let records = fetch_history(backend.as_ref())?;
    let spent: f64 = records
        .iter()
        .map(|r| r.litros.unwrap_or(0.0) * r.precio.unwrap_or(0.0))
        .sum();
    let liters: f64 = records.iter().filter_map(|r| r.litros).sum();

    println!();
    println!("Backend:       {}", backend.describe());
    println!("Recent fills:  {}", records.len());
    println!("Liters:        {liters:.3}");
    println!("Spent:         {}", money(spent));
    if let Some(latest) = records.first() {
        println!(
            "Latest:        {} at {} km",
            latest.task_date.as_deref().unwrap_or("-"),
            latest.task_name.map(|k| k.to_string()).unwrap_or_else(|| "-".into())
        );
    }
    Ok(())
}
