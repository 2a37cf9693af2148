mod app;
mod backend;
mod cli;
mod editor;
mod error;
mod fmt;
mod form;
mod history;
mod logging;
mod models;
mod normalize;
mod router;
mod settings;
mod tui;

use clap::Parser;

use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();
    logging::init(&settings::load_settings());

    let result = match cli.command {
        None => cli::interactive::run(),
        Some(Commands::Init {
            data_dir,
            rest_url,
            rest_key,
            table,
            local,
        }) => cli::init::run(data_dir, rest_url, rest_key, table, local),
        Some(Commands::Add {
            km,
            liters,
            price,
            date,
        }) => cli::add::run(&km, &liters, &price, date.as_deref()),
        Some(Commands::History { limit }) => cli::history::run(limit),
        Some(Commands::Edit {
            id,
            km,
            date,
            liters,
            price,
        }) => cli::edit::run(
            &id,
            km.as_deref(),
            date.as_deref(),
            liters.as_deref(),
            price.as_deref(),
        ),
        Some(Commands::Delete { id, yes }) => cli::delete::run(&id, yes),
        Some(Commands::Status) => cli::status::run(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
