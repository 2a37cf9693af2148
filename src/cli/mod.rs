pub mod add;
pub mod delete;
pub mod edit;
pub mod history;
pub mod init;
pub mod interactive;
pub mod status;

use std::io::Write;

use clap::{Parser, Subcommand};

use crate::backend::{self, Backend, ROWS_TO_SHOW};
use crate::error::Result;
use crate::settings::load_settings;

pub(crate) fn open_backend() -> Result<Box<dyn Backend>> {
    backend::open(&load_settings())
}

pub(crate) fn prompt(label: &str) -> Result<String> {
    print!("{label}");
    std::io::stdout().flush()?;
    let mut input = String::new();
    std::io::stdin().read_line(&mut input)?;
    Ok(input.trim().to_string())
}

#[derive(Parser)]
#[command(name = "fuelog", about = "Fuel and mileage log. Run without a command for the interactive view.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Configure the backend and create the local database.
    Init {
        /// Directory for the local database and log (default: ~/.local/share/fuelog)
        #[arg(long = "data-dir")]
        data_dir: Option<String>,
        /// Base URL of a hosted PostgREST/Supabase project; switches to the hosted backend
        #[arg(long = "rest-url")]
        rest_url: Option<String>,
        /// API key for the hosted backend (or set FUELOG_REST_KEY)
        #[arg(long = "rest-key")]
        rest_key: Option<String>,
        /// Table name
        #[arg(long)]
        table: Option<String>,
        /// Go back to the local database
        #[arg(long, conflicts_with = "rest_url")]
        local: bool,
    },
    /// Record a fill-up.
    Add {
        /// Odometer reading in km
        #[arg(long)]
        km: String,
        /// Liters purchased
        #[arg(long)]
        liters: String,
        /// Price per liter
        #[arg(long)]
        price: String,
        /// Date: YYYY-MM-DD (default: today)
        #[arg(long)]
        date: Option<String>,
    },
    /// Show the latest fill-ups, newest first.
    History {
        /// Number of rows to show, 1 to 50
        #[arg(
            long,
            default_value_t = ROWS_TO_SHOW,
            value_parser = clap::builder::RangedU64ValueParser::<usize>::new().range(1..=ROWS_TO_SHOW as u64)
        )]
        limit: usize,
    },
    /// Change one of the five most recent fill-ups.
    Edit {
        /// Record ID (shown in `fuelog history`)
        id: String,
        #[arg(long)]
        km: Option<String>,
        #[arg(long)]
        date: Option<String>,
        #[arg(long)]
        liters: Option<String>,
        #[arg(long)]
        price: Option<String>,
    },
    /// Delete one of the five most recent fill-ups.
    Delete {
        /// Record ID (shown in `fuelog history`)
        id: String,
        /// Skip the confirmation prompt
        #[arg(long, short = 'y')]
        yes: bool,
    },
    /// Show the configuration and a summary of the log.
    Status,
}
