use tracing::info;

use super::open_backend;
use crate::app::App;
use crate::error::Result;
use crate::tui::run_screen;

pub fn run() -> Result<()> {
    let backend = open_backend()?;
    info!(backend = %backend.describe(), "starting interactive session");
    let mut app = App::new(backend.as_ref());
    run_screen(&mut app)
}
