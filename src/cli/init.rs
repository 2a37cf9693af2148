use crate::backend;
use crate::error::Result;
use crate::settings::{load_settings, save_settings, shellexpand_path, BackendKind};

pub fn run(
    data_dir: Option<String>,
    rest_url: Option<String>,
    rest_key: Option<String>,
    table: Option<String>,
    local: bool,
) -> Result<()> {
    let mut settings = load_settings();
    if let Some(dir) = data_dir {
        settings.data_dir = shellexpand_path(&dir);
    }
    if let Some(table) = table {
        settings.table = table;
    }
    if let Some(url) = rest_url {
        settings.backend = BackendKind::Rest;
        settings.rest_url = Some(url);
    }
    if let Some(key) = rest_key {
        settings.rest_key = Some(key);
    }
    if local {
        settings.backend = BackendKind::Sqlite;
    }

    std::fs::create_dir_all(settings.data_dir_path())?;
    let opened = backend::open(&settings)?;
    save_settings(&settings)?;

    println!("Backend:  {}", opened.describe());
    println!("Data dir: {}", settings.data_dir);
    Ok(())
}
