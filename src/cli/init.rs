use std::path::PathBuf;

use crate::db::{open_store, DB_FILE};
use crate::error::Result;
use crate::settings::{load_settings, save_settings, shellexpand_path};

pub fn run(data_dir: Option<String>) -> Result<()> {
    let mut settings = load_settings();
    if let Some(dir) = data_dir {
        std::fs::create_dir_all(shellexpand_path(&dir))?;
        settings.data_dir = shellexpand_path(&dir);
    }
    let resolved = PathBuf::from(&settings.data_dir);

    open_store(&resolved)?;
    save_settings(&settings)?;

    println!("Initialized {}", resolved.join(DB_FILE).display());
    Ok(())
}
