use std::path::PathBuf;

use crate::error::{Result, TallyError};
use crate::fmt;
use crate::importer::{load_file, resolve_format};
use crate::settings::{load_settings, save_settings, shellexpand_path, DataSource};

pub fn run(file: &str, name: Option<&str>, format: Option<&str>) -> Result<()> {
    let resolved = PathBuf::from(shellexpand_path(file));
    if !resolved.is_file() {
        return Err(TallyError::Other(format!(
            "No such file: {}",
            resolved.display()
        )));
    }

    let name = match name {
        Some(n) => n.to_string(),
        None => resolved
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| "default".to_string()),
    };
    let bank = resolve_format(format, &name)?;
    let ingested = load_file(&resolved, &bank)?;

    let mut settings = load_settings();
    settings.source = Some(DataSource {
        name: name.clone(),
        path: resolved.to_string_lossy().to_string(),
        format: format.map(str::to_string),
    });
    save_settings(&settings)?;

    println!(
        "Loaded '{name}' ({}): {} transactions",
        bank.name,
        ingested.transactions.len()
    );
    if let (Some(first), Some(last)) = (ingested.transactions.first(), ingested.transactions.last()) {
        println!("  {} \u{2192} {}", fmt::date(first.date), fmt::date(last.date));
    }
    if !ingested.rejected.is_empty() {
        println!("{} rows skipped:", ingested.rejected.len());
        for e in &ingested.rejected {
            println!("  {e}");
        }
    }
    Ok(())
}
