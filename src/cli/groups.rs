use comfy_table::{Cell, Table};

use crate::db::{load_groupings, open_store, save_groupings};
use crate::error::{Result, TallyError};
use crate::matcher::CompiledMatcher;
use crate::models::Grouping;
use crate::settings::load_settings;
use crate::state::{self, Action, AppState};

/// Groupings are keyed by source name, so every subcommand needs one.
fn open() -> Result<(rusqlite::Connection, String, Vec<Grouping>)> {
    let settings = load_settings();
    let source = settings.require_source()?.name.clone();
    let conn = open_store(&settings.data_dir())?;
    let groupings = load_groupings(&conn, &source)?;
    Ok((conn, source, groupings))
}

fn check_index(index: usize, groupings: &[Grouping]) -> Result<()> {
    if index >= groupings.len() {
        return Err(TallyError::Other(format!(
            "No grouping at index {index} ({} defined)",
            groupings.len()
        )));
    }
    Ok(())
}

pub fn list() -> Result<()> {
    let (_, source, groupings) = open()?;
    if groupings.is_empty() {
        println!("No groupings for '{source}'.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["#", "Name", "Searches"]);
    for (i, g) in groupings.iter().enumerate() {
        table.add_row(vec![
            Cell::new(i),
            Cell::new(&g.name),
            Cell::new(g.searches.join(" | ")),
        ]);
    }
    println!("Groupings for '{source}'\n{table}");
    Ok(())
}

pub fn add(name: &str, terms: &[String]) -> Result<()> {
    CompiledMatcher::compile(terms)?;
    let (conn, source, mut groupings) = open()?;
    groupings.push(Grouping::new(name, terms.to_vec()));
    save_groupings(&conn, &source, &groupings)?;
    println!("Added grouping {}: '{name}'", groupings.len() - 1);
    Ok(())
}

pub fn remove(index: usize) -> Result<()> {
    let (conn, source, mut groupings) = open()?;
    check_index(index, &groupings)?;
    let removed = groupings.remove(index);
    save_groupings(&conn, &source, &groupings)?;
    println!("Removed grouping {index}: '{}'", removed.name);
    Ok(())
}

/// Same transition as the browser's pop: the grouping leaves the list and its
/// name and terms come back for editing.
pub fn pop(index: usize) -> Result<()> {
    let (conn, source, groupings) = open()?;
    check_index(index, &groupings)?;
    let popped = state::update(AppState::new(None, groupings), Action::PopGrouping(index));
    save_groupings(&conn, &source, &popped.groupings)?;
    println!("Popped '{}'", popped.name);
    for term in &popped.searches {
        println!("  {term}");
    }
    Ok(())
}
