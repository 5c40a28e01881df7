use std::path::Path;

use crate::browser::{GroupingBrowser, ViewOptions};
use crate::db::{load_groupings, open_store};
use crate::error::Result;
use crate::importer::{load_file, resolve_format};
use crate::logging;
use crate::settings::load_settings;
use crate::state::{self, Action, AppState};

pub fn run() -> Result<()> {
    let settings = load_settings();
    let data_dir = settings.data_dir();
    logging::init_file(&data_dir)?;

    let source = settings.require_source()?.clone();
    let conn = open_store(&data_dir)?;
    let groupings = load_groupings(&conn, &source.name)?;
    let mut app = AppState::new(None, groupings);

    // A failed or empty load leaves the dataset unset; the browser shows a placeholder.
    match resolve_format(source.format.as_deref(), &source.name)
        .and_then(|format| load_file(Path::new(&source.path), &format))
    {
        Ok(ingested) if !ingested.transactions.is_empty() => {
            app = state::update(app, Action::ReplaceTransactions(ingested.transactions));
        }
        Ok(_) => tracing::warn!(source = %source.name, "no transactions in {}", source.path),
        Err(e) => tracing::error!(source = %source.name, "load failed: {e}"),
    }

    let options = ViewOptions {
        skip_groups: settings.chart_skip_groups,
        floor: settings.chart_floor,
        bar_width: settings.bar_width,
    };
    let mut browser = GroupingBrowser::new(app, source.name, options);
    browser.run(&conn)?;
    tracing::info!(groupings = browser.state().groupings.len(), "browser closed");
    Ok(())
}
