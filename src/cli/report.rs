use colored::Colorize;
use comfy_table::{Cell, CellAlignment, Table};

use crate::cli::Session;
use crate::error::Result;
use crate::fmt;
use crate::reports::{self, summaries};

fn amount_cell(value: f64) -> Cell {
    let text = fmt::amount(value);
    let text = if value < 0.0 {
        text.red().to_string()
    } else if value.is_nan() {
        text.magenta().bold().to_string()
    } else {
        text
    };
    Cell::new(text).set_alignment(CellAlignment::Right)
}

pub fn run(search: &[String]) -> Result<()> {
    let session = Session::open()?;
    let partition = session.partition(search)?;
    let rows = summaries(&partition, session.settings.bar_width);

    let mut table = Table::new();
    table.set_header(vec!["#", "Grouping", "Rows", "Sum", "Per month"]);
    for (i, s) in rows.iter().enumerate() {
        table.add_row(vec![
            Cell::new(i),
            Cell::new(&s.name),
            Cell::new(s.count).set_alignment(CellAlignment::Right),
            amount_cell(s.sum),
            amount_cell(s.monthly),
        ]);
    }
    table.add_row(vec![
        Cell::new(""),
        Cell::new("Unfiltered".bold()),
        Cell::new(partition.leftover.len()).set_alignment(CellAlignment::Right),
        amount_cell(reports::net(&partition.leftover)),
        Cell::new(""),
    ]);
    if let Some(ref current) = partition.current {
        table.add_row(vec![
            Cell::new(""),
            Cell::new("Filtered".bold()),
            Cell::new(current.len()).set_alignment(CellAlignment::Right),
            amount_cell(reports::net(current)),
            Cell::new(""),
        ]);
    }

    println!("Groupings for '{}'\n{table}", session.source.name);
    if let Some(e) = partition.search_error {
        println!("{} {e}", "Search not applied:".yellow());
    }
    Ok(())
}
