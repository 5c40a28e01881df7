use colored::Colorize;
use comfy_table::{Cell, CellAlignment, Table};

use crate::cli::Session;
use crate::error::{Result, TallyError};
use crate::fmt;
use crate::reports::{net, sorted_by_description};

pub fn run(group: Option<&str>, filtered: bool, search: &[String]) -> Result<()> {
    let session = Session::open()?;
    let mut partition = session.partition(search)?;

    let (title, rows) = if let Some(name) = group {
        let index = partition
            .groups
            .iter()
            .position(|(g, _)| g.name == name)
            .ok_or_else(|| TallyError::Other(format!("No grouping named '{name}'")))?;
        (name.to_string(), partition.groups.swap_remove(index).1)
    } else if filtered {
        if let Some(e) = partition.search_error {
            return Err(e.into());
        }
        let current = partition.current.ok_or_else(|| {
            TallyError::Other("--filtered needs at least one --search term".to_string())
        })?;
        ("Filtered".to_string(), current)
    } else {
        ("Unfiltered".to_string(), partition.leftover)
    };

    let mut table = Table::new();
    table.set_header(vec!["Date", "Description", "Amount"]);
    for t in sorted_by_description(&rows) {
        let amount = fmt::amount(t.amount);
        let amount = if t.amount < 0.0 {
            amount.red().to_string()
        } else {
            amount
        };
        table.add_row(vec![
            Cell::new(fmt::date(t.date)),
            Cell::new(&t.description),
            Cell::new(amount).set_alignment(CellAlignment::Right),
        ]);
    }

    println!("{title} ({} rows)\n{table}", rows.len());
    println!("{} {}", "Net:".bold(), fmt::amount(net(&rows)));
    Ok(())
}
