use crate::cli::Session;
use crate::db::DB_FILE;
use crate::error::Result;
use crate::fmt;
use crate::settings::load_settings;

pub fn run() -> Result<()> {
    let settings = load_settings();
    let data_dir = settings.data_dir();

    println!("Data dir:   {}", data_dir.display());
    println!("Database:   {}", data_dir.join(DB_FILE).display());

    if settings.source.is_none() {
        println!();
        println!("No data source. Run `tally load <file>` to pick one.");
        return Ok(());
    }

    let session = Session::open()?;
    let rows = &session.ingested.transactions;
    let nan = rows.iter().filter(|t| t.amount.is_nan()).count();

    println!("Source:     {}", session.source.name);
    println!("File:       {}", session.source.path);
    println!("Format:     {}", session.format.name);
    if let (Some(first), Some(last)) = (rows.first(), rows.last()) {
        println!("Range:      {} \u{2192} {}", fmt::date(first.date), fmt::date(last.date));
    }

    println!();
    println!("Transactions:  {}", rows.len());
    println!("Skipped rows:  {}", session.ingested.rejected.len());
    println!("NaN amounts:   {nan}");
    println!("Groupings:     {}", session.groupings.len());
    Ok(())
}
