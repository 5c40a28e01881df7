mod browser;
mod chart;
mod cli;
mod db;
mod error;
mod fmt;
mod grouper;
mod importer;
mod logging;
mod matcher;
mod models;
mod palette;
mod reports;
mod settings;
mod state;
mod tui;

use clap::Parser;

use cli::{Cli, Commands, GroupsCommands};

fn main() {
    let cli = Cli::parse();

    // The browser owns the terminal and logs to a file instead.
    if !matches!(cli.command, Commands::Browse) {
        logging::init_stderr();
    }

    let result = match cli.command {
        Commands::Init { data_dir } => cli::init::run(data_dir),
        Commands::Load { file, name, format } => {
            cli::load::run(&file, name.as_deref(), format.as_deref())
        }
        Commands::Status => cli::status::run(),
        Commands::Groups { command } => match command {
            GroupsCommands::List => cli::groups::list(),
            GroupsCommands::Add { name, terms } => cli::groups::add(&name, &terms),
            GroupsCommands::Remove { index } => cli::groups::remove(index),
            GroupsCommands::Pop { index } => cli::groups::pop(index),
        },
        Commands::Report { search } => cli::report::run(&search),
        Commands::Rows {
            group,
            filtered,
            search,
        } => cli::rows::run(group.as_deref(), filtered, &search),
        Commands::Graph {
            output,
            mode,
            independent,
        } => cli::graph::run(&output, mode, independent),
        Commands::Browse => cli::browse::run(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
