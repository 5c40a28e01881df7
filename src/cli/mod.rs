pub mod browse;
pub mod graph;
pub mod groups;
pub mod init;
pub mod load;
pub mod report;
pub mod rows;
pub mod status;

use std::path::Path;

use clap::{Parser, Subcommand, ValueEnum};

use crate::db::{load_groupings, open_store};
use crate::error::Result;
use crate::grouper::{partition, Partition};
use crate::importer::{load_file, resolve_format, BankFormat, Ingested};
use crate::models::Grouping;
use crate::settings::{load_settings, DataSource, Settings};

#[derive(Parser)]
#[command(
    name = "tally",
    about = "Bucket bank transactions into named groupings and chart them over time."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create the data directory and database.
    Init {
        /// Path for tally data (default: platform data dir)
        #[arg(long = "data-dir")]
        data_dir: Option<String>,
    },
    /// Point tally at a bank CSV export.
    Load {
        /// Path to the CSV file
        file: String,
        /// Data source name; groupings are stored under it (default: file name)
        #[arg(long)]
        name: Option<String>,
        /// Bank format key: nordea, swedbank
        #[arg(long)]
        format: Option<String>,
    },
    /// Show the active data source and what was read from it.
    Status,
    /// Manage groupings.
    Groups {
        #[command(subcommand)]
        command: GroupsCommands,
    },
    /// Summarize every grouping.
    Report {
        /// Current search terms, applied to rows no grouping claimed
        #[arg(long = "search", num_args = 1..)]
        search: Vec<String>,
    },
    /// List transactions, sorted by description.
    Rows {
        /// Rows claimed by this grouping
        #[arg(long, conflicts_with = "filtered")]
        group: Option<String>,
        /// Rows matched by the current search
        #[arg(long)]
        filtered: bool,
        /// Current search terms
        #[arg(long = "search", num_args = 1..)]
        search: Vec<String>,
    },
    /// Write a monthly chart of the groupings as SVG.
    Graph {
        /// Output SVG path
        #[arg(long)]
        output: String,
        #[arg(long, value_enum, default_value_t = GraphMode::Stacked)]
        mode: GraphMode,
        /// Scale each line to its own range (lines mode)
        #[arg(long)]
        independent: bool,
    },
    /// Interactively build groupings.
    Browse,
}

#[derive(Subcommand)]
pub enum GroupsCommands {
    /// List groupings in priority order.
    List,
    /// Append a grouping.
    Add {
        name: String,
        /// Regex search terms, OR-ed together
        terms: Vec<String>,
    },
    /// Delete a grouping by index.
    Remove { index: usize },
    /// Delete a grouping and print its name and terms for re-editing.
    Pop { index: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum GraphMode {
    /// Cumulative bands, one per grouping
    Stacked,
    /// One line per grouping
    Lines,
}

/// The active data source with its transactions and stored groupings.
pub(crate) struct Session {
    pub settings: Settings,
    pub source: DataSource,
    pub format: BankFormat,
    pub ingested: Ingested,
    pub groupings: Vec<Grouping>,
}

impl Session {
    pub fn open() -> Result<Self> {
        let settings = load_settings();
        let source = settings.require_source()?.clone();
        let format = resolve_format(source.format.as_deref(), &source.name)?;
        let ingested = load_file(Path::new(&source.path), &format)?;
        let groupings = load_groupings(&open_store(&settings.data_dir())?, &source.name)?;
        Ok(Self {
            settings,
            source,
            format,
            ingested,
            groupings,
        })
    }

    pub fn partition(&self, searches: &[String]) -> Result<Partition> {
        Ok(partition(
            &self.ingested.transactions,
            &self.groupings,
            searches,
        )?)
    }
}
