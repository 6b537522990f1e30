use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "tlg", about = concat!("timeloggr v", env!("CARGO_PKG_VERSION"), " - log your hours from the terminal"), version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Store entries in a different directory
    #[arg(long = "data-dir", global = true, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Log a time entry
    Add(AddArgs),
    /// List the entries of one day
    List(ListArgs),
    /// Remove an entry by id
    Rm(RmArgs),
    /// Show autocomplete suggestions for a field
    Suggest(SuggestArgs),
}

#[derive(Args)]
pub struct AddArgs {
    /// Hours spent (e.g. 1.5)
    #[arg(long)]
    pub time: String,
    #[arg(long)]
    pub customer: String,
    #[arg(long)]
    pub project: String,
    #[arg(long)]
    pub description: String,
    /// Day of the entry, YYYY-MM-DD (default: today)
    #[arg(long)]
    pub date: Option<String>,
}

#[derive(Args)]
pub struct ListArgs {
    /// Day to list, YYYY-MM-DD (default: today)
    #[arg(long)]
    pub date: Option<String>,
}

#[derive(Args)]
pub struct RmArgs {
    /// Entry id (see `tlg list`)
    pub id: String,
}

#[derive(Args)]
pub struct SuggestArgs {
    /// Field to complete: customer, project or description
    pub field: String,
    /// Text typed so far
    pub partial: String,
}
