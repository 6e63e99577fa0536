use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use todotable::commands::ListQuery;
use todotable::paginate::PageLimit;
use todotable::pipeline::{FilterKey, SortKey};

#[derive(Parser, Debug)]
#[command(name = "todotable", bin_name = "todotable", version)]
#[command(
    about = "Search, filter, sort and page through a remote todo list",
    long_about = None
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Verbose output (debug logging to stderr)
    #[arg(short, long, global = true, help_heading = "Options")]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true, help_heading = "Options")]
    pub no_color: bool,

    /// Config file to load instead of the default location
    #[arg(long, global = true, value_name = "PATH", help_heading = "Options")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print one page of the table
    #[command(alias = "ls", display_order = 1)]
    List(ListArgs),

    /// Read table intents from stdin, one per line, re-rendering after each
    #[command(display_order = 2)]
    Browse,

    /// Show or generate configuration
    #[command(display_order = 3)]
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigAction {
    /// Show the effective configuration
    Show,
    /// Print the config file location
    Path,
    /// Print a commented sample todotable.toml
    Gen,
}

#[derive(Args, Debug, Default, Clone, PartialEq, Eq)]
pub struct ListArgs {
    /// Search text (3 or more characters)
    #[arg(short, long)]
    pub search: Option<String>,

    /// Only completed (done) or open (pending) records
    #[arg(short, long, value_name = "done|pending")]
    pub filter: Option<FilterKey>,

    /// Sort key, e.g. ID_DESC or title-asc; repeat for a multi-key sort
    #[arg(long = "sort", value_name = "KEY")]
    pub sort: Vec<SortKey>,

    /// Rows per page, or "all"
    #[arg(short, long, value_name = "N|all")]
    pub limit: Option<PageLimit>,

    /// Page to show (1-based)
    #[arg(short, long)]
    pub page: Option<usize>,
}

impl ListArgs {
    pub fn into_query(self) -> ListQuery {
        ListQuery {
            search: self.search,
            filter: self.filter,
            sort: self.sort,
            limit: self.limit,
            page: self.page,
        }
    }
}
