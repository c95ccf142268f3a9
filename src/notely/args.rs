use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "notely")]
#[command(about = "Browse, search and create notes on a remote notes service", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Use built-in sample notes instead of the remote service
    #[arg(long, global = true)]
    pub offline: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Open the interactive notes browser (default)
    #[command(alias = "b")]
    Browse,

    /// Print one page of notes
    #[command(alias = "ls")]
    List {
        /// Search term
        #[arg(short, long)]
        search: Option<String>,

        /// Page number, starting at 1
        #[arg(short, long, default_value_t = 1)]
        page: u32,
    },

    /// Create a new note
    #[command(alias = "n")]
    Create {
        /// Title of the note (3 to 50 characters)
        #[arg(short, long)]
        title: String,

        /// Content of the note (up to 500 characters)
        #[arg(short, long, default_value = "")]
        content: String,

        /// One of: Todo, Work, Personal, Meeting, Shopping
        #[arg(long, default_value = "Todo")]
        tag: String,
    },

    /// Get or set configuration
    Config {
        /// Configuration key (e.g., per-page)
        key: Option<String>,

        /// Value to set (if omitted, prints current value)
        value: Option<String>,
    },
}
