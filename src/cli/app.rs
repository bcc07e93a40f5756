use clap::{Parser, Subcommand};
use nav_shell::settings::{Language, Theme};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "nav-shell")]
#[command(about = "Navigation and startup shell of the data browser")]
pub struct Cli {
    /// Log file (truncated on each run)
    #[arg(long, global = true, default_value = "nav-shell.log")]
    pub log_file: PathBuf,

    /// Language used for labels (zh, en)
    #[arg(long, global = true, default_value = "en")]
    pub language: Language,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the flattened route table
    Routes {
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Print the breadcrumb chain for a path
    Breadcrumbs {
        /// Route path (e.g. /explore/type/detail)
        path: String,
    },
    /// Run the startup sequence and print the outcome
    Boot {
        /// Keep settings in memory instead of the config file
        #[arg(long, conflicts_with = "config")]
        in_memory: bool,
        /// Config file to use instead of the default location
        #[arg(long)]
        config: Option<PathBuf>,
        /// Make the settings sync stage fail
        #[arg(long)]
        fail_sync: bool,
        /// Theme to apply over the stored one (dark, light)
        #[arg(long)]
        theme: Option<Theme>,
    },
    /// Apply navigation steps to a fresh store and print the result as JSON
    Replay {
        /// Steps: /path, back, forward or kind:id (e.g. type:587)
        #[arg(required = true, allow_hyphen_values = true)]
        steps: Vec<String>,
    },
}
