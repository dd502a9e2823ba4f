use bigsweep_core::model::size::parse_size;
use bigsweep_core::scanner::DEFAULT_THRESHOLD;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "bigsweep")]
#[command(about = "Find unusually large files, check disk usage, and clean up")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbose (debug) logging on stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Scan a directory for large files
    Scan {
        /// Directory to scan
        root: PathBuf,

        /// Minimum file size, e.g. 100MB, 1.5G, or a byte count
        #[arg(short, long, value_parser = parse_threshold, default_value_t = DEFAULT_THRESHOLD)]
        threshold: u64,

        /// Also scan hidden files and directories
        #[arg(long)]
        include_hidden: bool,

        /// Descend into application and document packages
        #[arg(long)]
        include_packages: bool,

        /// Directory-reading threads (0 = one per CPU)
        #[arg(long, default_value_t = 1)]
        threads: usize,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },

    /// Permanently delete the given files
    Delete {
        /// Files to delete
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Confirm the deletion; nothing is removed without it
        #[arg(long)]
        yes: bool,
    },

    /// Permanently erase everything in the trash
    EmptyTrash {
        /// Confirm; nothing is removed without it
        #[arg(long)]
        yes: bool,
    },

    /// Show total, used, and free space of a volume
    Usage {
        /// Any path on the volume (default: the system volume)
        path: Option<PathBuf>,

        /// Keep refreshing every few seconds
        #[arg(short, long)]
        watch: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
    Csv,
}

fn parse_threshold(s: &str) -> Result<u64, String> {
    match parse_size(s) {
        Some(0) => Err("threshold must be greater than zero".to_string()),
        Some(n) => Ok(n),
        None => Err(format!("invalid size '{s}' (try 100MB, 1.5G, or 250000)")),
    }
}
