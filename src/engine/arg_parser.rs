use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Streaming Wikipedia dump extractor.
#[derive(Clone, Parser)]
#[command(name = "wikisieve")]
#[command(about = "Pull articles matching a title list out of a Wikipedia XML dump.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Clone, Subcommand)]
pub enum Commands {
    /// Grab article text for each matching page.
    Grab {
        #[command(flatten)]
        common: CommonArgs,

        /// Grab full article text instead of just the lead section.
        #[arg(long)]
        fulltext: bool,
    },
    /// Resolve redirect stubs to the titles they point at.
    Redirects {
        #[command(flatten)]
        common: CommonArgs,
    },
}

impl Commands {
    pub fn common(&self) -> &CommonArgs {
        match self {
            Commands::Grab { common, .. } | Commands::Redirects { common } => common,
        }
    }
}

/// Arguments shared by every run mode.
#[derive(Args, Clone)]
pub struct CommonArgs {
    /// Wikipedia XML dump, bzip2-compressed (.xml.bz2) or plain .xml.
    #[arg(value_name = "DUMP")]
    pub dump: PathBuf,

    /// JSON array of page titles to keep: ["Title 1", "Title 2", ...]
    #[arg(value_name = "TITLES")]
    pub titles: PathBuf,

    /// Output file; one JSON object per matching page.
    #[arg(value_name = "OUT")]
    pub out: PathBuf,

    /// Worker thread count. Default: available parallelism, capped at 8.
    #[arg(long, short = 'w')]
    pub workers: Option<usize>,

    /// Capacity of the page and result queues.
    #[arg(long, short = 'q')]
    pub queue_cap: Option<usize>,

    /// Verbose output with a progress bar.
    #[arg(long, short = 'v')]
    pub verbose: bool,
}
