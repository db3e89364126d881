use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "record-audit")]
#[command(about = "Recompute NR/CR/WR record labels and report archive discrepancies", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Increase verbosity level (can be repeated: -v, -vv, -vvv)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count, global = true)]
    pub verbosity: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Audit stored record labels against recomputed ones
    Audit {
        /// Archive snapshot (JSON)
        snapshot: PathBuf,

        /// First competition year in the audit window [default: config, then current year]
        #[arg(long)]
        year: Option<i32>,

        /// Output format [default: config, then terminal]
        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Also write machine-applicable corrections as JSON
        #[arg(long)]
        corrections: Option<PathBuf>,

        /// Configuration file (defaults to .record-audit.toml discovery)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Run the record scans on a single thread
        #[arg(long = "no-parallel")]
        no_parallel: bool,

        /// Number of worker threads (0 = all cores)
        #[arg(short = 'j', long = "jobs", env = "RECORD_AUDIT_JOBS")]
        jobs: Option<usize>,

        /// Exit with status 2 when any discrepancy is found
        #[arg(long = "fail-on-discrepancy")]
        fail_on_discrepancy: bool,
    },

    /// Load a snapshot and validate its reference data
    Validate {
        /// Archive snapshot (JSON)
        snapshot: PathBuf,

        /// Configuration file (defaults to .record-audit.toml discovery)
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Write a default .record-audit.toml in the current directory
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
pub enum OutputFormat {
    Json,
    Markdown,
    Terminal,
}

impl From<OutputFormat> for crate::io::output::OutputFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Json => Self::Json,
            OutputFormat::Markdown => Self::Markdown,
            OutputFormat::Terminal => Self::Terminal,
        }
    }
}

pub fn parse_args() -> Cli {
    Cli::parse()
}
