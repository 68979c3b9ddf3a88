use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Sets the level of tracing.
    ///
    /// Without it, progress bars are shown instead.
    #[arg(short, long, global = true)]
    pub trace: Option<TraceLevel>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Download every iShares Russell 3000 N-CSR filing from EDGAR.
    Pull {
        /// Name and email sent to the SEC as the user agent.
        ///
        /// Falls back to the USER_AGENT environment variable.
        #[arg(short = 'a', long)]
        user_agent: Option<String>,

        /// Directory to store the raw filings and their index in.
        #[arg(short, long)]
        output: PathBuf,

        /// Delete existing filings and download everything again.
        #[arg(short, long)]
        replace_existing: bool,

        /// Milliseconds to wait between requests to EDGAR.
        #[arg(long, default_value_t = 200)]
        delay_ms: u64,
    },

    /// Extract holdings and sectors from downloaded filings.
    Parse {
        /// Directory of raw filings, as written by `pull`.
        #[arg(short, long)]
        input: PathBuf,

        /// Directory to store one holdings .csv per reporting period in.
        #[arg(short, long)]
        output: PathBuf,

        /// Delete existing parses and parse everything again.
        #[arg(short, long)]
        replace_existing: bool,

        /// Number of filings parsed at once (defaults to the number of CPUs).
        #[arg(short, long)]
        jobs: Option<usize>,
    },
}

#[derive(ValueEnum, Copy, Clone, Debug, PartialEq, Eq)]
#[clap(rename_all = "UPPERCASE")]
pub enum TraceLevel {
    DEBUG,
    ERROR,
    INFO,
    TRACE,
    WARN,
}
