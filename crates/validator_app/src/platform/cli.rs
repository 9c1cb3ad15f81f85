use std::path::PathBuf;
use std::time::Duration;

use clap::{ArgAction, Parser};
use validator_engine::BASE_URL_ENV;

/// Submit a repository URL and/or a requirements file to a source code validator.
#[derive(Debug, Parser)]
#[command(name = "validator", version)]
pub struct Cli {
    /// Base address of the validation service; `/validate` is appended.
    #[arg(long, env = BASE_URL_ENV, value_name = "URL")]
    pub base_url: Option<String>,

    /// GitHub repository URL to validate.
    #[arg(long, value_name = "URL")]
    pub url: Option<String>,

    /// Requirements document to upload (text or PDF).
    #[arg(long, value_name = "PATH")]
    pub file: Option<PathBuf>,

    /// Read commands from stdin instead of submitting once.
    #[arg(short, long)]
    pub interactive: bool,

    /// Abort a request that takes longer than this. Unbounded by default.
    #[arg(long, value_name = "SECS")]
    pub timeout_secs: Option<u64>,

    /// Also write logs to this file.
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Increase terminal log verbosity (-v info, -vv debug).
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    pub fn request_timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}
