//! Command-line configuration.
//!
//! Every option can also be set through a `LEAKCHECK_*` environment variable.

use clap::{ArgAction, Parser, ValueEnum};
use leakcheck_core::config::{DEFAULT_MAX_RECORD_LEN, DEFAULT_WINDOW_SIZE};
use leakcheck_core::{BoundaryStrategy, LookupConfig, SHA1_HEX_WIDTH};
use std::path::PathBuf;

/// Record boundary detection, as selectable on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum BoundaryArg {
    /// Look behind the probed offset for a newline
    PrecedingNewline,
    /// Expect the first colon at the key width
    KeyWidth,
}

impl From<BoundaryArg> for BoundaryStrategy {
    fn from(arg: BoundaryArg) -> Self {
        match arg {
            BoundaryArg::PrecedingNewline => Self::PrecedingNewline,
            BoundaryArg::KeyWidth => Self::KeyWidth,
        }
    }
}

/// CLI configuration for `leakcheck`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "leakcheck",
    about = "Check candidates against a sorted <SHA1>:<COUNT> leak list",
    version
)]
pub struct CliConfig {
    /// Sorted hash list to search
    #[arg(short, long, env = "LEAKCHECK_FILE", value_name = "FILE")]
    pub file: PathBuf,

    /// Candidates to check; hashed with SHA-1 unless --hashed is given
    #[arg(value_name = "CANDIDATE", required = true)]
    pub candidates: Vec<String>,

    /// Treat candidates as already-hashed hex keys
    #[arg(long, env = "LEAKCHECK_HASHED")]
    pub hashed: bool,

    /// Print results as JSON
    #[arg(long, env = "LEAKCHECK_JSON")]
    pub json: bool,

    /// Probe window size in bytes
    #[arg(long, env = "LEAKCHECK_WINDOW_SIZE", default_value_t = DEFAULT_WINDOW_SIZE)]
    pub window_size: usize,

    /// Longest record in the list, newline included
    #[arg(long, env = "LEAKCHECK_MAX_RECORD_LEN", default_value_t = DEFAULT_MAX_RECORD_LEN)]
    pub max_record_len: usize,

    /// Record boundary detection strategy
    #[arg(
        long,
        env = "LEAKCHECK_BOUNDARY",
        value_enum,
        default_value_t = BoundaryArg::PrecedingNewline
    )]
    pub boundary: BoundaryArg,

    /// Fixed key width in hex characters, 0 for lists with mixed widths
    #[arg(long, env = "LEAKCHECK_KEY_WIDTH", default_value_t = SHA1_HEX_WIDTH)]
    pub key_width: usize,

    /// Read through the file handle instead of memory-mapping the list
    #[arg(long, env = "LEAKCHECK_NO_MMAP")]
    pub no_mmap: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl CliConfig {
    /// Parse configuration from command-line arguments.
    #[must_use]
    pub fn from_args() -> Self {
        Self::parse()
    }

    /// Lookup configuration for the core, validated.
    pub fn lookup_config(&self) -> leakcheck_core::Result<LookupConfig> {
        let config = LookupConfig::new()
            .with_window_size(self.window_size)
            .with_max_record_len(self.max_record_len)
            .with_boundary(self.boundary.into())
            .with_key_width((self.key_width > 0).then_some(self.key_width));
        config.validate()?;
        Ok(config)
    }
}
