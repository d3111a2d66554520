//! Command-line front end for checking candidates against a leak list.
//!
//! The binary is a thin wrapper: [`CliConfig`] parses arguments,
//! [`run`] resolves every candidate to a key and queries the list, and
//! [`Report`] renders the outcome and picks the exit status.
//!
//! ```no_run
//! use leakcheck_cli::{CliConfig, run};
//!
//! # fn main() -> anyhow::Result<()> {
//! let config = CliConfig::from_args();
//! let report = run(&config)?;
//! print!("{}", report.to_text());
//! # Ok(())
//! # }
//! ```

#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod config;
pub mod report;

pub use config::{BoundaryArg, CliConfig};
pub use report::{CandidateResult, EXIT_CLEAN, EXIT_ERROR, EXIT_FOUND, Report};

use anyhow::{Context, Result};
use leakcheck_core::{ByteSource, HashList, LookupKey, LookupSet, Matches};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// Install the stderr log subscriber.
///
/// `RUST_LOG` wins when set. Otherwise the level follows `-v`: warnings by
/// default, debug for one, trace for two or more.
pub fn init_tracing(verbosity: u8) {
    let fallback = match verbosity {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

    // A second call in the same process keeps the first subscriber
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Resolve each candidate to its lookup key.
///
/// Plaintext candidates are hashed with SHA-1. With `--hashed` they are taken
/// as hex keys and only normalised.
pub fn candidate_keys(config: &CliConfig) -> Result<Vec<(String, LookupKey)>> {
    config
        .candidates
        .iter()
        .map(|candidate| {
            let key = if config.hashed {
                LookupKey::from_hex(candidate)
                    .with_context(|| format!("Invalid hashed candidate {candidate:?}"))?
            } else {
                LookupKey::from_plaintext(candidate)
            };
            Ok((candidate.clone(), key))
        })
        .collect()
}

/// Run one invocation: open the list, query every candidate, build the report.
pub fn run(config: &CliConfig) -> Result<Report> {
    let lookup_config = config
        .lookup_config()
        .context("Invalid lookup configuration")?;
    let candidates = candidate_keys(config)?;
    let set: LookupSet = candidates
        .iter()
        .map(|(label, key)| (key.clone(), label.clone()))
        .collect();

    debug!(
        candidates = candidates.len(),
        distinct = set.len(),
        hashed = config.hashed,
        "Resolved candidate keys"
    );

    let matches = if config.no_mmap {
        let list = HashList::open_positional(&config.file, lookup_config)
            .with_context(|| format!("Failed to open {}", config.file.display()))?;
        query(&list, &set)?
    } else {
        let list = HashList::open(&config.file, lookup_config)
            .with_context(|| format!("Failed to open {}", config.file.display()))?;
        query(&list, &set)?
    };

    info!(found = matches.len(), of = set.len(), "Lookup finished");
    Ok(Report::new(&candidates, &set, &matches))
}

#[cfg(not(feature = "parallel"))]
fn query<S: ByteSource>(list: &HashList<S>, set: &LookupSet) -> Result<Matches> {
    list.lookup(set).context("Lookup failed")
}

#[cfg(feature = "parallel")]
fn query<S: ByteSource + Sync>(list: &HashList<S>, set: &LookupSet) -> Result<Matches> {
    list.lookup_parallel(set).context("Lookup failed")
}
