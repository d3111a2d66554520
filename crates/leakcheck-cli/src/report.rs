//! Per-candidate results and their presentation

use leakcheck_core::{LookupKey, LookupSet, Matches};
use serde::Serialize;

/// Exit status when no candidate was found.
pub const EXIT_CLEAN: u8 = 0;

/// Exit status on any error.
pub const EXIT_ERROR: u8 = 1;

/// Exit status when at least one candidate was found.
pub const EXIT_FOUND: u8 = 2;

/// Outcome for one command-line candidate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CandidateResult {
    /// Candidate as given on the command line
    pub label: String,
    /// Uppercase hex key that was searched
    pub key: String,
    /// Occurrences in the list, `None` when absent
    pub count: Option<u64>,
}

/// Results in command-line order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Report {
    /// One entry per candidate
    pub results: Vec<CandidateResult>,
}

impl Report {
    /// Pair every candidate with its match, if any.
    ///
    /// Candidates that normalise to the same key share the label registered in
    /// `set`, so each one is resolved through its key rather than its text.
    pub fn new(candidates: &[(String, LookupKey)], set: &LookupSet, matches: &Matches) -> Self {
        let results = candidates
            .iter()
            .map(|(label, key)| CandidateResult {
                label: label.clone(),
                key: key.to_string(),
                count: set
                    .label(key)
                    .and_then(|registered| matches.get(registered))
                    .copied(),
            })
            .collect();
        Self { results }
    }

    /// Whether any candidate was found
    pub fn found_any(&self) -> bool {
        self.results.iter().any(|result| result.count.is_some())
    }

    /// Process exit status for this report
    pub fn exit_status(&self) -> u8 {
        if self.found_any() {
            EXIT_FOUND
        } else {
            EXIT_CLEAN
        }
    }

    /// Human-readable output, one line per candidate
    pub fn to_text(&self) -> String {
        self.results
            .iter()
            .map(|result| match result.count {
                Some(count) => format!("{:?} found {count} times\n", result.label),
                None => format!("{:?} not found\n", result.label),
            })
            .collect()
    }

    /// JSON array of results
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
