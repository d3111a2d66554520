//! Configuration for record location and searching

use crate::error::{LookupError, Result};
use serde::{Deserialize, Serialize};

/// Width of a hex-encoded SHA-1 digest.
pub const SHA1_HEX_WIDTH: usize = 40;

/// Default probe window size in bytes.
pub const DEFAULT_WINDOW_SIZE: usize = 128;

/// Default upper bound on the length of one record, terminator included.
pub const DEFAULT_MAX_RECORD_LEN: usize = 64;

/// How the record locator decides whether a probe landed on a record start.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BoundaryStrategy {
    /// Inspect the byte preceding the probe offset; a record starts right
    /// after a newline or at offset 0. Works for any key width.
    #[default]
    PrecedingNewline,
    /// A window starts on a record iff its first colon sits at the configured
    /// key width. Requires a fixed key width.
    KeyWidth,
}

/// Configuration for a hash list session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookupConfig {
    /// Probe window size in bytes
    pub window_size: usize,

    /// Longest record the list may contain, newline included
    pub max_record_len: usize,

    /// Record boundary detection
    pub boundary: BoundaryStrategy,

    /// Fixed key width in hex characters, `None` for variable widths
    pub key_width: Option<usize>,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            window_size: DEFAULT_WINDOW_SIZE,
            max_record_len: DEFAULT_MAX_RECORD_LEN,
            boundary: BoundaryStrategy::default(),
            key_width: Some(SHA1_HEX_WIDTH),
        }
    }
}

impl LookupConfig {
    /// Create the default configuration for SHA-1 lists
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the probe window size
    #[must_use]
    pub const fn with_window_size(mut self, size: usize) -> Self {
        self.window_size = size;
        self
    }

    /// Set the maximum record length
    #[must_use]
    pub const fn with_max_record_len(mut self, len: usize) -> Self {
        self.max_record_len = len;
        self
    }

    /// Set the boundary detection strategy
    #[must_use]
    pub const fn with_boundary(mut self, boundary: BoundaryStrategy) -> Self {
        self.boundary = boundary;
        self
    }

    /// Set the fixed key width, or `None` for lists with mixed digest widths
    #[must_use]
    pub const fn with_key_width(mut self, width: Option<usize>) -> Self {
        self.key_width = width;
        self
    }

    /// Check the sizing preconditions the locator relies on.
    ///
    /// A window must hold a partial record plus one full record, so it has to
    /// be at least twice the maximum record length.
    pub fn validate(&self) -> Result<()> {
        if self.max_record_len == 0 {
            return Err(LookupError::InvalidConfig(
                "max_record_len must be non-zero".to_string(),
            ));
        }

        let required = self.max_record_len.saturating_mul(2);
        if self.window_size < required {
            return Err(LookupError::InvalidConfig(format!(
                "window_size {} is smaller than twice max_record_len ({required})",
                self.window_size
            )));
        }

        match (self.boundary, self.key_width) {
            (BoundaryStrategy::KeyWidth, None) => {
                return Err(LookupError::InvalidConfig(
                    "key-width boundary detection requires a fixed key width".to_string(),
                ));
            }
            (_, Some(0)) => {
                return Err(LookupError::InvalidConfig(
                    "key_width must be non-zero".to_string(),
                ));
            }
            (_, Some(width)) if width >= self.max_record_len => {
                return Err(LookupError::InvalidConfig(format!(
                    "key_width {width} leaves no room for a count within max_record_len {}",
                    self.max_record_len
                )));
            }
            _ => {}
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = LookupConfig::default();
        assert_eq!(config.window_size, 128);
        assert_eq!(config.key_width, Some(40));
        assert_eq!(config.boundary, BoundaryStrategy::PrecedingNewline);
        config.validate().unwrap();
    }

    #[test]
    fn test_window_too_small() {
        let config = LookupConfig::new().with_window_size(100);
        assert!(matches!(
            config.validate(),
            Err(LookupError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_key_width_strategy_needs_width() {
        let config = LookupConfig::new()
            .with_boundary(BoundaryStrategy::KeyWidth)
            .with_key_width(None);
        config.validate().unwrap_err();

        let config = config.with_boundary(BoundaryStrategy::PrecedingNewline);
        config.validate().unwrap();
    }

    #[test]
    fn test_key_width_must_fit_record() {
        LookupConfig::new()
            .with_key_width(Some(64))
            .validate()
            .unwrap_err();
        LookupConfig::new()
            .with_key_width(Some(0))
            .validate()
            .unwrap_err();
    }

    #[test]
    fn test_config_serde() {
        let config = LookupConfig::new().with_boundary(BoundaryStrategy::KeyWidth);
        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("\"key-width\""));
        let back: LookupConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }
}
