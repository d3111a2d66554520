//! Lookup keys and lookup sets

use crate::error::{LookupError, Result};
use sha1::{Digest, Sha1};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Uppercase hex-encoded hash, comparable byte-for-byte with list keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LookupKey(String);

impl LookupKey {
    /// Hash a plaintext candidate with SHA-1
    pub fn from_plaintext(data: impl AsRef<[u8]>) -> Self {
        let digest = Sha1::digest(data.as_ref());
        Self(hex::encode_upper(digest))
    }

    /// Parse an already-hashed key in either case
    pub fn from_hex(hex: &str) -> Result<Self> {
        let hex = hex.trim();
        if hex.is_empty() {
            return Err(LookupError::InvalidKey("empty key".to_string()));
        }
        hex::decode(hex).map_err(|e| LookupError::InvalidKey(format!("{hex:?}: {e}")))?;
        Ok(Self(hex.to_ascii_uppercase()))
    }

    /// Key as a string
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Key bytes as compared against the list
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    /// Width in hex characters
    pub fn width(&self) -> usize {
        self.0.len()
    }
}

impl fmt::Display for LookupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for LookupKey {
    type Err = LookupError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_hex(s)
    }
}

impl AsRef<[u8]> for LookupKey {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

/// Keys to look up, each mapped to the label its result is reported under.
///
/// Iteration is in key order, which keeps consecutive searches close together
/// in the list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LookupSet {
    entries: BTreeMap<LookupKey, String>,
}

impl LookupSet {
    /// Create an empty lookup set
    pub fn new() -> Self {
        Self::default()
    }

    /// Hash each plaintext; the plaintext becomes its own label
    pub fn from_plaintexts<I, T>(plaintexts: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        plaintexts
            .into_iter()
            .map(|text| {
                let text = text.as_ref();
                (LookupKey::from_plaintext(text), text.to_string())
            })
            .collect()
    }

    /// Parse already-hashed keys; each key is labelled as given
    pub fn from_hex_keys<I, T>(keys: I) -> Result<Self>
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        keys.into_iter()
            .map(|key| {
                let key = key.as_ref();
                Ok::<_, LookupError>((LookupKey::from_hex(key)?, key.to_string()))
            })
            .collect()
    }

    /// Add a key, returning the label it replaced
    pub fn insert(&mut self, key: LookupKey, label: impl Into<String>) -> Option<String> {
        self.entries.insert(key, label.into())
    }

    /// Label registered for a key
    pub fn label(&self, key: &LookupKey) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Iterate over `(key, label)` pairs in key order
    pub fn iter(&self) -> impl Iterator<Item = (&LookupKey, &str)> {
        self.entries.iter().map(|(key, label)| (key, label.as_str()))
    }

    /// Number of distinct keys
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the set holds no keys
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(LookupKey, String)> for LookupSet {
    fn from_iter<I: IntoIterator<Item = (LookupKey, String)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}
