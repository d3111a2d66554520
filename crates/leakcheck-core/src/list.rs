//! Query sessions over a sorted hash list

use crate::config::LookupConfig;
use crate::error::{LookupError, Result};
use crate::key::{LookupKey, LookupSet};
use crate::record::{ProbeWindow, RecordLocator};
use crate::search::search_lower_bound;
use crate::store::{ByteSource, MappedFile, PositionalFile};
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, info};

/// Labels of found keys mapped to their occurrence counts.
pub type Matches = HashMap<String, u64>;

/// A sorted `<KEY>:<COUNT>` list opened for queries.
///
/// The source is treated as immutable for the lifetime of the session and is
/// released when the session is dropped. Queries only share the read-only
/// source, so a `HashList` over a `Sync` source can serve several threads.
#[derive(Debug)]
pub struct HashList<S = MappedFile> {
    source: S,
    locator: RecordLocator,
    config: LookupConfig,
}

impl HashList<MappedFile> {
    /// Memory-map a list from disk
    ///
    /// # Errors
    ///
    /// Returns error if the configuration is invalid or the file cannot be
    /// opened and mapped
    pub fn open(path: impl AsRef<Path>, config: LookupConfig) -> Result<Self> {
        let path = path.as_ref();
        let list = Self::from_source(MappedFile::open(path)?, config)?;
        info!("Opened hash list {} ({} bytes)", path.display(), list.len());
        Ok(list)
    }
}

impl HashList<PositionalFile> {
    /// Open a list from disk for positional reads instead of a mapping
    ///
    /// # Errors
    ///
    /// Returns error if the configuration is invalid or the file cannot be
    /// opened
    pub fn open_positional(path: impl AsRef<Path>, config: LookupConfig) -> Result<Self> {
        let path = path.as_ref();
        let list = Self::from_source(PositionalFile::open(path)?, config)?;
        info!(
            "Opened hash list {} for positional reads ({} bytes)",
            path.display(),
            list.len()
        );
        Ok(list)
    }
}

impl<S: ByteSource> HashList<S> {
    /// Wrap an arbitrary byte source
    pub fn from_source(source: S, config: LookupConfig) -> Result<Self> {
        let locator = RecordLocator::new(&config)?;
        Ok(Self {
            source,
            locator,
            config,
        })
    }

    /// Size of the list in bytes
    pub fn len(&self) -> u64 {
        self.source.len()
    }

    /// Whether the list holds no bytes
    pub fn is_empty(&self) -> bool {
        self.source.is_empty()
    }

    /// Configuration this session was opened with
    pub const fn config(&self) -> &LookupConfig {
        &self.config
    }

    /// Underlying byte source
    pub const fn source(&self) -> &S {
        &self.source
    }

    /// Offset of the first record whose key is `>= key`, or the list length
    pub fn search(&self, key: &LookupKey) -> Result<u64> {
        self.check_width(key)?;
        let mut window = self.locator.window();
        search_lower_bound(&self.source, &self.locator, &mut window, key.as_bytes())
    }

    /// Count recorded for `key`, or `None` when it is not in the list
    pub fn get(&self, key: &LookupKey) -> Result<Option<u64>> {
        self.check_width(key)?;
        let mut window = self.locator.window();
        self.find(key, &mut window)
    }

    /// Look up every key of `set`, reporting found counts by label.
    ///
    /// Fails fast: any I/O or format error aborts the batch and no partial
    /// result is returned.
    pub fn lookup(&self, set: &LookupSet) -> Result<Matches> {
        for (key, _) in set.iter() {
            self.check_width(key)?;
        }

        let mut window = self.locator.window();
        let mut matches = Matches::with_capacity(set.len());
        for (key, label) in set.iter() {
            if let Some(count) = self.find(key, &mut window)? {
                matches.insert(label.to_string(), count);
            }
        }

        debug!("{} of {} keys found", matches.len(), set.len());
        Ok(matches)
    }

    /// Search, re-locate and compare for an exact match
    fn find(&self, key: &LookupKey, window: &mut ProbeWindow) -> Result<Option<u64>> {
        let offset = search_lower_bound(&self.source, &self.locator, window, key.as_bytes())?;
        match self.locator.locate(&self.source, offset, window)? {
            Some(record) if record.key == key.as_bytes() => record.parse_count().map(Some),
            _ => Ok(None),
        }
    }

    fn check_width(&self, key: &LookupKey) -> Result<()> {
        match self.config.key_width {
            Some(expected) if key.width() != expected => Err(LookupError::KeyWidthMismatch {
                expected,
                actual: key.width(),
            }),
            _ => Ok(()),
        }
    }
}

#[cfg(feature = "parallel")]
impl<S: ByteSource + Sync> HashList<S> {
    /// Like [`lookup`](Self::lookup), spreading keys across the rayon pool.
    ///
    /// Each worker task owns its probe window.
    pub fn lookup_parallel(&self, set: &LookupSet) -> Result<Matches> {
        use rayon::prelude::*;

        for (key, _) in set.iter() {
            self.check_width(key)?;
        }

        let entries: Vec<_> = set.iter().collect();
        let found = entries
            .par_iter()
            .map_init(
                || self.locator.window(),
                |window, (key, label)| {
                    Ok(self
                        .find(key, window)?
                        .map(|count| ((*label).to_string(), count)))
                },
            )
            .collect::<Result<Vec<_>>>()?;

        let matches: Matches = found.into_iter().flatten().collect();
        debug!("{} of {} keys found", matches.len(), set.len());
        Ok(matches)
    }
}

/// Open `path`, look up every key of `set` and release the file again.
///
/// # Errors
///
/// Returns error on invalid configuration, I/O failure or malformed records
pub fn lookup_file(
    path: impl AsRef<Path>,
    set: &LookupSet,
    config: LookupConfig,
) -> Result<Matches> {
    HashList::open(path, config)?.lookup(set)
}
