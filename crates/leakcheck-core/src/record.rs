//! Record location within a probe window
//!
//! A hash list is a sequence of `<KEY>:<COUNT>\n` lines. The binary search
//! probes arbitrary byte offsets, so almost every probe lands inside some
//! line. [`RecordLocator::locate`] reads a bounded window at the probed offset,
//! skips the fragment of the line it landed in, and returns the first full
//! record that begins at or after the offset.
//!
//! ```text
//! offset ─┐
//!         v
//! ...B4:4\n00000000A8DAE4228F821FB418F59826079BF368:2\n...
//!         └─ skipped ┘└──────────── located record ─────┘
//! ```

use crate::config::{BoundaryStrategy, LookupConfig};
use crate::error::{LookupError, Result};
use crate::store::ByteSource;

/// Separator between key and count.
const SEPARATOR: u8 = b':';

/// Record terminator.
const NEWLINE: u8 = b'\n';

/// One record materialized from a probe window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Record<'a> {
    /// Absolute offset of the first key byte
    pub offset: u64,
    /// Key bytes, exactly as stored
    pub key: &'a [u8],
    /// Count bytes with surrounding whitespace trimmed
    pub count: &'a [u8],
}

impl Record<'_> {
    /// Parse the count field as a non-negative integer
    pub fn parse_count(&self) -> Result<u64> {
        std::str::from_utf8(self.count)
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .ok_or_else(|| LookupError::InvalidCount {
                offset: self.offset,
                value: String::from_utf8_lossy(self.count).into_owned(),
            })
    }
}

/// Reusable probe buffer.
///
/// Owned by one search (or one batch of searches) and overwritten by every
/// [`RecordLocator::locate`] call. One extra byte is reserved so the
/// preceding-newline strategy can look behind the probed offset.
#[derive(Debug, Clone)]
pub struct ProbeWindow {
    buf: Box<[u8]>,
}

impl ProbeWindow {
    /// Allocate a window covering `size` bytes after a probed offset
    pub fn new(size: usize) -> Self {
        Self {
            buf: vec![0u8; size + 1].into_boxed_slice(),
        }
    }

    /// Number of bytes readable at or after a probed offset
    pub fn size(&self) -> usize {
        self.buf.len() - 1
    }
}

/// Extracts whole records at arbitrary byte offsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordLocator {
    boundary: BoundaryStrategy,
    key_width: Option<usize>,
    window_size: usize,
}

impl RecordLocator {
    /// Create a locator from a validated configuration
    pub fn new(config: &LookupConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            boundary: config.boundary,
            key_width: config.key_width,
            window_size: config.window_size,
        })
    }

    /// Allocate a probe window sized for this locator
    pub fn window(&self) -> ProbeWindow {
        ProbeWindow::new(self.window_size)
    }

    /// Locate the first full record beginning at or after `offset`.
    ///
    /// Returns `Ok(None)` when no record begins at or after `offset`, i.e. the
    /// offset lies inside the final record, in trailing blank lines, or past
    /// the end of the source.
    ///
    /// # Errors
    ///
    /// Propagates read failures. Returns [`LookupError::MalformedRecord`] when
    /// the window holds no record boundary or separator where one is required.
    pub fn locate<'w, S>(
        &self,
        source: &S,
        offset: u64,
        window: &'w mut ProbeWindow,
    ) -> Result<Option<Record<'w>>>
    where
        S: ByteSource + ?Sized,
    {
        let size = source.len();
        if offset >= size {
            return Ok(None);
        }

        let read_from = match self.boundary {
            BoundaryStrategy::PrecedingNewline if offset > 0 => offset - 1,
            _ => offset,
        };
        // A window smaller than configured reads less and fails as malformed
        let want = (self.window_size + usize::from(read_from < offset)).min(window.buf.len());

        let buf: &'w mut [u8] = &mut window.buf[..want];
        let n = source.read_at(read_from, buf)?;
        let data: &'w [u8] = buf;
        let data = &data[..n];
        let at_eof = read_from + n as u64 >= size;

        let start = match self.boundary {
            BoundaryStrategy::PrecedingNewline if offset == 0 => 0,
            // The looked-behind byte is a newline exactly when `offset` is a
            // record start, so the first newline always ends the fragment.
            BoundaryStrategy::PrecedingNewline => match find(data, NEWLINE) {
                Some(pos) => pos + 1,
                None => return no_boundary(offset, at_eof),
            },
            // A window that starts on a record has its first colon exactly
            // one key width in.
            BoundaryStrategy::KeyWidth => match (find(data, SEPARATOR), self.key_width) {
                (Some(colon), Some(width)) if colon == width => 0,
                _ => match find(data, NEWLINE) {
                    Some(pos) => pos + 1,
                    None => return no_boundary(offset, at_eof),
                },
            },
        };

        let rest = &data[start..];
        // Trailing blank lines end the list
        if rest.trim_ascii().is_empty() {
            return no_boundary(offset, at_eof);
        }

        let line = match find(rest, NEWLINE) {
            Some(end) => &rest[..end],
            // Final record without a trailing newline
            None if at_eof => rest,
            None => {
                return Err(LookupError::MalformedRecord {
                    offset,
                    reason: "record longer than probe window",
                });
            }
        };

        let record_offset = read_from + start as u64;
        let Some(sep) = find(line, SEPARATOR) else {
            return Err(LookupError::MalformedRecord {
                offset: record_offset,
                reason: "missing ':' separator",
            });
        };

        Ok(Some(Record {
            offset: record_offset,
            key: &line[..sep],
            count: line[sep + 1..].trim_ascii(),
        }))
    }
}

fn find(haystack: &[u8], needle: u8) -> Option<usize> {
    haystack.iter().position(|&b| b == needle)
}

/// Running out of window is fine at end of file and an error anywhere else.
fn no_boundary<'w>(offset: u64, at_eof: bool) -> Result<Option<Record<'w>>> {
    if at_eof {
        Ok(None)
    } else {
        Err(LookupError::MalformedRecord {
            offset,
            reason: "no record boundary within probe window",
        })
    }
}
