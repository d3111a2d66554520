//! Membership and count queries against sorted, line-oriented hash lists.
//!
//! A hash list is a text file with one `<HEX-KEY>:<COUNT>` record per line,
//! sorted ascending by key bytes, such as the Pwned Passwords SHA-1 dumps.
//! Such files run to tens of gigabytes, so they are never loaded or indexed:
//! the file is memory-mapped and every query is a binary search over raw byte
//! offsets.
//!
//! Records have a fixed-width key but a variable-width count, so a probed
//! offset usually lands inside a line. The [`record`] module aligns a probe to
//! the next full record, [`search`] builds the lower-bound search on top of it,
//! and [`HashList`] maps batches of keys to counts.
//!
//! # Example
//!
//! ```no_run
//! use leakcheck_core::{HashList, LookupConfig, LookupSet};
//!
//! # fn main() -> leakcheck_core::Result<()> {
//! let list = HashList::open("pwned-passwords-sha1-ordered-by-hash.txt", LookupConfig::default())?;
//! let set = LookupSet::from_plaintexts(["password", "correct horse battery staple"]);
//!
//! let matches = list.lookup(&set)?;
//! if let Some(count) = matches.get("password") {
//!     println!("seen {count} times");
//! }
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::panic))]

pub mod config;
pub mod error;
pub mod key;
pub mod list;
pub mod record;
pub mod search;
pub mod store;

pub use config::{BoundaryStrategy, LookupConfig, SHA1_HEX_WIDTH};
pub use error::{LookupError, Result};
pub use key::{LookupKey, LookupSet};
pub use list::{HashList, Matches, lookup_file};
pub use record::{ProbeWindow, Record, RecordLocator};
pub use search::search_lower_bound;
pub use store::{ByteSource, MappedFile, PositionalFile};
