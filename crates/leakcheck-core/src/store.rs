//! Random-access byte sources backing a hash list
//!
//! The search only ever needs two things from its backing store: the total
//! length and positional reads of a small window. [`MappedFile`] is the
//! natural realization for large lists; [`PositionalFile`] reads through the
//! file handle instead, and in-memory slices serve tests and embedders.

use crate::error::{LookupError, Result};
use memmap2::{Mmap, MmapOptions};
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Read-only, random-access byte source of known length.
///
/// Implementations must support positional reads without mutating shared
/// state, so one source can serve several searches at once.
pub trait ByteSource {
    /// Total length in bytes.
    fn len(&self) -> u64;

    /// Whether the source holds no bytes.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Reads up to `buf.len()` bytes starting at `offset`.
    ///
    /// Returns the number of bytes read. A short count means end of data was
    /// reached; reading at or past the end returns 0.
    fn read_at(&self, offset: u64, buf: &mut [u8]) -> io::Result<usize>;
}

impl ByteSource for [u8] {
    fn len(&self) -> u64 {
        <[u8]>::len(self) as u64
    }

    fn read_at(&self, offset: u64, buf: &mut [u8]) -> io::Result<usize> {
        let Ok(start) = usize::try_from(offset) else {
            return Ok(0);
        };
        let Some(available) = <[u8]>::len(self).checked_sub(start) else {
            return Ok(0);
        };
        let n = buf.len().min(available);
        buf[..n].copy_from_slice(&self[start..start + n]);
        Ok(n)
    }
}

impl ByteSource for Vec<u8> {
    fn len(&self) -> u64 {
        self.as_slice().len() as u64
    }

    fn read_at(&self, offset: u64, buf: &mut [u8]) -> io::Result<usize> {
        self.as_slice().read_at(offset, buf)
    }
}

impl<T: ByteSource + ?Sized> ByteSource for &T {
    fn len(&self) -> u64 {
        (**self).len()
    }

    fn read_at(&self, offset: u64, buf: &mut [u8]) -> io::Result<usize> {
        (**self).read_at(offset, buf)
    }
}

/// Memory-mapped, read-only hash list file.
///
/// The mapping is released when the value is dropped.
pub struct MappedFile {
    /// Path to the mapped file
    path: PathBuf,
    /// Mapping; `None` for an empty file, which cannot be mapped
    mmap: Option<Mmap>,
}

impl MappedFile {
    /// Open and map a file
    ///
    /// # Errors
    ///
    /// Returns [`LookupError::Open`] if the file cannot be opened, inspected
    /// or memory mapped
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let open_error = |source: io::Error| LookupError::Open {
            path: path.to_path_buf(),
            source,
        };

        let file = File::open(path).map_err(open_error)?;
        let size = file.metadata().map_err(open_error)?.len();

        let mmap = if size == 0 {
            None
        } else {
            // The list must not be modified while it is mapped
            #[allow(unsafe_code)]
            let mmap = unsafe { MmapOptions::new().map(&file).map_err(open_error)? };

            advise_random(&mmap, path);
            Some(mmap)
        };

        debug!("Mapped {} ({} bytes)", path.display(), size);

        Ok(Self {
            path: path.to_path_buf(),
            mmap,
        })
    }

    /// Path the mapping was opened from
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The mapped bytes
    pub fn as_bytes(&self) -> &[u8] {
        self.mmap.as_deref().unwrap_or(&[])
    }
}

impl ByteSource for MappedFile {
    fn len(&self) -> u64 {
        self.as_bytes().len() as u64
    }

    fn read_at(&self, offset: u64, buf: &mut [u8]) -> io::Result<usize> {
        self.as_bytes().read_at(offset, buf)
    }
}

impl std::fmt::Debug for MappedFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MappedFile")
            .field("path", &self.path)
            .field("len", &ByteSource::len(self))
            .finish()
    }
}

/// Hash list read through positional file reads instead of a mapping.
#[derive(Debug)]
pub struct PositionalFile {
    path: PathBuf,
    file: File,
    size: u64,
}

impl PositionalFile {
    /// Open a file for positional reads
    ///
    /// The length is captured once; the file is assumed immutable afterwards.
    ///
    /// # Errors
    ///
    /// Returns [`LookupError::Open`] if the file cannot be opened or inspected
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let open_error = |source: io::Error| LookupError::Open {
            path: path.to_path_buf(),
            source,
        };

        let file = File::open(path).map_err(open_error)?;
        let size = file.metadata().map_err(open_error)?.len();

        Ok(Self {
            path: path.to_path_buf(),
            file,
            size,
        })
    }

    /// Path the file was opened from
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ByteSource for PositionalFile {
    fn len(&self) -> u64 {
        self.size
    }

    fn read_at(&self, offset: u64, buf: &mut [u8]) -> io::Result<usize> {
        let mut filled = 0;
        while filled < buf.len() {
            match read_at_once(&self.file, &mut buf[filled..], offset + filled as u64) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(e) => return Err(e),
            }
        }
        Ok(filled)
    }
}

/// Binary search touches pages in no useful order, so disable readahead.
#[cfg(unix)]
fn advise_random(mmap: &Mmap, path: &Path) {
    if let Err(e) = mmap.advise(memmap2::Advice::Random) {
        debug!("madvise(RANDOM) failed for {}: {e}", path.display());
    }
}

#[cfg(not(unix))]
fn advise_random(_mmap: &Mmap, _path: &Path) {}

#[cfg(unix)]
fn read_at_once(file: &File, buf: &mut [u8], offset: u64) -> io::Result<usize> {
    use std::os::unix::fs::FileExt;
    file.read_at(buf, offset)
}

#[cfg(windows)]
fn read_at_once(file: &File, buf: &mut [u8], offset: u64) -> io::Result<usize> {
    use std::os::windows::fs::FileExt;
    file.seek_read(buf, offset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn temp_file(contents: &[u8]) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_slice_short_read_at_end() {
        let data: &[u8] = b"0123456789";
        let mut buf = [0u8; 4];

        assert_eq!(data.read_at(0, &mut buf).unwrap(), 4);
        assert_eq!(&buf, b"0123");

        assert_eq!(data.read_at(8, &mut buf).unwrap(), 2);
        assert_eq!(&buf[..2], b"89");

        assert_eq!(data.read_at(10, &mut buf).unwrap(), 0);
        assert_eq!(data.read_at(u64::MAX, &mut buf).unwrap(), 0);
    }

    #[test]
    fn test_mapped_file_reads() {
        let file = temp_file(b"hello mapped world");
        let mapped = MappedFile::open(file.path()).unwrap();

        assert_eq!(mapped.len(), 18);
        assert_eq!(mapped.path(), file.path());

        let mut buf = [0u8; 6];
        assert_eq!(mapped.read_at(6, &mut buf).unwrap(), 6);
        assert_eq!(&buf, b"mapped");
    }

    #[test]
    fn test_mapped_empty_file() {
        let file = temp_file(b"");
        let mapped = MappedFile::open(file.path()).unwrap();
        assert!(mapped.is_empty());

        let mut buf = [0u8; 8];
        assert_eq!(mapped.read_at(0, &mut buf).unwrap(), 0);
    }

    #[test]
    fn test_positional_file_reads() {
        let file = temp_file(b"abcdefghij");
        let source = PositionalFile::open(file.path()).unwrap();
        assert_eq!(source.len(), 10);

        let mut buf = [0u8; 8];
        assert_eq!(source.read_at(5, &mut buf).unwrap(), 5);
        assert_eq!(&buf[..5], b"fghij");
        assert_eq!(source.read_at(20, &mut buf).unwrap(), 0);
    }

    #[test]
    fn test_open_missing_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.txt");

        let err = MappedFile::open(&missing).unwrap_err();
        match err {
            LookupError::Open { path, .. } => assert_eq!(path, missing),
            other => panic!("unexpected error: {other}"),
        }

        assert!(matches!(
            PositionalFile::open(&missing),
            Err(LookupError::Open { .. })
        ));
    }
}
