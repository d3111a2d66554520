//! Lower-bound binary search over byte offsets

use crate::error::Result;
use crate::record::{ProbeWindow, RecordLocator};
use crate::store::ByteSource;
use tracing::{debug, trace};

/// Smallest `i` in `[0, size)` for which `pred(i)` holds, or `size`.
///
/// `pred` must be monotone: false for a prefix of the range and true for the
/// rest. Errors from `pred` abort the search.
pub fn partition_point<F>(size: u64, mut pred: F) -> Result<u64>
where
    F: FnMut(u64) -> Result<bool>,
{
    let (mut lo, mut hi) = (0, size);
    while lo < hi {
        let mid = lo + (hi - lo) / 2;
        if pred(mid)? {
            hi = mid;
        } else {
            lo = mid + 1;
        }
    }
    Ok(lo)
}

/// Find the start of the first record whose key is `>= query`.
///
/// Every offset in `[0, source.len())` is a probe candidate; the record
/// compared at an offset is the first one beginning at or after it, and an
/// offset with no such record compares greater than any query. The converged
/// offset is aligned to the start of its record, so the result is always a
/// record boundary, or `source.len()` when every key is smaller than `query`.
///
/// The caller must re-locate the record at the returned offset and compare
/// keys for equality before treating it as a hit.
pub fn search_lower_bound<S>(
    source: &S,
    locator: &RecordLocator,
    window: &mut ProbeWindow,
    query: &[u8],
) -> Result<u64>
where
    S: ByteSource + ?Sized,
{
    let size = source.len();
    let mut probes = 0u32;

    let converged = partition_point(size, |offset| {
        probes += 1;
        Ok(match locator.locate(source, offset, window)? {
            Some(record) => {
                trace!(offset, record = record.offset, "probe");
                query <= record.key
            }
            None => true,
        })
    })?;

    let offset = locator
        .locate(source, converged, window)?
        .map_or(size, |record| record.offset);

    debug!(probes, offset, size, "lower bound found");
    Ok(offset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{BoundaryStrategy, LookupConfig};
    use crate::error::LookupError;

    const FIXTURE: &[u8] = b"000000005AD76BD555C1D6D771DE417A4B87E4B4:4\n\
00000000A8DAE4228F821FB418F59826079BF368:2\n\
00000000DD7F2A1C68A35673713783CA390C9E93:630\n";

    fn search(boundary: BoundaryStrategy, query: &[u8]) -> u64 {
        let locator =
            RecordLocator::new(&LookupConfig::new().with_boundary(boundary)).unwrap();
        let mut window = locator.window();
        search_lower_bound(FIXTURE, &locator, &mut window, query).unwrap()
    }

    #[test]
    fn test_partition_point_matches_std() {
        let values = [1u64, 3, 3, 5, 8, 13, 21];
        for target in 0..25 {
            let expected = values.partition_point(|&v| v < target) as u64;
            let found =
                partition_point(values.len() as u64, |i| Ok(values[i as usize] >= target))
                    .unwrap();
            assert_eq!(found, expected, "target {target}");
        }
    }

    #[test]
    fn test_partition_point_propagates_errors() {
        let result = partition_point(100, |i| {
            if i < 50 {
                Ok(false)
            } else {
                Err(LookupError::InvalidConfig("boom".to_string()))
            }
        });
        assert!(result.is_err());
    }

    #[test]
    fn test_existing_keys_land_on_their_record() {
        for boundary in [BoundaryStrategy::PrecedingNewline, BoundaryStrategy::KeyWidth] {
            assert_eq!(
                search(boundary, b"000000005AD76BD555C1D6D771DE417A4B87E4B4"),
                0
            );
            assert_eq!(
                search(boundary, b"00000000A8DAE4228F821FB418F59826079BF368"),
                43
            );
            assert_eq!(
                search(boundary, b"00000000DD7F2A1C68A35673713783CA390C9E93"),
                86
            );
        }
    }

    #[test]
    fn test_absent_keys() {
        for boundary in [BoundaryStrategy::PrecedingNewline, BoundaryStrategy::KeyWidth] {
            // Smaller than every key
            assert_eq!(
                search(boundary, b"0000000000000000000000000000000000000000"),
                0
            );
            // Between the first and second key
            assert_eq!(
                search(boundary, b"0000000070000000000000000000000000000000"),
                43
            );
            // Larger than every key
            assert_eq!(
                search(boundary, b"FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFF"),
                FIXTURE.len() as u64
            );
        }
    }

    #[test]
    fn test_empty_source() {
        let locator = RecordLocator::new(&LookupConfig::default()).unwrap();
        let mut window = locator.window();
        let offset = search_lower_bound(&b""[..], &locator, &mut window, b"AB").unwrap();
        assert_eq!(offset, 0);
    }

    #[test]
    fn test_malformed_source_aborts_search() {
        let data = vec![b'F'; 4096];
        let locator = RecordLocator::new(&LookupConfig::default()).unwrap();
        let mut window = locator.window();
        let err = search_lower_bound(&data, &locator, &mut window, b"00").unwrap_err();
        assert!(err.is_format_error());
    }
}
