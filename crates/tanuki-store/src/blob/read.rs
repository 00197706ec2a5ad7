// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Random-access reader over a finished blob.

use std::ops::Range;
use std::path::Path;

use tanuki_schema::{from_cbor, SubjectId};
use tracing::debug;

use super::{BlobHeader, SubjectsByLevel, HEADER_LENGTH_BYTES};
use crate::{StoreError, SubjectReader};

/// A blob loaded into memory.
///
/// The header is decoded and validated once at open time; subject payloads are
/// sliced out on demand.
#[derive(Debug)]
pub struct BlobReader {
    /// Whole file contents.
    data: Vec<u8>,
    header: BlobHeader,
    /// Absolute offset of the payload region.
    payload_start: usize,
    count: SubjectId,
}

impl BlobReader {
    /// Opens a blob file from disk.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] if the file cannot be read, and
    /// [`StoreError::Truncated`] or [`StoreError::MalformedHeader`] if the
    /// header is damaged.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        let data = std::fs::read(path)?;
        let reader = Self::from_bytes(data)?;
        debug!(path = %path.display(), count = reader.count, "opened blob store");
        Ok(reader)
    }

    /// Parses a blob held in memory.
    ///
    /// # Errors
    ///
    /// Same header checks as [`BlobReader::open`].
    pub fn from_bytes(data: Vec<u8>) -> Result<Self, StoreError> {
        let prefix: [u8; HEADER_LENGTH_BYTES] = data
            .get(..HEADER_LENGTH_BYTES)
            .and_then(|bytes| bytes.try_into().ok())
            .ok_or(StoreError::Truncated {
                section: "header length",
                needed: HEADER_LENGTH_BYTES as u64,
                available: data.len() as u64,
            })?;
        let header_len = u32::from_le_bytes(prefix) as usize;
        let payload_start = HEADER_LENGTH_BYTES + header_len;
        let header_bytes = data
            .get(HEADER_LENGTH_BYTES..payload_start)
            .ok_or(StoreError::Truncated {
                section: "header",
                needed: payload_start as u64,
                available: data.len() as u64,
            })?;
        let header: BlobHeader =
            from_cbor(header_bytes).map_err(|e| StoreError::MalformedHeader(e.to_string()))?;

        let payload_len = data.len() - payload_start;
        validate_offsets(&header.subject_byte_offset, payload_len)?;
        let count = SubjectId::try_from(header.subject_byte_offset.len())
            .map_err(|_| StoreError::MalformedHeader("too many subjects".into()))?;

        Ok(Self {
            data,
            header,
            payload_start,
            count,
        })
    }

    /// The decoded header.
    pub fn header(&self) -> &BlobHeader {
        &self.header
    }

    /// Ids taught at `level` (1-based), or `None` past the last level.
    pub fn subjects_at_level(&self, level: u32) -> Option<&SubjectsByLevel> {
        let index = usize::try_from(level.checked_sub(1)?).ok()?;
        self.header.subjects_by_level.get(index)
    }

    /// Number of levels present in the per-level index.
    pub fn level_count(&self) -> usize {
        self.header.subjects_by_level.len()
    }

    /// Absolute byte range of subject `id`, possibly empty.
    fn slot(&self, id: SubjectId) -> Option<Range<usize>> {
        let index = id as usize;
        let offsets = &self.header.subject_byte_offset;
        let start = *offsets.get(index)? as usize;
        let end = offsets
            .get(index + 1)
            .map_or(self.data.len() - self.payload_start, |next| *next as usize);
        Some(self.payload_start + start..self.payload_start + end)
    }
}

/// Offsets must be non-decreasing and stay inside the payload region.
fn validate_offsets(offsets: &[u32], payload_len: usize) -> Result<(), StoreError> {
    let mut previous = 0u32;
    for (index, &offset) in offsets.iter().enumerate() {
        if offset < previous {
            return Err(StoreError::MalformedHeader(format!(
                "offset of subject {index} ({offset}) precedes offset of subject {} ({previous})",
                index - 1
            )));
        }
        if offset as usize > payload_len {
            return Err(StoreError::MalformedHeader(format!(
                "offset of subject {index} ({offset}) is past the payload end ({payload_len})"
            )));
        }
        previous = offset;
    }
    Ok(())
}

impl SubjectReader for BlobReader {
    fn count(&self) -> Result<SubjectId, StoreError> {
        Ok(self.count)
    }

    fn has(&self, id: SubjectId) -> bool {
        self.slot(id).is_some_and(|range| !range.is_empty())
    }

    fn read_bytes(&self, id: SubjectId) -> Result<Vec<u8>, StoreError> {
        match self.slot(id) {
            Some(range) if !range.is_empty() => self
                .data
                .get(range)
                .map(<[u8]>::to_vec)
                .ok_or(StoreError::NotFound { id }),
            _ => Err(StoreError::NotFound { id }),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use tanuki_schema::to_cbor;

    fn blob(header: &BlobHeader, payload: &[u8]) -> Vec<u8> {
        let header_bytes = to_cbor(header).unwrap();
        let mut out = u32::try_from(header_bytes.len()).unwrap().to_le_bytes().to_vec();
        out.extend_from_slice(&header_bytes);
        out.extend_from_slice(payload);
        out
    }

    #[test]
    fn slices_by_offset_and_runs_last_slot_to_eof() {
        let header = BlobHeader {
            subject_byte_offset: vec![0, 0, 3, 3],
            subjects_by_level: Vec::new(),
        };
        let reader = BlobReader::from_bytes(blob(&header, b"abcdefg")).unwrap();
        assert_eq!(reader.count().unwrap(), 4);
        assert!(!reader.has(0));
        assert_eq!(reader.read_bytes(1).unwrap(), b"abc");
        assert!(!reader.has(2));
        assert_eq!(reader.read_bytes(3).unwrap(), b"defg");
        assert!(!reader.has(4));
        assert!(matches!(
            reader.read_bytes(4),
            Err(StoreError::NotFound { id: 4 })
        ));
    }

    #[test]
    fn rejects_short_prefix() {
        let err = BlobReader::from_bytes(vec![1, 0]).unwrap_err();
        assert!(matches!(
            err,
            StoreError::Truncated {
                section: "header length",
                ..
            }
        ));
    }

    #[test]
    fn rejects_header_longer_than_file() {
        let mut data = 100u32.to_le_bytes().to_vec();
        data.extend_from_slice(&[0xa0; 10]);
        let err = BlobReader::from_bytes(data).unwrap_err();
        assert!(matches!(err, StoreError::Truncated { section: "header", .. }));
    }

    #[test]
    fn rejects_undecodable_header() {
        let mut data = 3u32.to_le_bytes().to_vec();
        data.extend_from_slice(&[0xff, 0xff, 0xff]);
        let err = BlobReader::from_bytes(data).unwrap_err();
        assert!(matches!(err, StoreError::MalformedHeader(_)));
    }

    #[test]
    fn rejects_offsets_out_of_order_or_past_end() {
        let backwards = BlobHeader {
            subject_byte_offset: vec![0, 4, 2],
            subjects_by_level: Vec::new(),
        };
        assert!(matches!(
            BlobReader::from_bytes(blob(&backwards, b"abcdef")),
            Err(StoreError::MalformedHeader(_))
        ));

        let past_end = BlobHeader {
            subject_byte_offset: vec![0, 40],
            subjects_by_level: Vec::new(),
        };
        assert!(matches!(
            BlobReader::from_bytes(blob(&past_end, b"abcdef")),
            Err(StoreError::MalformedHeader(_))
        ));
    }

    #[test]
    fn level_lookup_is_one_based() {
        let header = BlobHeader {
            subject_byte_offset: Vec::new(),
            subjects_by_level: vec![SubjectsByLevel {
                radicals: vec![1],
                kanji: vec![2],
                vocabulary: vec![3],
            }],
        };
        let reader = BlobReader::from_bytes(blob(&header, b"")).unwrap();
        assert!(reader.subjects_at_level(0).is_none());
        assert_eq!(reader.subjects_at_level(1).unwrap().kanji, vec![2]);
        assert!(reader.subjects_at_level(2).is_none());
        assert_eq!(reader.level_count(), 1);
    }
}
