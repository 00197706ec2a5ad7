// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Buffered, single-pass blob writer.
//!
//! Nothing touches the destination until [`BlobWriter::close`]; a build that
//! fails or panics part-way leaves no output file behind.

use std::io::Write;
use std::path::{Path, PathBuf};

use tanuki_schema::{encode_subject, to_cbor, Subject, SubjectId, SubjectKind};
use tempfile::NamedTempFile;
use tracing::info;

use super::{BlobHeader, SubjectsByLevel};
use crate::{StoreError, SubjectWriter};

/// Collects encoded subjects in memory and lays out the blob on close.
#[derive(Debug)]
pub struct BlobWriter {
    path: PathBuf,
    /// Encoded subjects indexed by id; an empty entry is a gap.
    subjects: Vec<Vec<u8>>,
    subjects_by_level: Vec<SubjectsByLevel>,
}

impl BlobWriter {
    /// Prepares a writer for `path`.
    ///
    /// The parent directory must already exist. The file itself is not
    /// created until [`close`](SubjectWriter::close).
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Missing`] if the parent directory is absent.
    pub fn create(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let parent = parent_dir(&path);
        if !parent.is_dir() {
            return Err(StoreError::Missing {
                path: parent.to_path_buf(),
            });
        }
        Ok(Self {
            path,
            subjects: Vec::new(),
            subjects_by_level: Vec::new(),
        })
    }

    /// Destination path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of subjects buffered so far.
    pub fn len(&self) -> usize {
        self.subjects.iter().filter(|s| !s.is_empty()).count()
    }

    /// Returns `true` if nothing has been written.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Lays out the complete blob in memory.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Overflow`] if the payload region exceeds the
    /// 32-bit offset space.
    pub fn to_bytes(&self) -> Result<Vec<u8>, StoreError> {
        let mut subject_byte_offset = Vec::with_capacity(self.subjects.len());
        let mut offset = 0u32;
        for encoded in &self.subjects {
            subject_byte_offset.push(offset);
            let len = u32::try_from(encoded.len()).map_err(|_| StoreError::Overflow)?;
            offset = offset.checked_add(len).ok_or(StoreError::Overflow)?;
        }

        let header = BlobHeader {
            subject_byte_offset,
            subjects_by_level: self.subjects_by_level.clone(),
        };
        let header_bytes = to_cbor(&header)?;
        let header_len = u32::try_from(header_bytes.len()).map_err(|_| StoreError::Overflow)?;

        let mut out = Vec::with_capacity(4 + header_bytes.len() + offset as usize);
        out.extend_from_slice(&header_len.to_le_bytes());
        out.extend_from_slice(&header_bytes);
        for encoded in &self.subjects {
            out.extend_from_slice(encoded);
        }
        Ok(out)
    }
}

fn parent_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}

impl SubjectWriter for BlobWriter {
    fn write(&mut self, id: SubjectId, subject: &Subject) -> Result<(), StoreError> {
        let level_index = subject
            .level
            .checked_sub(1)
            .ok_or(StoreError::InvalidLevel { id })? as usize;
        let index = id as usize;
        if self.subjects.get(index).is_some_and(|s| !s.is_empty()) {
            return Err(StoreError::DuplicateId { id });
        }

        let encoded = encode_subject(subject)?;
        if self.subjects.len() <= index {
            self.subjects.resize_with(index + 1, Vec::new);
        }
        self.subjects[index] = encoded;

        if self.subjects_by_level.len() <= level_index {
            self.subjects_by_level
                .resize_with(level_index + 1, SubjectsByLevel::default);
        }
        let bucket = &mut self.subjects_by_level[level_index];
        match subject.kind {
            SubjectKind::Radical(_) => bucket.radicals.push(id),
            SubjectKind::Kanji(_) => bucket.kanji.push(id),
            SubjectKind::Vocabulary(_) => bucket.vocabulary.push(id),
        }
        Ok(())
    }

    fn close(self) -> Result<(), StoreError> {
        let bytes = self.to_bytes()?;
        let mut tmp = NamedTempFile::new_in(parent_dir(&self.path))?;
        tmp.write_all(&bytes)?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).map_err(|e| StoreError::Io(e.error))?;
        info!(
            path = %self.path.display(),
            subjects = self.len(),
            bytes = bytes.len(),
            "wrote blob store"
        );
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::{BlobReader, SubjectReader};
    use tanuki_schema::{Kanji, Radical, Vocabulary};

    fn radical(id: SubjectId, level: u32) -> Subject {
        Subject::new(id, level, "一", SubjectKind::Radical(Radical::default()))
    }

    #[test]
    fn nothing_is_written_before_close() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.bin");
        let mut writer = BlobWriter::create(&path).unwrap();
        writer.write(1, &radical(1, 1)).unwrap();
        drop(writer);
        assert!(!path.exists());
    }

    #[test]
    fn create_requires_existing_parent() {
        let dir = tempfile::tempdir().unwrap();
        let err = BlobWriter::create(dir.path().join("nope/data.bin")).unwrap_err();
        assert!(matches!(err, StoreError::Missing { .. }));
    }

    #[test]
    fn rejects_duplicate_ids_and_level_zero() {
        let dir = tempfile::tempdir().unwrap();
        let mut writer = BlobWriter::create(dir.path().join("data.bin")).unwrap();
        writer.write(3, &radical(3, 1)).unwrap();
        assert!(matches!(
            writer.write(3, &radical(3, 1)),
            Err(StoreError::DuplicateId { id: 3 })
        ));
        assert!(matches!(
            writer.write(4, &radical(4, 0)),
            Err(StoreError::InvalidLevel { id: 4 })
        ));
        assert_eq!(writer.len(), 1);
    }

    #[test]
    fn level_index_buckets_by_kind_in_write_order() {
        let dir = tempfile::tempdir().unwrap();
        let mut writer = BlobWriter::create(dir.path().join("data.bin")).unwrap();
        writer.write(5, &radical(5, 2)).unwrap();
        writer
            .write(9, &Subject::new(9, 2, "人", SubjectKind::Kanji(Kanji::default())))
            .unwrap();
        writer.write(2, &radical(2, 2)).unwrap();
        writer
            .write(
                7,
                &Subject::new(7, 3, "人口", SubjectKind::Vocabulary(Vocabulary::default())),
            )
            .unwrap();

        let reader = BlobReader::from_bytes(writer.to_bytes().unwrap()).unwrap();
        assert_eq!(reader.level_count(), 3);
        assert_eq!(reader.subjects_at_level(1).unwrap(), &SubjectsByLevel::default());
        let level2 = reader.subjects_at_level(2).unwrap();
        assert_eq!(level2.radicals, vec![5, 2]);
        assert_eq!(level2.kanji, vec![9]);
        assert_eq!(reader.subjects_at_level(3).unwrap().vocabulary, vec![7]);
    }

    #[test]
    fn close_produces_a_readable_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.bin");
        let mut writer = BlobWriter::create(&path).unwrap();
        writer.write(1, &radical(1, 1)).unwrap();
        writer.close().unwrap();

        let reader = BlobReader::open(&path).unwrap();
        assert_eq!(reader.count().unwrap(), 2);
        assert_eq!(reader.read(1).unwrap(), radical(1, 1));
    }
}
