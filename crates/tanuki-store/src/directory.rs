// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Loose-file store: one file per subject, named by its decimal id.
//!
//! Writes go straight to disk, so an interrupted build leaves a partially
//! populated directory. The scraper relies on this to resume.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tanuki_schema::{encode_subject, parse_subject_id, Subject, SubjectId};
use tracing::warn;

use crate::{StoreError, SubjectReader, SubjectWriter};

/// A directory of encoded subjects.
#[derive(Debug, Clone)]
pub struct DirectoryStore {
    path: PathBuf,
}

impl DirectoryStore {
    /// Opens an existing directory.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Missing`] if nothing exists at `path` and
    /// [`StoreError::NotADirectory`] if something else does.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        match fs::metadata(&path) {
            Ok(meta) if meta.is_dir() => Ok(Self { path }),
            Ok(_) => Err(StoreError::NotADirectory { path }),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Err(StoreError::Missing { path }),
            Err(err) => Err(StoreError::Io(err)),
        }
    }

    /// Creates the directory (and parents) if needed, then opens it.
    pub fn create(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        fs::create_dir_all(&path)?;
        Self::open(path)
    }

    /// Root directory of the store.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn filename(&self, id: SubjectId) -> PathBuf {
        self.path.join(id.to_string())
    }

    /// Stores already-encoded bytes under `id`.
    pub fn write_bytes(&self, id: SubjectId, bytes: &[u8]) -> Result<(), StoreError> {
        fs::write(self.filename(id), bytes)?;
        Ok(())
    }
}

impl SubjectReader for DirectoryStore {
    fn count(&self) -> Result<SubjectId, StoreError> {
        let mut max: Option<SubjectId> = None;
        for entry in fs::read_dir(&self.path)? {
            let entry = entry?;
            let Some(id) = entry.file_name().to_str().and_then(parse_subject_id) else {
                continue;
            };
            // count is id + 1, so the top id has no room.
            if id == SubjectId::MAX {
                warn!(path = %entry.path().display(), "subject id out of range; ignored");
                continue;
            }
            max = max.max(Some(id));
        }
        Ok(max.map_or(0, |id| id + 1))
    }

    fn has(&self, id: SubjectId) -> bool {
        fs::metadata(self.filename(id)).is_ok_and(|meta| meta.is_file())
    }

    fn read_bytes(&self, id: SubjectId) -> Result<Vec<u8>, StoreError> {
        match fs::read(self.filename(id)) {
            Ok(bytes) => Ok(bytes),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Err(StoreError::NotFound { id }),
            Err(err) => Err(StoreError::Io(err)),
        }
    }
}

impl SubjectWriter for DirectoryStore {
    fn write(&mut self, id: SubjectId, subject: &Subject) -> Result<(), StoreError> {
        self.write_bytes(id, &encode_subject(subject)?)
    }

    fn close(self) -> Result<(), StoreError> {
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use tanuki_schema::{Kanji, SubjectKind};

    #[test]
    fn count_uses_the_largest_numeric_filename() {
        let dir = tempfile::tempdir().unwrap();
        let store = DirectoryStore::open(dir.path()).unwrap();
        assert_eq!(store.count().unwrap(), 0);

        fs::write(dir.path().join("3"), b"x").unwrap();
        fs::write(dir.path().join("12"), b"x").unwrap();
        fs::write(dir.path().join("README"), b"x").unwrap();
        fs::write(dir.path().join("+40"), b"x").unwrap();
        fs::write(dir.path().join("0040"), b"x").unwrap();
        assert_eq!(store.count().unwrap(), 13);
    }

    #[test]
    fn count_ignores_the_unaddressable_top_id() {
        let dir = tempfile::tempdir().unwrap();
        let store = DirectoryStore::open(dir.path()).unwrap();
        fs::write(dir.path().join(u32::MAX.to_string()), b"x").unwrap();
        assert_eq!(store.count().unwrap(), 0);

        fs::write(dir.path().join("3"), b"x").unwrap();
        assert_eq!(store.count().unwrap(), 4);
    }

    #[test]
    fn has_ignores_subdirectories() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("4")).unwrap();
        let store = DirectoryStore::open(dir.path()).unwrap();
        assert!(!store.has(4));
    }

    #[test]
    fn read_of_absent_id_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let store = DirectoryStore::open(dir.path()).unwrap();
        assert!(matches!(store.read(8), Err(StoreError::NotFound { id: 8 })));
    }

    #[test]
    fn write_then_read_injects_filename_id() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = DirectoryStore::open(dir.path()).unwrap();
        let subject = Subject::new(21, 4, "水", SubjectKind::Kanji(Kanji::default()));
        store.write(21, &subject).unwrap();
        assert!(store.has(21));
        assert_eq!(store.read(21).unwrap(), subject);
    }

    #[test]
    fn open_rejects_files_and_missing_paths() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("blob");
        fs::write(&file, b"").unwrap();
        assert!(matches!(
            DirectoryStore::open(&file),
            Err(StoreError::NotADirectory { .. })
        ));
        assert!(matches!(
            DirectoryStore::open(dir.path().join("missing")),
            Err(StoreError::Missing { .. })
        ));
    }
}
