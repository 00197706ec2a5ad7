// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Subject stores for the Tanuki data pipeline.
//!
//! A store is a collection of [`Subject`]s addressed by small integer id. Two
//! physical layouts share one interface:
//!
//! - [`DirectoryStore`]: one file per id, written by the scraper and read by
//!   the combiner.
//! - [`BlobReader`] / [`BlobWriter`]: a single indexed file (see [`blob`])
//!   produced by the combiner and shipped to the client.
//!
//! [`open`] picks the layout by inspecting the path.
//!
//! # Absence Semantics
//!
//! Ids are slot indices and the id space may be sparse. [`SubjectReader::has`]
//! reports population without decoding, [`SubjectReader::read`] returns
//! [`StoreError::NotFound`] for gaps, and [`for_each`] skips anything it cannot
//! read.
#![forbid(unsafe_code)]

pub mod blob;
mod directory;
mod error;

pub use blob::{BlobHeader, BlobReader, BlobWriter, SubjectsByLevel};
pub use directory::DirectoryStore;
pub use error::StoreError;

use std::path::Path;

use tanuki_schema::{decode_subject, Subject, SubjectId};
use tracing::trace;

/// Read access to a store.
pub trait SubjectReader {
    /// Upper bound on populated ids: the largest populated id plus one.
    fn count(&self) -> Result<SubjectId, StoreError>;

    /// Returns `true` if `id` is populated. Never decodes the payload.
    fn has(&self, id: SubjectId) -> bool;

    /// Raw encoded payload of `id`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if `id` is unpopulated or out of range.
    fn read_bytes(&self, id: SubjectId) -> Result<Vec<u8>, StoreError>;

    /// Decoded subject `id`, with [`Subject::id`] set to `id`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] for gaps and [`StoreError::Codec`] for
    /// payloads that do not decode.
    fn read(&self, id: SubjectId) -> Result<Subject, StoreError> {
        let bytes = self.read_bytes(id)?;
        let mut subject = decode_subject(&bytes)?;
        subject.id = id;
        Ok(subject)
    }
}

/// Write access to a store.
pub trait SubjectWriter {
    /// Stores `subject` under `id`. The id inside `subject` is ignored.
    fn write(&mut self, id: SubjectId, subject: &Subject) -> Result<(), StoreError>;

    /// Flushes buffered state. For blob writers this is the only point at
    /// which output appears on disk.
    fn close(self) -> Result<(), StoreError>;
}

/// A store opened for reading, whichever layout it uses.
#[derive(Debug)]
pub enum Store {
    /// Loose-file directory.
    Directory(DirectoryStore),
    /// Indexed blob.
    Blob(BlobReader),
}

/// Opens `path` as a directory store if it is a directory, or as a blob if it
/// is a regular file.
///
/// # Errors
///
/// Returns [`StoreError::Missing`] if the path does not exist,
/// [`StoreError::NotAStore`] for other file types, and any blob header error.
pub fn open(path: impl AsRef<Path>) -> Result<Store, StoreError> {
    let path = path.as_ref();
    let meta = match std::fs::metadata(path) {
        Ok(meta) => meta,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return Err(StoreError::Missing {
                path: path.to_path_buf(),
            })
        }
        Err(err) => return Err(StoreError::Io(err)),
    };
    if meta.is_dir() {
        Ok(Store::Directory(DirectoryStore::open(path)?))
    } else if meta.is_file() {
        Ok(Store::Blob(BlobReader::open(path)?))
    } else {
        Err(StoreError::NotAStore {
            path: path.to_path_buf(),
        })
    }
}

impl SubjectReader for Store {
    fn count(&self) -> Result<SubjectId, StoreError> {
        match self {
            Self::Directory(store) => store.count(),
            Self::Blob(store) => store.count(),
        }
    }

    fn has(&self, id: SubjectId) -> bool {
        match self {
            Self::Directory(store) => store.has(id),
            Self::Blob(store) => store.has(id),
        }
    }

    fn read_bytes(&self, id: SubjectId) -> Result<Vec<u8>, StoreError> {
        match self {
            Self::Directory(store) => store.read_bytes(id),
            Self::Blob(store) => store.read_bytes(id),
        }
    }
}

/// Visits every readable subject in ascending id order.
///
/// Ids that are absent or fail to decode are skipped; they are not reported.
/// An error returned by `visit` stops the walk and is returned as is.
///
/// # Errors
///
/// Fails if the store cannot report its count, or with the first error from
/// `visit`.
pub fn for_each<R, E, F>(reader: &R, mut visit: F) -> Result<(), E>
where
    R: SubjectReader + ?Sized,
    E: From<StoreError>,
    F: FnMut(SubjectId, Subject) -> Result<(), E>,
{
    let count = reader.count()?;
    for id in 0..count {
        match reader.read(id) {
            Ok(subject) => visit(id, subject)?,
            Err(err) => trace!(id, %err, "skipping unreadable subject"),
        }
    }
    Ok(())
}
