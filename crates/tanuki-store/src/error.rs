// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Store error type.

use std::io;
use std::path::PathBuf;

use tanuki_schema::{CodecError, SubjectId};
use thiserror::Error;

/// Errors raised by subject stores.
///
/// Open-time variants (`Missing`, `NotAStore`, `NotADirectory`, `Truncated`,
/// `MalformedHeader`) are fatal for the caller. `NotFound` is local: a single
/// id is absent and the caller decides whether that matters.
#[derive(Debug, Error)]
pub enum StoreError {
    /// IO error during file operations.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// The store path does not exist.
    #[error("{} does not exist", .path.display())]
    Missing {
        /// Path that was opened.
        path: PathBuf,
    },

    /// The store path is neither a regular file nor a directory.
    #[error("{} is neither a file nor a directory", .path.display())]
    NotAStore {
        /// Path that was opened.
        path: PathBuf,
    },

    /// A directory store was requested but the path is something else.
    #[error("{} is not a directory", .path.display())]
    NotADirectory {
        /// Path that was opened.
        path: PathBuf,
    },

    /// The requested subject is absent or out of range.
    #[error("subject {id} not found")]
    NotFound {
        /// Requested subject id.
        id: SubjectId,
    },

    /// The blob file ends before a section it declares.
    #[error("truncated blob: {section} needs {needed} bytes, {available} available")]
    Truncated {
        /// Section being read.
        section: &'static str,
        /// Bytes required.
        needed: u64,
        /// Bytes present.
        available: u64,
    },

    /// The blob header could not be decoded or is inconsistent.
    #[error("malformed blob header: {0}")]
    MalformedHeader(String),

    /// A subject with level 0 cannot be placed in the per-level index.
    #[error("subject {id} has level 0; levels are 1-based")]
    InvalidLevel {
        /// Offending subject id.
        id: SubjectId,
    },

    /// The same id was written twice to a blob writer.
    #[error("subject {id} was already written")]
    DuplicateId {
        /// Offending subject id.
        id: SubjectId,
    },

    /// The payload region would exceed the 32-bit offset space.
    #[error("blob payload exceeds 4 GiB")]
    Overflow,

    /// Payload encoding or decoding failed.
    #[error(transparent)]
    Codec(#[from] CodecError),
}
