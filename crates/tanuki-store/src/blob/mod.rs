// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Indexed blob format.
//!
//! A blob holds every subject of a build in one file, addressable by id
//! without scanning:
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │ header_length: u32 LE                                    │
//! ├──────────────────────────────────────────────────────────┤
//! │ header: CBOR BlobHeader (header_length bytes)            │
//! │   subject_byte_offset: [u32]   one per id, payload-relative
//! │   subjects_by_level:  [{radicals, kanji, vocabulary}]    │
//! ├──────────────────────────────────────────────────────────┤
//! │ payload region: encoded subjects in id order, no gaps    │
//! │ between them and no separators                           │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! The length of subject `i` is `offset[i + 1] - offset[i]`; the last subject
//! runs to the end of the file. Ids that were never written occupy a
//! zero-length slot. An encoded subject is never empty, so a zero-length slot
//! always means "absent".
//!
//! `subjects_by_level[level - 1]` lists the ids of each kind at that level in
//! the order they were written.

mod read;
mod write;

pub use read::BlobReader;
pub use write::BlobWriter;

use serde::{Deserialize, Serialize};
use tanuki_schema::SubjectId;

/// Ids of each kind taught at one level.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubjectsByLevel {
    /// Radical ids in write order.
    #[serde(default)]
    pub radicals: Vec<SubjectId>,
    /// Kanji ids in write order.
    #[serde(default)]
    pub kanji: Vec<SubjectId>,
    /// Vocabulary ids in write order.
    #[serde(default)]
    pub vocabulary: Vec<SubjectId>,
}

/// Header message stored at the front of a blob.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlobHeader {
    /// Start of each subject, relative to the payload region.
    #[serde(default)]
    pub subject_byte_offset: Vec<u32>,
    /// Per-level index; entry `n` covers level `n + 1`.
    #[serde(default)]
    pub subjects_by_level: Vec<SubjectsByLevel>,
}

/// Size of the little-endian header length prefix.
pub const HEADER_LENGTH_BYTES: usize = 4;
