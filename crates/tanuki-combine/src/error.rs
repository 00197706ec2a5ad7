// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Combiner error type.

use tanuki_schema::SubjectId;
use tanuki_similar::SimilarError;
use tanuki_store::StoreError;
use thiserror::Error;

use crate::ConfigError;

/// Fatal combiner errors. Every variant aborts the whole run.
#[derive(Debug, Error)]
pub enum CombineError {
    /// Input or output store failure.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Similarity source failure.
    #[error(transparent)]
    Similar(#[from] SimilarError),

    /// Configuration could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A subject references an id that is not in the input store.
    #[error("subject {referrer} references missing subject {missing} in {field}")]
    MissingReference {
        /// Subject holding the reference.
        referrer: SubjectId,
        /// Field the reference was found in.
        field: &'static str,
        /// The id that does not exist.
        missing: SubjectId,
    },

    /// Vocabulary components could not be matched to its script form.
    #[error(
        "different length component subject id lists for {japanese} (subject {id}): \
         {original:?} vs. {reordered:?}"
    )]
    ComponentMismatch {
        /// Vocabulary subject.
        id: SubjectId,
        /// Its script form.
        japanese: String,
        /// Components as scraped.
        original: Vec<SubjectId>,
        /// Components found in script order.
        reordered: Vec<SubjectId>,
    },

    /// An override produced an invalid subject.
    #[error("override for subject {id} is invalid: {reason}")]
    Override {
        /// Patched subject.
        id: SubjectId,
        /// Decoder message.
        reason: String,
    },
}
