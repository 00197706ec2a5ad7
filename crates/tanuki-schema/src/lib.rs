// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Subject record schema for the Tanuki data pipeline.
//!
//! A [`Subject`] is one radical, kanji or vocabulary entry addressed by a small
//! integer id. Subjects are stored as CBOR (see [`codec`]); the id is never part
//! of the payload and is injected by the store that read it.
#![forbid(unsafe_code)]

pub mod codec;
mod subject;

pub use codec::{decode_subject, encode_subject, from_cbor, to_cbor, CodecError};
pub use subject::{
    parse_subject_id, Format, FormattedText, Kanji, Meaning, MeaningType, PartOfSpeech, Radical, Reading,
    ReadingType, Sentence, SimilarKanji, Subject, SubjectId, SubjectKind, Vocabulary,
};
