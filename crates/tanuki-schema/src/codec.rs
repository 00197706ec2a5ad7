// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! CBOR codec for subjects and other store payloads.
//!
//! Payloads never carry the subject id; see [`Subject::id`].

use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;

use crate::Subject;

/// Errors produced while encoding or decoding store payloads.
#[derive(Debug, Error)]
pub enum CodecError {
    /// Serialization failed.
    #[error("cbor encode: {0}")]
    Encode(String),
    /// The bytes are not a valid payload of the expected shape.
    #[error("cbor decode: {0}")]
    Decode(String),
}

/// Encode any serde value to CBOR bytes.
pub fn to_cbor<T: Serialize>(value: &T) -> Result<Vec<u8>, CodecError> {
    let mut buf = Vec::new();
    ciborium::into_writer(value, &mut buf).map_err(|e| CodecError::Encode(e.to_string()))?;
    Ok(buf)
}

/// Decode a serde value from CBOR bytes.
pub fn from_cbor<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, CodecError> {
    ciborium::from_reader(bytes).map_err(|e| CodecError::Decode(e.to_string()))
}

/// Encode a subject. The result never contains `subject.id`.
pub fn encode_subject(subject: &Subject) -> Result<Vec<u8>, CodecError> {
    to_cbor(subject)
}

/// Decode a subject. The returned subject has `id == 0`; callers inject it.
pub fn decode_subject(bytes: &[u8]) -> Result<Subject, CodecError> {
    from_cbor(bytes)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::{Kanji, Meaning, MeaningType, SimilarKanji, SubjectKind};

    #[test]
    fn id_is_not_part_of_the_payload() {
        let mut a = Subject::new(1, 2, "火", SubjectKind::Kanji(Kanji::default()));
        let mut b = a.clone();
        b.id = 9000;
        assert_eq!(encode_subject(&a).unwrap(), encode_subject(&b).unwrap());

        a.meanings.push(Meaning {
            meaning: "fire".into(),
            kind: MeaningType::Primary,
        });
        let decoded = decode_subject(&encode_subject(&a).unwrap()).unwrap();
        assert_eq!(decoded.id, 0);
        assert_eq!(decoded.meanings, a.meanings);
    }

    #[test]
    fn unset_and_empty_hints_stay_distinct() {
        let unset = Subject::new(1, 1, "火", SubjectKind::Kanji(Kanji::default()));
        let empty = Subject::new(
            1,
            1,
            "火",
            SubjectKind::Kanji(Kanji {
                meaning_hint: Some(String::new()),
                ..Kanji::default()
            }),
        );
        let unset_back = decode_subject(&encode_subject(&unset).unwrap()).unwrap();
        let empty_back = decode_subject(&encode_subject(&empty).unwrap()).unwrap();
        assert_eq!(unset_back.kanji().unwrap().meaning_hint, None);
        assert_eq!(empty_back.kanji().unwrap().meaning_hint.as_deref(), Some(""));
    }

    #[test]
    fn similar_kanji_survive_round_trip() {
        let subject = Subject::new(
            7,
            3,
            "未",
            SubjectKind::Kanji(Kanji {
                visually_similar_kanji: vec![SimilarKanji { id: 8, score: 1000 }],
                ..Kanji::default()
            }),
        );
        let mut back = decode_subject(&encode_subject(&subject).unwrap()).unwrap();
        back.id = subject.id;
        assert_eq!(back, subject);
    }

    #[test]
    fn garbage_is_a_decode_error() {
        let err = decode_subject(&[0xff, 0x00, 0x13]).unwrap_err();
        assert!(matches!(err, CodecError::Decode(_)));
    }
}
