// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Subject records: radicals, kanji and vocabulary.
//!
//! Optional and repeated fields are skipped on the wire when empty, so a field
//! that was never set and a field that was set to nothing encode differently
//! only where the type says so (`Option<String>` vs. `Some("")`).

use serde::{Deserialize, Serialize};

/// Identifier of a subject within a store. Doubles as the store slot index.
pub type SubjectId = u32;

/// Parses the canonical decimal form of an id, the one `id.to_string()`
/// produces: ASCII digits only, no sign, no leading zeros.
pub fn parse_subject_id(text: &str) -> Option<SubjectId> {
    let canonical = !text.is_empty()
        && text.bytes().all(|b| b.is_ascii_digit())
        && (text == "0" || !text.starts_with('0'));
    if canonical {
        text.parse().ok()
    } else {
        None
    }
}

fn is_false(value: &bool) -> bool {
    !*value
}

/// One radical, kanji or vocabulary entry.
///
/// `id` is never serialized: stores inject it on read from the slot (blob) or
/// filename (directory) the payload was found under.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subject {
    /// Store-relative identifier, injected on read.
    #[serde(skip)]
    pub id: SubjectId,
    /// 1-based level the subject is taught at.
    pub level: u32,
    /// URL slug from the upstream API.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub slug: String,
    /// Canonical script form (the character or word itself).
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub japanese: String,
    /// Upstream document URL; stripped before publishing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document_url: Option<String>,
    /// Accepted and rejected meanings.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub meanings: Vec<Meaning>,
    /// Readings (kanji and vocabulary only).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub readings: Vec<Reading>,
    /// Subjects this one is built from.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub component_subject_ids: Vec<SubjectId>,
    /// Subjects this one is a component of.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub amalgamation_subject_ids: Vec<SubjectId>,
    /// Kind-specific payload.
    pub kind: SubjectKind,
}

impl Subject {
    /// Build a subject with the given identity and payload and every list empty.
    pub fn new(id: SubjectId, level: u32, japanese: impl Into<String>, kind: SubjectKind) -> Self {
        Self {
            id,
            level,
            slug: String::new(),
            japanese: japanese.into(),
            document_url: None,
            meanings: Vec::new(),
            readings: Vec::new(),
            component_subject_ids: Vec::new(),
            amalgamation_subject_ids: Vec::new(),
            kind,
        }
    }

    /// Returns `true` for radicals.
    pub fn is_radical(&self) -> bool {
        matches!(self.kind, SubjectKind::Radical(_))
    }

    /// Returns `true` for kanji.
    pub fn is_kanji(&self) -> bool {
        matches!(self.kind, SubjectKind::Kanji(_))
    }

    /// Returns `true` for vocabulary.
    pub fn is_vocabulary(&self) -> bool {
        matches!(self.kind, SubjectKind::Vocabulary(_))
    }

    /// Lowercase name of the subject kind, for diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self.kind {
            SubjectKind::Radical(_) => "radical",
            SubjectKind::Kanji(_) => "kanji",
            SubjectKind::Vocabulary(_) => "vocabulary",
        }
    }

    /// The kanji payload, if this is a kanji.
    pub fn kanji(&self) -> Option<&Kanji> {
        match &self.kind {
            SubjectKind::Kanji(kanji) => Some(kanji),
            _ => None,
        }
    }

    /// The vocabulary payload, if this is a vocabulary entry.
    pub fn vocabulary(&self) -> Option<&Vocabulary> {
        match &self.kind {
            SubjectKind::Vocabulary(vocabulary) => Some(vocabulary),
            _ => None,
        }
    }

    /// Human-readable rendering (pretty JSON with the id first).
    ///
    /// Used by the diff and dump tools; not a storage format.
    pub fn to_text(&self) -> Result<String, serde_json::Error> {
        #[derive(Serialize)]
        struct Labelled<'a> {
            id: SubjectId,
            #[serde(flatten)]
            subject: &'a Subject,
        }
        serde_json::to_string_pretty(&Labelled {
            id: self.id,
            subject: self,
        })
    }
}

/// Kind-specific payload. A subject has exactly one.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubjectKind {
    /// Radical payload.
    Radical(Radical),
    /// Kanji payload.
    Kanji(Kanji),
    /// Vocabulary payload.
    Vocabulary(Vocabulary),
}

/// Radical payload.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Radical {
    /// Upstream image URL for radicals with no printable character.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub character_image: Option<String>,
    /// Set once the image has been replaced by a bundled file.
    #[serde(default, skip_serializing_if = "is_false")]
    pub has_character_image_file: bool,
    /// Raw mnemonic markup.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mnemonic: Option<String>,
    /// Raw markup of the mnemonic this radical used to have.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deprecated_mnemonic: Option<String>,
    /// Formatted `mnemonic`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub formatted_mnemonic: Vec<FormattedText>,
    /// Formatted `deprecated_mnemonic`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub formatted_deprecated_mnemonic: Vec<FormattedText>,
}

/// Kanji payload.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Kanji {
    /// Raw meaning mnemonic markup.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meaning_mnemonic: Option<String>,
    /// Raw meaning hint markup.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meaning_hint: Option<String>,
    /// Raw reading mnemonic markup.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reading_mnemonic: Option<String>,
    /// Raw reading hint markup.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reading_hint: Option<String>,
    /// Formatted `meaning_mnemonic`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub formatted_meaning_mnemonic: Vec<FormattedText>,
    /// Formatted `meaning_hint`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub formatted_meaning_hint: Vec<FormattedText>,
    /// Formatted `reading_mnemonic`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub formatted_reading_mnemonic: Vec<FormattedText>,
    /// Formatted `reading_hint`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub formatted_reading_hint: Vec<FormattedText>,
    /// Visually similar kanji, best match first.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub visually_similar_kanji: Vec<SimilarKanji>,
}

/// Vocabulary payload.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vocabulary {
    /// Raw meaning explanation markup.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meaning_explanation: Option<String>,
    /// Raw reading explanation markup.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reading_explanation: Option<String>,
    /// Formatted `meaning_explanation`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub formatted_meaning_explanation: Vec<FormattedText>,
    /// Formatted `reading_explanation`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub formatted_reading_explanation: Vec<FormattedText>,
    /// Grammatical categories.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parts_of_speech: Vec<PartOfSpeech>,
    /// Example sentences.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sentences: Vec<Sentence>,
    /// Upstream pronunciation audio identifiers.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub audio_ids: Vec<u32>,
    /// Raw audio payload as scraped; stripped before publishing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio: Option<Vec<u8>>,
    /// Set once the audio payload has been moved to a bundled file.
    #[serde(default, skip_serializing_if = "is_false")]
    pub has_audio_file: bool,
}

/// A meaning and how the answer checker treats it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meaning {
    /// The meaning text.
    pub meaning: String,
    /// Classification.
    #[serde(rename = "type")]
    pub kind: MeaningType,
}

/// Meaning classification.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MeaningType {
    /// Primary meaning shown to the learner.
    Primary,
    /// Accepted alternative.
    Secondary,
    /// Accepted user-synonym style alternative.
    AuxiliaryWhitelist,
    /// Explicitly rejected answer.
    Blacklist,
}

/// A reading of a kanji or vocabulary entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reading {
    /// Kana reading.
    pub reading: String,
    /// Whether this is the primary reading.
    #[serde(default, skip_serializing_if = "is_false")]
    pub is_primary: bool,
    /// Reading category (kanji only).
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<ReadingType>,
}

/// Kanji reading category.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadingType {
    /// Sino-Japanese reading.
    Onyomi,
    /// Native Japanese reading.
    Kunyomi,
    /// Name reading.
    Nanori,
}

/// Vocabulary part of speech.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[allow(missing_docs)]
pub enum PartOfSpeech {
    Noun,
    Numeral,
    IntransitiveVerb,
    IchidanVerb,
    TransitiveVerb,
    NoAdjective,
    GodanVerb,
    NaAdjective,
    IAdjective,
    Suffix,
    Adverb,
    SuruVerb,
    Prefix,
    ProperNoun,
    Expression,
    Adjective,
    Interjection,
    Counter,
    Pronoun,
    Conjunction,
}

/// Example sentence pair.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sentence {
    /// Japanese text.
    pub japanese: String,
    /// English translation.
    pub english: String,
}

/// A visually similar kanji with a fixed-point confidence (score × 1000).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimilarKanji {
    /// Subject id of the similar kanji.
    pub id: SubjectId,
    /// Confidence in thousandths; 1000 is certain.
    pub score: i32,
}

/// One run of styled text produced from mnemonic markup.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormattedText {
    /// Styles applied to this run, outermost first.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub format: Vec<Format>,
    /// The text of the run.
    pub text: String,
    /// Target of the innermost enclosing link, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link_url: Option<String>,
}

/// Text style of a [`FormattedText`] run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Format {
    /// Radical name.
    Radical,
    /// Kanji meaning.
    Kanji,
    /// Japanese text.
    Japanese,
    /// A reading.
    Reading,
    /// Vocabulary meaning.
    Vocabulary,
    /// Italic emphasis.
    Italic,
    /// Bold emphasis.
    Bold,
    /// Hyperlink; see [`FormattedText::link_url`].
    Link,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn only_canonical_decimal_ids_parse() {
        assert_eq!(parse_subject_id("0"), Some(0));
        assert_eq!(parse_subject_id("440"), Some(440));
        assert_eq!(parse_subject_id("4294967295"), Some(u32::MAX));
        for text in ["", "+7", "-1", "007", "00", "7a", " 7", "4294967296"] {
            assert_eq!(parse_subject_id(text), None, "{text:?}");
        }
    }

    #[test]
    fn kind_accessors() {
        let kanji = Subject::new(3, 1, "火", SubjectKind::Kanji(Kanji::default()));
        assert!(kanji.is_kanji());
        assert!(!kanji.is_radical());
        assert_eq!(kanji.kind_name(), "kanji");
        assert!(kanji.kanji().is_some());
        assert!(kanji.vocabulary().is_none());
    }

    #[test]
    fn text_form_leads_with_id_and_skips_empty_fields() {
        let mut subject = Subject::new(42, 5, "山", SubjectKind::Radical(Radical::default()));
        subject.slug = "mountain".into();
        let text = subject.to_text().unwrap();
        assert!(text.starts_with("{\n  \"id\": 42,"), "{text}");
        assert!(text.contains("\"slug\": \"mountain\""));
        assert!(!text.contains("meanings"));
        assert!(!text.contains("has_character_image_file"));
    }
}
