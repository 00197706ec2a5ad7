// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Per-subject transforms.
//!
//! Each step takes the subject by value and returns the new one. Steps that
//! consult other subjects read them from the input store.

use std::collections::{HashMap, HashSet};

use tanuki_markup::format_text;
use tanuki_schema::{FormattedText, Subject, SubjectId, SubjectKind};
use tanuki_similar::SimilarityIndex;
use tanuki_store::SubjectReader;

use crate::CombineError;

/// Reading text the scraper uses for "no reading".
const PLACEHOLDER_READING: &str = "None";

/// Drops data the client never uses.
///
/// Radical images and vocabulary audio are shipped as separate files, so the
/// inline data is replaced by a presence flag.
pub fn strip_fields(mut subject: Subject) -> Subject {
    subject.document_url = None;
    subject.readings.retain(|r| r.reading != PLACEHOLDER_READING);
    match &mut subject.kind {
        SubjectKind::Radical(radical) => {
            if radical.character_image.take().is_some() {
                radical.has_character_image_file = true;
            }
        }
        SubjectKind::Vocabulary(vocabulary) => {
            if vocabulary.audio.take().is_some() {
                vocabulary.has_audio_file = true;
            }
        }
        SubjectKind::Kanji(_) => {}
    }
    subject
}

/// Fails unless every id `subject` refers to is populated in `input`.
///
/// # Errors
///
/// Returns [`CombineError::MissingReference`] for the first dangling id.
pub fn check_references<R: SubjectReader + ?Sized>(
    subject: &Subject,
    input: &R,
) -> Result<(), CombineError> {
    let similar = subject
        .kanji()
        .map(|k| k.visually_similar_kanji.iter().map(|s| s.id).collect::<Vec<_>>())
        .unwrap_or_default();
    let fields: [(&'static str, &[SubjectId]); 3] = [
        ("component_subject_ids", &subject.component_subject_ids),
        ("amalgamation_subject_ids", &subject.amalgamation_subject_ids),
        ("visually_similar_kanji", &similar),
    ];
    for (field, ids) in fields {
        if let Some(&missing) = ids.iter().find(|&&id| !input.has(id)) {
            return Err(CombineError::MissingReference {
                referrer: subject.id,
                field,
                missing,
            });
        }
    }
    Ok(())
}

/// Orders vocabulary components by where their characters first appear in
/// the vocabulary's script form. Repeated characters count once.
///
/// Other kinds pass through.
///
/// # Errors
///
/// Returns [`CombineError::ComponentMismatch`] if the reordered list does not
/// have the same length as the original, and a store error if a component
/// cannot be read.
pub fn reorder_components<R: SubjectReader + ?Sized>(
    mut subject: Subject,
    input: &R,
) -> Result<Subject, CombineError> {
    if !subject.is_vocabulary() {
        return Ok(subject);
    }
    let mut by_character = HashMap::new();
    for &id in &subject.component_subject_ids {
        by_character.insert(input.read(id)?.japanese, id);
    }

    let mut seen = HashSet::new();
    let mut buf = [0u8; 4];
    let reordered: Vec<SubjectId> = subject
        .japanese
        .chars()
        .filter_map(|c| by_character.get(&*c.encode_utf8(&mut buf)).copied())
        .filter(|id| seen.insert(*id))
        .collect();

    if reordered.len() != subject.component_subject_ids.len() {
        return Err(CombineError::ComponentMismatch {
            id: subject.id,
            japanese: subject.japanese,
            original: subject.component_subject_ids,
            reordered,
        });
    }
    subject.component_subject_ids = reordered;
    Ok(subject)
}

/// Stable-sorts amalgamations by the level of the subject they name.
/// Ids that cannot be read sort after everything else.
pub fn sort_amalgamations<R: SubjectReader + ?Sized>(mut subject: Subject, input: &R) -> Subject {
    if subject.amalgamation_subject_ids.len() < 2 {
        return subject;
    }
    let levels: HashMap<SubjectId, u32> = subject
        .amalgamation_subject_ids
        .iter()
        .map(|&id| (id, input.read(id).map_or(u32::MAX, |s| s.level)))
        .collect();
    subject
        .amalgamation_subject_ids
        .sort_by_key(|id| levels.get(id).copied().unwrap_or(u32::MAX));
    subject
}

fn clear_blank(field: &mut Option<String>) {
    if field.as_deref().is_some_and(|text| text.trim().is_empty()) {
        *field = None;
    }
}

/// Turns whitespace-only hints and explanations into absent fields.
pub fn unset_empty_fields(mut subject: Subject) -> Subject {
    match &mut subject.kind {
        SubjectKind::Radical(radical) => clear_blank(&mut radical.deprecated_mnemonic),
        SubjectKind::Kanji(kanji) => {
            clear_blank(&mut kanji.meaning_hint);
            clear_blank(&mut kanji.reading_hint);
        }
        SubjectKind::Vocabulary(vocabulary) => {
            clear_blank(&mut vocabulary.meaning_explanation);
            clear_blank(&mut vocabulary.reading_explanation);
        }
    }
    subject
}

fn format_field(raw: &mut Option<String>, formatted: &mut Vec<FormattedText>) {
    if let Some(text) = raw.take() {
        *formatted = format_text(&text);
    }
}

/// Replaces every raw markup field with its formatted runs.
pub fn format_markup(mut subject: Subject) -> Subject {
    match &mut subject.kind {
        SubjectKind::Radical(r) => {
            format_field(&mut r.mnemonic, &mut r.formatted_mnemonic);
            format_field(&mut r.deprecated_mnemonic, &mut r.formatted_deprecated_mnemonic);
        }
        SubjectKind::Kanji(k) => {
            format_field(&mut k.meaning_mnemonic, &mut k.formatted_meaning_mnemonic);
            format_field(&mut k.meaning_hint, &mut k.formatted_meaning_hint);
            format_field(&mut k.reading_mnemonic, &mut k.formatted_reading_mnemonic);
            format_field(&mut k.reading_hint, &mut k.formatted_reading_hint);
        }
        SubjectKind::Vocabulary(v) => {
            format_field(&mut v.meaning_explanation, &mut v.formatted_meaning_explanation);
            format_field(&mut v.reading_explanation, &mut v.formatted_reading_explanation);
        }
    }
    subject
}

/// Attaches similar kanji from `index`. An empty lookup leaves the existing
/// list alone.
pub fn annotate_similar(mut subject: Subject, index: &SimilarityIndex) -> Subject {
    if let SubjectKind::Kanji(kanji) = &mut subject.kind {
        let similar = index.lookup(&subject.japanese);
        if !similar.is_empty() {
            kanji.visually_similar_kanji = similar;
        }
    }
    subject
}
