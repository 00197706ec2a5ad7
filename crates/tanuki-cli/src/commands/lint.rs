// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

use std::io::Write;
use std::path::Path;

use anyhow::Result;
use tanuki_markup::lint_text;
use tanuki_schema::{Subject, SubjectKind};
use tanuki_store::for_each;
use tracing::info;

/// Raw markup fields of `subject`, by name.
fn markup_fields(subject: &Subject) -> Vec<(&'static str, &str)> {
    let fields: Vec<(&'static str, &Option<String>)> = match &subject.kind {
        SubjectKind::Radical(r) => vec![
            ("mnemonic", &r.mnemonic),
            ("deprecated_mnemonic", &r.deprecated_mnemonic),
        ],
        SubjectKind::Kanji(k) => vec![
            ("meaning_mnemonic", &k.meaning_mnemonic),
            ("meaning_hint", &k.meaning_hint),
            ("reading_mnemonic", &k.reading_mnemonic),
            ("reading_hint", &k.reading_hint),
        ],
        SubjectKind::Vocabulary(v) => vec![
            ("meaning_explanation", &v.meaning_explanation),
            ("reading_explanation", &v.reading_explanation),
        ],
    };
    fields
        .into_iter()
        .filter_map(|(name, text)| text.as_deref().map(|text| (name, text)))
        .collect()
}

/// Reports every field with unbalanced tags and returns how many were found.
pub fn run(path: &Path, out: &mut impl Write) -> Result<usize> {
    let store = super::open(path)?;
    let mut issues = 0usize;
    for_each(&store, |id, subject| {
        for (field, text) in markup_fields(&subject) {
            if let Err(issue) = lint_text(text) {
                writeln!(out, "{id} {field}\n{issue}\n  {}\n", text.replace('\n', "\n  "))?;
                issues += 1;
            }
        }
        Ok::<_, anyhow::Error>(())
    })?;
    info!(issues, "lint finished");
    Ok(issues)
}
