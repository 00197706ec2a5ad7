// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Human-authored subject corrections.
//!
//! The override file is TOML with one table per subject id:
//!
//! ```toml
//! [subject.440]
//! slug = "fixed"
//!
//! [subject.440.kind.kanji]
//! meaning_hint = "Think of a campfire."
//! ```
//!
//! A patch is merged over the subject's serialized form: tables merge key by
//! key, every other value (arrays included) replaces what was there.

use std::collections::BTreeMap;
use std::path::Path;

use serde_json::{Map, Value};
use tanuki_schema::{parse_subject_id, Subject, SubjectId};
use tracing::{info, warn};

use crate::CombineError;

/// Patches keyed by subject id.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Overrides {
    patches: BTreeMap<SubjectId, Map<String, Value>>,
}

impl Overrides {
    /// Reads the override file at `path`.
    ///
    /// Never fails: a missing path, an unreadable file or invalid TOML is
    /// logged and yields an empty set. Entries with a non-numeric key or a
    /// non-table body are skipped with a warning.
    pub fn load(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            return Self::default();
        };
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) => {
                warn!(path = %path.display(), %err, "override file unreadable; continuing without overrides");
                return Self::default();
            }
        };
        match Self::parse(&text) {
            Ok(overrides) => {
                info!(path = %path.display(), patches = overrides.len(), "loaded overrides");
                overrides
            }
            Err(err) => {
                warn!(path = %path.display(), %err, "override file unparseable; continuing without overrides");
                Self::default()
            }
        }
    }

    /// Parses override TOML.
    ///
    /// # Errors
    ///
    /// Returns the TOML error if `text` is not a valid document.
    pub fn parse(text: &str) -> Result<Self, toml::de::Error> {
        let document: toml::Table = text.parse()?;
        let mut patches = BTreeMap::new();
        let Some(subjects) = document.get("subject").and_then(toml::Value::as_table) else {
            return Ok(Self { patches });
        };
        for (key, body) in subjects {
            let Some(id) = parse_subject_id(key) else {
                warn!(key, "override key is not a subject id; skipped");
                continue;
            };
            match serde_json::to_value(body) {
                Ok(Value::Object(patch)) => {
                    patches.insert(id, patch);
                }
                _ => warn!(id, "override body is not a table; skipped"),
            }
        }
        Ok(Self { patches })
    }

    /// Patch for `id`, if any.
    pub fn get(&self, id: SubjectId) -> Option<&Map<String, Value>> {
        self.patches.get(&id)
    }

    /// Number of patches.
    pub fn len(&self) -> usize {
        self.patches.len()
    }

    /// Returns `true` if there are no patches.
    pub fn is_empty(&self) -> bool {
        self.patches.is_empty()
    }

    /// Merges the patch for `subject.id` over `subject`. Subjects without a
    /// patch pass through untouched.
    ///
    /// # Errors
    ///
    /// Returns [`CombineError::Override`] if the merged value is no longer a
    /// valid subject.
    pub fn apply(&self, subject: Subject) -> Result<Subject, CombineError> {
        let Some(patch) = self.get(subject.id) else {
            return Ok(subject);
        };
        let id = subject.id;
        let invalid = |err: serde_json::Error| CombineError::Override {
            id,
            reason: err.to_string(),
        };
        let mut value = serde_json::to_value(&subject).map_err(invalid)?;
        if let Value::Object(fields) = &mut value {
            merge_into(fields, patch);
        }
        let mut patched: Subject = serde_json::from_value(value).map_err(invalid)?;
        patched.id = id;
        Ok(patched)
    }
}

fn merge_into(target: &mut Map<String, Value>, patch: &Map<String, Value>) {
    for (key, value) in patch {
        if let (Some(Value::Object(existing)), Value::Object(nested)) = (target.get_mut(key), value)
        {
            merge_into(existing, nested);
        } else {
            target.insert(key.clone(), value.clone());
        }
    }
}
