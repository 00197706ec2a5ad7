// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Visually-similar kanji.
//!
//! The index maps a kanji character to candidate look-alikes with a
//! confidence in `0.0..=1.0`. Candidates come from JSON source files of two
//! shapes:
//!
//! - unscored: `{ "火": ["灯", "炎"] }`, every pair scored `1.0`;
//! - scored: `{ "火": [{ "kan": "灯", "score": 0.7 }] }`, pairs at or below a
//!   threshold dropped.
//!
//! Adding a pair that already exists keeps the higher score, so the order in
//! which sources are applied only matters for ties. Lookups translate
//! characters to subject ids through the kanji in a store and report scores as
//! fixed-point thousandths.
#![forbid(unsafe_code)]

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tanuki_schema::{SimilarKanji, SubjectId};
use tanuki_store::{for_each, StoreError, SubjectReader};
use thiserror::Error;
use tracing::{debug, info};

/// Scored entries at or below this confidence are ignored by default.
pub const DEFAULT_SCORE_THRESHOLD: f32 = 0.4;

/// Errors raised while building an index.
#[derive(Debug, Error)]
pub enum SimilarError {
    /// A source file could not be read.
    #[error("failed to read similarity source {}: {source}", .path.display())]
    Io {
        /// Source file.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },
    /// A source file is not valid JSON of the expected shape.
    #[error("invalid similarity source {}: {source}", .path.display())]
    Json {
        /// Source file.
        path: PathBuf,
        /// Underlying error.
        source: serde_json::Error,
    },
    /// The subject store could not be walked.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Shape of a similarity source file.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    /// Lists of look-alikes, all scored `1.0`.
    Unscored,
    /// Look-alikes with explicit scores.
    Scored,
}

/// A similarity source file and its shape.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimilaritySource {
    /// JSON file to load.
    pub path: PathBuf,
    /// How to interpret it.
    pub kind: SourceKind,
}

impl SimilaritySource {
    /// An unscored source.
    pub fn unscored(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            kind: SourceKind::Unscored,
        }
    }

    /// A scored source.
    pub fn scored(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            kind: SourceKind::Scored,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
struct Candidate {
    kanji: String,
    score: f32,
}

#[derive(Deserialize)]
struct ScoredEntry {
    kan: String,
    score: f32,
}

/// Confidence as thousandths, truncated toward zero.
#[allow(clippy::cast_possible_truncation)]
fn fixed_point(score: f32) -> i32 {
    (score * 1000.0) as i32
}

/// Character-level similarity index.
#[derive(Debug, Default)]
pub struct SimilarityIndex {
    kanji_ids: HashMap<String, SubjectId>,
    entries: BTreeMap<String, Vec<Candidate>>,
}

impl SimilarityIndex {
    /// An empty index that knows no kanji, so every lookup is empty.
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty index whose lookups resolve through the kanji in `reader`.
    ///
    /// # Errors
    ///
    /// Fails only if the store cannot report its count; unreadable records are
    /// skipped.
    pub fn from_store<R: SubjectReader + ?Sized>(reader: &R) -> Result<Self, SimilarError> {
        let mut index = Self::new();
        for_each(reader, |id, subject| {
            if subject.is_kanji() {
                index.kanji_ids.insert(subject.japanese, id);
            }
            Ok::<_, SimilarError>(())
        })?;
        debug!(kanji = index.kanji_ids.len(), "indexed kanji characters");
        Ok(index)
    }

    /// Registers `kanji` as the character of subject `id`.
    pub fn insert_kanji(&mut self, kanji: impl Into<String>, id: SubjectId) {
        self.kanji_ids.insert(kanji.into(), id);
    }

    /// Records `candidate` as similar to `kanji`, keeping the higher score if
    /// the pair is already known.
    pub fn add(&mut self, kanji: &str, candidate: &str, score: f32) {
        let list = self.entries.entry(kanji.to_owned()).or_default();
        if let Some(existing) = list.iter_mut().find(|c| c.kanji == candidate) {
            if score > existing.score {
                existing.score = score;
            }
            return;
        }
        list.push(Candidate {
            kanji: candidate.to_owned(),
            score,
        });
    }

    /// Loads an unscored source.
    ///
    /// # Errors
    ///
    /// Returns [`SimilarError::Io`] or [`SimilarError::Json`].
    pub fn add_unscored_file(&mut self, path: &Path) -> Result<(), SimilarError> {
        let data: BTreeMap<String, Vec<String>> = read_json(path)?;
        let mut pairs = 0usize;
        for (kanji, candidates) in &data {
            for candidate in candidates {
                self.add(kanji, candidate, 1.0);
                pairs += 1;
            }
        }
        info!(path = %path.display(), pairs, "loaded unscored similarity source");
        Ok(())
    }

    /// Loads a scored source, ignoring pairs whose score is not strictly above
    /// `threshold`.
    ///
    /// # Errors
    ///
    /// Returns [`SimilarError::Io`] or [`SimilarError::Json`].
    pub fn add_scored_file(&mut self, path: &Path, threshold: f32) -> Result<(), SimilarError> {
        let data: BTreeMap<String, Vec<ScoredEntry>> = read_json(path)?;
        let (mut kept, mut dropped) = (0usize, 0usize);
        for (kanji, entries) in &data {
            for entry in entries {
                if entry.score > threshold {
                    self.add(kanji, &entry.kan, entry.score);
                    kept += 1;
                } else {
                    dropped += 1;
                }
            }
        }
        info!(path = %path.display(), kept, dropped, threshold, "loaded scored similarity source");
        Ok(())
    }

    /// Loads `source` according to its kind. `threshold` applies to scored
    /// sources only.
    ///
    /// # Errors
    ///
    /// See [`add_unscored_file`](Self::add_unscored_file) and
    /// [`add_scored_file`](Self::add_scored_file).
    pub fn add_source(
        &mut self,
        source: &SimilaritySource,
        threshold: f32,
    ) -> Result<(), SimilarError> {
        match source.kind {
            SourceKind::Unscored => self.add_unscored_file(&source.path),
            SourceKind::Scored => self.add_scored_file(&source.path, threshold),
        }
    }

    /// Orders every candidate list best first. Candidates whose scores agree
    /// to three decimal places keep their insertion order.
    pub fn sort(&mut self) {
        for list in self.entries.values_mut() {
            list.sort_by_key(|c| std::cmp::Reverse(fixed_point(c.score)));
        }
    }

    /// Similar kanji for `kanji`, in index order, as subject ids.
    ///
    /// Candidates with no kanji subject of that character are dropped.
    pub fn lookup(&self, kanji: &str) -> Vec<SimilarKanji> {
        let Some(list) = self.entries.get(kanji) else {
            return Vec::new();
        };
        list.iter()
            .filter_map(|c| {
                self.kanji_ids.get(&c.kanji).map(|&id| SimilarKanji {
                    id,
                    score: fixed_point(c.score),
                })
            })
            .collect()
    }

    /// Number of characters with at least one candidate.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no candidates have been added.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, SimilarError> {
    let bytes = fs::read(path).map_err(|source| SimilarError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_slice(&bytes).map_err(|source| SimilarError::Json {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index() -> SimilarityIndex {
        let mut index = SimilarityIndex::new();
        for (id, kanji) in [(1, "火"), (2, "灯"), (3, "炎"), (4, "秋")] {
            index.insert_kanji(kanji, id);
        }
        index
    }

    #[test]
    fn repeated_pair_keeps_max_score() {
        let mut index = index();
        index.add("火", "灯", 1.0);
        index.add("火", "灯", 0.3);
        index.add("火", "炎", 0.5);
        index.add("火", "炎", 0.75);
        assert_eq!(
            index.lookup("火"),
            vec![
                SimilarKanji { id: 2, score: 1000 },
                SimilarKanji { id: 3, score: 750 },
            ]
        );
    }

    #[test]
    fn sort_is_descending_and_stable_on_truncated_ties() {
        let mut index = index();
        index.add("火", "秋", 0.5);
        index.add("火", "炎", 0.7001);
        index.add("火", "灯", 0.7004);
        index.sort();
        let ids: Vec<_> = index.lookup("火").iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![3, 2, 4]);
    }

    #[test]
    fn lookup_drops_unknown_characters_and_truncates() {
        let mut index = index();
        index.add("火", "鬼", 1.0);
        index.add("火", "秋", 0.4567);
        assert_eq!(index.lookup("火"), vec![SimilarKanji { id: 4, score: 456 }]);
        assert!(index.lookup("水").is_empty());
    }
}
