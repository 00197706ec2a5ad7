// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

use std::io::Write;
use std::path::Path;

use anyhow::Result;
use similar::TextDiff;
use tanuki_schema::SubjectId;
use tanuki_store::{Store, SubjectReader};
use tracing::{info, trace};

/// Text form of `id`, or empty if it cannot be read.
fn render(store: &Store, id: SubjectId) -> String {
    match store.read(id) {
        Ok(subject) => subject.to_text().unwrap_or_default(),
        Err(err) => {
            trace!(id, %err, "rendering unreadable subject as empty");
            String::new()
        }
    }
}

/// Writes a unified diff for every id below both stores' counts whose text
/// forms differ.
pub fn run(a: &Path, b: &Path, out: &mut impl Write) -> Result<()> {
    let old = super::open(a)?;
    let new = super::open(b)?;
    let (old_count, new_count) = (old.count()?, new.count()?);
    if old_count != new_count {
        info!(old_count, new_count, "stores differ in size; comparing the common range");
    }

    let mut changed = 0usize;
    for id in 0..old_count.min(new_count) {
        let (before, after) = (render(&old, id), render(&new, id));
        if before == after {
            continue;
        }
        let diff = TextDiff::from_lines(&before, &after);
        let mut unified = diff.unified_diff();
        unified
            .context_radius(3)
            .header(&format!("a/{id}"), &format!("b/{id}"));
        write!(out, "{unified}")?;
        changed += 1;
    }
    info!(changed, "diff finished");
    Ok(())
}
