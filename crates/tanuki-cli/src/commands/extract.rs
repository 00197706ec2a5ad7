// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

use std::path::Path;

use anyhow::{Context, Result};
use tanuki_store::{DirectoryStore, SubjectReader};
use tracing::{debug, info};

/// Copies every populated subject's encoded bytes into a directory store.
pub fn run(input: &Path, output: &Path) -> Result<()> {
    let store = super::open(input)?;
    let target = DirectoryStore::create(output)
        .with_context(|| format!("failed to create {}", output.display()))?;

    let mut written = 0usize;
    for id in 0..store.count()? {
        if !store.has(id) {
            continue;
        }
        let bytes = store.read_bytes(id)?;
        target
            .write_bytes(id, &bytes)
            .with_context(|| format!("failed to write subject {id}"))?;
        debug!(id, bytes = bytes.len(), "extracted subject");
        written += 1;
    }
    info!(output = %output.display(), written, "extract finished");
    Ok(())
}
