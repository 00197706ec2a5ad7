// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use tanuki_schema::SubjectId;
use tanuki_store::{for_each, SubjectReader};

pub fn run(path: &Path, id: Option<SubjectId>, all: bool, out: &mut impl Write) -> Result<()> {
    let store = super::open(path)?;
    if let Some(id) = id {
        let subject = store
            .read(id)
            .with_context(|| format!("failed to read subject {id}"))?;
        writeln!(out, "{}", subject.to_text()?)?;
        return Ok(());
    }
    for_each(&store, |id, subject| {
        if all {
            writeln!(out, "{}", subject.to_text()?)?;
        } else {
            writeln!(out, "{id}. {}", subject.slug)?;
        }
        Ok::<_, anyhow::Error>(())
    })
}
