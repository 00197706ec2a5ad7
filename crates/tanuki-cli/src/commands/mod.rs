// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Subcommand implementations.

pub mod combine;
pub mod diff;
pub mod dump;
pub mod extract;
pub mod lint;

use std::path::Path;

use anyhow::{Context, Result};
use tanuki_store::Store;

/// Opens any store, naming the path on failure.
fn open(path: &Path) -> Result<Store> {
    tanuki_store::open(path).with_context(|| format!("failed to open store {}", path.display()))
}
