// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Record combiner.
//!
//! Reads every raw subject from a directory store, runs it through a fixed
//! sequence of transforms and writes the result to an indexed blob:
//!
//! 1. [`transform::strip_fields`]: drop scrape-only data.
//! 2. [`transform::check_references`]: every referenced id must exist.
//! 3. [`transform::reorder_components`]: vocabulary components in script order.
//! 4. [`transform::sort_amalgamations`]: amalgamations by level (optional).
//! 5. [`transform::unset_empty_fields`]: blank text becomes absent.
//! 6. [`Overrides::apply`]: human corrections.
//! 7. [`transform::format_markup`]: raw markup to styled runs.
//! 8. [`transform::annotate_similar`]: visually similar kanji.
//!
//! Cross-record reads always go to the input store; the output is write-only.
//! Any failure aborts the run and the blob is never written.
#![forbid(unsafe_code)]

mod config;
mod error;
mod overrides;
mod pipeline;
pub mod transform;

pub use config::{CombineConfig, ConfigError};
pub use error::CombineError;
pub use overrides::Overrides;
pub use pipeline::{combine, combine_into, CombineSummary, Context};
