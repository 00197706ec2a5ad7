// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Mnemonic markup.
//!
//! Upstream mnemonics embed styling as bracket or angle tags:
//! `The [radical]ground[/radical] is <b>hot</b>`. [`format_text`] turns that
//! into a list of [`FormattedText`] runs for the client; [`lint_text`] checks
//! bracket tags are balanced so authoring mistakes in overrides are caught
//! before they ship.
#![forbid(unsafe_code)]

mod format;
mod lint;

pub use format::format_text;
pub use lint::{lint_text, LintIssue};

pub use tanuki_schema::{Format, FormattedText};
