// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Bracket-tag balance checks.

use thiserror::Error;

/// First problem found in a markup string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LintIssue {
    /// A `[` with no matching `]`.
    #[error("missing end bracket")]
    MissingEndBracket,
    /// A closing tag with nothing open.
    #[error("closing tag [/{tag}] without opening tag")]
    CloseWithoutOpen {
        /// Name of the closing tag.
        tag: String,
    },
    /// A closing tag that does not match the innermost open tag.
    #[error("mismatching closing tag [/{found}] for opening tag [{open}]")]
    Mismatch {
        /// Innermost open tag.
        open: String,
        /// Closing tag found.
        found: String,
    },
    /// Text ended with tags still open.
    #[error("tag [{tag}] is never closed")]
    Unclosed {
        /// Innermost unclosed tag.
        tag: String,
    },
}

/// Checks that `[tag]`/`[/tag]` pairs in `input` nest properly.
///
/// # Errors
///
/// Returns the first [`LintIssue`] encountered.
pub fn lint_text(input: &str) -> Result<(), LintIssue> {
    let mut stack: Vec<&str> = Vec::new();
    let mut rest = input;
    while let Some(open) = rest.find('[') {
        rest = &rest[open + 1..];
        let end = rest.find(']').ok_or(LintIssue::MissingEndBracket)?;
        let tag = &rest[..end];
        rest = &rest[end + 1..];

        let Some(closing) = tag.strip_prefix('/') else {
            stack.push(tag);
            continue;
        };
        let top = stack.pop().ok_or_else(|| LintIssue::CloseWithoutOpen {
            tag: closing.to_owned(),
        })?;
        if top != closing {
            return Err(LintIssue::Mismatch {
                open: top.to_owned(),
                found: closing.to_owned(),
            });
        }
    }
    match stack.pop() {
        Some(tag) => Err(LintIssue::Unclosed {
            tag: tag.to_owned(),
        }),
        None => Ok(()),
    }
}
