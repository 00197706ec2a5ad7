// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Markup to styled runs.

use std::sync::LazyLock;

use regex::Regex;
use tanuki_schema::{Format, FormattedText};

#[allow(clippy::expect_used)] // literal pattern
static TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"[\[<](/?(?:vocabulary|reading|ja|jp|kanji|radical|b|em|i|strong|kan|a))(?: href="([^"]+)"[^\]>]*)?[\]>]"#,
    )
    .expect("tag pattern compiles")
});

fn format_for(tag: &str) -> Option<Format> {
    Some(match tag {
        "radical" => Format::Radical,
        "kanji" | "kan" => Format::Kanji,
        "ja" | "jp" => Format::Japanese,
        "reading" => Format::Reading,
        "vocabulary" => Format::Vocabulary,
        "i" => Format::Italic,
        "b" | "em" | "strong" => Format::Bold,
        "a" => Format::Link,
        _ => return None,
    })
}

fn push_run(out: &mut Vec<FormattedText>, text: &str, stack: &[Format], links: &[String]) {
    if text.is_empty() {
        return;
    }
    out.push(FormattedText {
        format: stack.to_vec(),
        text: text.to_owned(),
        link_url: links.last().filter(|url| !url.is_empty()).cloned(),
    });
}

/// Splits `input` into runs, each carrying the styles open at that point.
///
/// Closing tags pop the innermost open style whatever their name; a closing
/// tag with nothing open is dropped. Brackets that do not form a known tag are
/// kept as text.
pub fn format_text(input: &str) -> Vec<FormattedText> {
    let mut out = Vec::new();
    let mut stack: Vec<Format> = Vec::new();
    let mut links: Vec<String> = Vec::new();
    let mut last = 0;

    for caps in TAG.captures_iter(input) {
        let (Some(whole), Some(tag)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        push_run(&mut out, &input[last..whole.start()], &stack, &links);
        last = whole.end();

        let tag = tag.as_str();
        if tag.starts_with('/') {
            if stack.pop() == Some(Format::Link) {
                links.pop();
            }
        } else if let Some(format) = format_for(tag) {
            if format == Format::Link {
                links.push(caps.get(2).map_or_else(String::new, |m| m.as_str().to_owned()));
            }
            stack.push(format);
        }
    }
    push_run(&mut out, &input[last..], &stack, &links);
    out
}
