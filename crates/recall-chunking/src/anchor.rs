//! ANCHOR section extraction.
//!
//! A section runs from `<!-- ANCHOR:id -->` through the matching
//! `<!-- /ANCHOR:id -->`, tags included. Tag names are case-insensitive and
//! an id is any run of characters other than whitespace and `>`, so `ref:x`
//! and `a/b` are valid ids. Opening tags without a closing partner are ignored.
//!
//! Extraction is non-overlapping: an anchor nested inside another section is
//! never returned as a section of its own, it stays in its parent's content.

use std::sync::LazyLock;

use regex::Regex;

static ANCHOR_OPEN: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(?i)<!--\s*ANCHOR:\s*([^>\s]+)\s*-->").ok());

/// One closed anchor section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnchorSection {
    pub id: String,
    pub content: String,
    /// Length in chars.
    pub char_count: usize,
}

fn closing_tag(id: &str) -> Option<Regex> {
    Regex::new(&format!(r"(?i)<!--\s*/ANCHOR:\s*{}\s*-->", regex::escape(id))).ok()
}

/// Extract closed anchor sections in document order. Scanning resumes after
/// each closing tag, so nested anchors belong to their enclosing section.
pub fn extract_sections(content: &str) -> Vec<AnchorSection> {
    let Some(open) = ANCHOR_OPEN.as_ref() else {
        return Vec::new();
    };

    let mut sections = Vec::new();
    let mut pos = 0;
    while let Some(caps) = open.captures_at(content, pos) {
        let (Some(whole), Some(id)) = (caps.get(0), caps.get(1)) else {
            break;
        };
        let id = id.as_str();
        let close = closing_tag(id).and_then(|re| re.find_at(content, whole.end()));
        match close {
            Some(close) => {
                let section = &content[whole.start()..close.end()];
                sections.push(AnchorSection {
                    id: id.to_string(),
                    content: section.to_string(),
                    char_count: section.chars().count(),
                });
                pos = close.end();
            }
            None => pos = whole.end(),
        }
    }
    sections
}

/// Anchor ids present in a piece of text, opening tags only.
pub fn anchor_ids(content: &str) -> Vec<String> {
    ANCHOR_OPEN
        .as_ref()
        .map(|re| {
            re.captures_iter(content)
                .filter_map(|c| c.get(1).map(|m| m.as_str().to_string()))
                .collect()
        })
        .unwrap_or_default()
}
