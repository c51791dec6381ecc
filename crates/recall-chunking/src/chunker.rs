//! Oversized-document chunking.
//!
//! Anchor sections are the preferred boundary. When a document has fewer
//! than two closed anchors, or its anchors collapse into a single chunk, the
//! chunker falls back to splitting before `#`/`##` headings and, inside
//! oversized parts, at blank-line paragraph breaks.
//!
//! All sizes are measured in chars.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use recall_core::config::ChunkingConfig;

use crate::anchor::{extract_sections, AnchorSection};

static PARAGRAPH_BREAK: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"\n\n+").ok());

const JOINER: &str = "\n\n";

/// Which splitting strategy produced a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChunkStrategy {
    Anchor,
    Structure,
}

impl ChunkStrategy {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Anchor => "anchor",
            Self::Structure => "structure",
        }
    }
}

/// One indexable piece of a large document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    /// Trimmed text.
    pub content: String,
    /// Anchors covered by this chunk. Empty for structure chunks.
    pub anchor_ids: Vec<String>,
    pub label: String,
    /// Char count before trimming.
    pub char_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkingResult {
    pub strategy: ChunkStrategy,
    pub chunks: Vec<Chunk>,
    /// Leading slice of the document, stored on the parent record.
    pub parent_summary: String,
}

/// Greedy accumulator shared by both strategies.
struct Accumulator {
    target: usize,
    chunks: Vec<Chunk>,
    content: String,
    anchors: Vec<String>,
    size: usize,
}

impl Accumulator {
    fn new(target: usize) -> Self {
        Self {
            target,
            chunks: Vec::new(),
            content: String::new(),
            anchors: Vec::new(),
            size: 0,
        }
    }

    /// Append a piece, flushing first if it would push the open chunk past target.
    fn push(&mut self, piece: &str, piece_chars: usize, anchor: Option<&str>, label: fn(&Self) -> String) {
        if self.size + piece_chars > self.target && !self.content.trim().is_empty() {
            self.flush(label);
        }
        if !self.content.is_empty() {
            self.content.push_str(JOINER);
        }
        self.content.push_str(piece);
        if let Some(id) = anchor {
            self.anchors.push(id.to_string());
        }
        self.size += piece_chars;
    }

    fn flush(&mut self, label: fn(&Self) -> String) {
        if !self.content.trim().is_empty() {
            let label = label(self);
            self.chunks.push(Chunk {
                content: self.content.trim().to_string(),
                anchor_ids: std::mem::take(&mut self.anchors),
                label,
                char_count: self.content.chars().count(),
            });
        }
        self.content.clear();
        self.anchors.clear();
        self.size = 0;
    }
}

fn anchor_label(acc: &Accumulator) -> String {
    match acc.anchors.as_slice() {
        [] => String::new(),
        [only] => only.clone(),
        [first, .., last] => format!("{first}..{last}"),
    }
}

fn structure_label(acc: &Accumulator) -> String {
    format!("chunk-{}", acc.chunks.len() + 1)
}

/// Splits oversized documents according to a [`ChunkingConfig`].
#[derive(Debug, Clone)]
pub struct Chunker {
    config: ChunkingConfig,
}

impl Default for Chunker {
    fn default() -> Self {
        Self::new(&ChunkingConfig::default())
    }
}

impl Chunker {
    pub fn new(config: &ChunkingConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }

    pub fn config(&self) -> &ChunkingConfig {
        &self.config
    }

    /// Whether a document is large enough to be chunked.
    pub fn needs_chunking(&self, content: &str) -> bool {
        content.chars().count() > self.config.trigger_chars
    }

    /// Chunk a document, preferring anchor boundaries.
    pub fn chunk_large_file(&self, content: &str) -> ChunkingResult {
        let parent_summary = content
            .chars()
            .take(self.config.parent_summary_chars)
            .collect::<String>()
            .trim()
            .to_string();

        let sections = extract_sections(content);
        if sections.len() >= 2 {
            let chunks = self.chunk_by_anchors(&sections);
            if chunks.len() >= 2 {
                return ChunkingResult {
                    strategy: ChunkStrategy::Anchor,
                    chunks,
                    parent_summary,
                };
            }
        }

        ChunkingResult {
            strategy: ChunkStrategy::Structure,
            chunks: self.chunk_by_structure(content),
            parent_summary,
        }
    }

    /// Merge adjacent sections up to the target size. A section above the
    /// hard cap always stands alone.
    pub fn chunk_by_anchors(&self, sections: &[AnchorSection]) -> Vec<Chunk> {
        let mut acc = Accumulator::new(self.config.target_chars);
        for section in sections {
            if section.char_count > self.config.max_chars {
                acc.flush(anchor_label);
                acc.chunks.push(Chunk {
                    content: section.content.trim().to_string(),
                    anchor_ids: vec![section.id.clone()],
                    label: section.id.clone(),
                    char_count: section.char_count,
                });
                continue;
            }
            acc.push(&section.content, section.char_count, Some(&section.id), anchor_label);
        }
        acc.flush(anchor_label);
        acc.chunks
    }

    /// Heading-delimited chunks, re-split by paragraph when a part exceeds the cap.
    pub fn chunk_by_structure(&self, content: &str) -> Vec<Chunk> {
        let mut acc = Accumulator::new(self.config.target_chars);
        for part in split_before_headings(content) {
            if part.trim().is_empty() {
                continue;
            }
            let part_chars = part.chars().count();
            if part_chars > self.config.max_chars {
                acc.flush(structure_label);
                for paragraph in split_paragraphs(part) {
                    if paragraph.trim().is_empty() {
                        continue;
                    }
                    acc.push(paragraph, paragraph.chars().count(), None, structure_label);
                }
                continue;
            }
            acc.push(part, part_chars, None, structure_label);
        }
        acc.flush(structure_label);
        acc.chunks
    }
}

/// True when a line opens an h1 or h2 heading.
fn is_top_heading(line: &str) -> bool {
    let hashes = line.bytes().take_while(|b| *b == b'#').count();
    (1..=2).contains(&hashes)
        && line[hashes..]
            .chars()
            .next()
            .is_some_and(char::is_whitespace)
}

/// Split so that every part after the first starts at an h1/h2 heading line.
fn split_before_headings(content: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut start = 0;
    let mut line_start = 0;
    for line in content.split_inclusive('\n') {
        if line_start > start && is_top_heading(line) {
            parts.push(&content[start..line_start]);
            start = line_start;
        }
        line_start += line.len();
    }
    if start < content.len() {
        parts.push(&content[start..]);
    }
    parts
}

fn split_paragraphs(part: &str) -> Vec<&str> {
    match PARAGRAPH_BREAK.as_ref() {
        Some(re) => re.split(part).collect(),
        None => vec![part],
    }
}
