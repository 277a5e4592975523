//! Description extraction for slide text.
//!
//! Tracker descriptions are long and full of wiki markup. A slide only has room for
//! a few lines, so the extractor carves a window out of the text with configured
//! begin/end patterns and falls back to the plain lines when none of them match.

use regex::Regex;
use std::sync::LazyLock;

use crate::config::{Configuration, DescriptionPattern};

/// Lines excluded from the fallback: headings and platform release notes.
static FALLBACK_EXCLUDE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(h\d|Android \d|iOS \d|AppService \d)").unwrap());

/// Heading markup at the start of a line, e.g. `h2. `.
static HEADING_PREFIX_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^h\d\.\s*").unwrap());

/// Underscore emphasis markup.
const EMPHASIS_CHAR: char = '_';

/// Result of a successful extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedDescription {
    /// Cleansed text, possibly empty.
    pub text: String,

    /// The pattern that carved the window, `None` when the fallback was used.
    pub pattern: Option<DescriptionPattern>,
}

impl ExtractedDescription {
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

#[derive(Debug, Clone)]
struct CompiledPattern {
    source: DescriptionPattern,
    begin_after: Regex,
    end_before: Regex,
}

/// Derives a short, presentable description from a raw item description.
#[derive(Debug, Clone)]
pub struct DescriptionExtractor {
    patterns: Vec<CompiledPattern>,
    max_lines: usize,
    trim_chars: Vec<char>,
}

impl DescriptionExtractor {
    /// Compile the patterns. Patterns that fail to compile are skipped with a warning.
    pub fn new(patterns: &[DescriptionPattern], max_lines: usize) -> Self {
        let patterns = patterns
            .iter()
            .filter_map(|pattern| {
                match (
                    Regex::new(&pattern.begin_after),
                    Regex::new(&pattern.end_before),
                ) {
                    (Ok(begin_after), Ok(end_before)) => Some(CompiledPattern {
                        source: pattern.clone(),
                        begin_after,
                        end_before,
                    }),
                    (Err(e), _) | (_, Err(e)) => {
                        log::warn!("Skipping description pattern {:?}: {}", pattern, e);
                        None
                    }
                }
            })
            .collect();

        Self {
            patterns,
            max_lines,
            trim_chars: "*:".chars().collect(),
        }
    }

    /// Build an extractor from the description settings of a configuration.
    pub fn from_config(config: &Configuration) -> Self {
        Self::new(&config.description_patterns, config.description_lines_max)
            .with_trim_chars(&config.description_trim_chars)
    }

    /// Set the characters trimmed from both ends of every line, besides whitespace.
    pub fn with_trim_chars(mut self, chars: &str) -> Self {
        self.trim_chars = chars.chars().collect();
        self
    }

    /// Extract the cleansed description.
    ///
    /// Returns `None` only when there is no raw description at all. An empty text
    /// means a description exists but nothing survived cleansing.
    pub fn extract(&self, raw: Option<&str>) -> Option<ExtractedDescription> {
        let raw = unify_line_breaks(raw?);

        let lines = normalized_lines(&raw);
        let text = lines.join("\n");

        let (candidate, pattern) = match self.match_window(&text) {
            Some((window, pattern)) => (window.split('\n').collect::<Vec<_>>(), Some(pattern)),
            None => {
                let fallback = lines
                    .iter()
                    .copied()
                    .filter(|line| !line.is_empty() && !FALLBACK_EXCLUDE_REGEX.is_match(line))
                    .collect();
                (fallback, None)
            }
        };

        let text = trim_blank_edges(&candidate)
            .iter()
            .take(self.max_lines)
            .map(|line| self.cleanse_line(line))
            .fold(String::new(), |mut acc, line| {
                if !acc.is_empty() {
                    acc.push('\n');
                }
                acc.push_str(&line);
                acc
            });

        Some(ExtractedDescription { text, pattern })
    }

    /// Text between the first matching begin/end pair, tried in configured order.
    fn match_window<'t>(&self, text: &'t str) -> Option<(&'t str, DescriptionPattern)> {
        self.patterns.iter().find_map(|pattern| {
            let begin = pattern.begin_after.find(text)?;
            let rest = &text[begin.end()..];
            let end = pattern.end_before.find(rest)?;
            Some((&rest[..end.start()], pattern.source.clone()))
        })
    }

    fn cleanse_line(&self, line: &str) -> String {
        let line = HEADING_PREFIX_REGEX.replace(line, "");
        line.trim_matches(|c: char| c.is_whitespace() || self.trim_chars.contains(&c))
            .chars()
            .filter(|c| *c != EMPHASIS_CHAR)
            .collect()
    }
}

/// Rewrite `\r\n`, lone `\r` and the Unicode line separators as `\n`.
fn unify_line_breaks(raw: &str) -> String {
    raw.replace("\r\n", "\n")
        .replace(['\r', '\u{0B}', '\u{0C}', '\u{85}', '\u{2028}', '\u{2029}'], "\n")
}

/// Trim every line and drop blank lines at both ends.
fn normalized_lines(raw: &str) -> Vec<&str> {
    let trimmed: Vec<&str> = raw
        .split('\n')
        .map(str::trim)
        .collect();

    trim_blank_edges(&trimmed).to_vec()
}

fn trim_blank_edges<'s, 'l>(lines: &'s [&'l str]) -> &'s [&'l str] {
    let start = lines
        .iter()
        .position(|line| !line.trim().is_empty())
        .unwrap_or(lines.len());
    let end = lines
        .iter()
        .rposition(|line| !line.trim().is_empty())
        .map_or(start, |i| i + 1);
    &lines[start..end]
}
