// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
//! Short, bounded digest of a text blob.

use crate::keywords;

/// Only the first this-many lines are scanned for key lines.
const KEY_LINE_SCAN: usize = 50;
const MAX_KEY_LINES: usize = 3;
const TAIL_SCAN: usize = 5;
const MAX_TAIL_LINES: usize = 2;
const MAX_TAIL_LINE_CHARS: usize = 100;

/// Counts and excerpts gathered from one text blob.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContentSummary {
    pub total_lines: usize,
    pub total_chars: usize,
    pub error_count: usize,
    pub warning_count: usize,
    pub file_count: usize,
    /// `(1-based line number, trimmed content)` of the key lines found in the
    /// first 50 lines.
    pub key_lines: Vec<(usize, String)>,
    /// Non-empty, short lines among the last five, in document order.
    pub tail_lines: Vec<String>,
}

impl ContentSummary {
    pub fn analyze(text: &str) -> Self {
        let lines: Vec<&str> = text.trim().split('\n').collect();

        let mut summary = Self {
            total_lines: lines.len(),
            total_chars: text.chars().count(),
            ..Self::default()
        };

        for line in &lines {
            if keywords::is_error(line) {
                summary.error_count += 1;
            }
            if keywords::is_warning(line) {
                summary.warning_count += 1;
            }
            if keywords::mentions_file(line) {
                summary.file_count += 1;
            }
        }

        summary.key_lines = lines
            .iter()
            .take(KEY_LINE_SCAN)
            .enumerate()
            .filter(|(_, line)| keywords::is_key_line(line))
            .map(|(i, line)| (i + 1, line.trim().to_string()))
            .collect();

        let tail_start = lines.len().saturating_sub(TAIL_SCAN);
        summary.tail_lines = lines[tail_start..]
            .iter()
            .map(|l| l.trim())
            .filter(|l| !l.is_empty() && l.chars().count() < MAX_TAIL_LINE_CHARS)
            .map(str::to_string)
            .collect();

        summary
    }

    /// Render as newline-joined text no longer than `max_len` characters.
    pub fn render(&self, max_len: usize) -> String {
        let mut parts = vec![format!(
            "content summary ({} total lines, {} total chars)",
            self.total_lines, self.total_chars
        )];

        if self.error_count > 0 {
            parts.push(format!("errors: {}", self.error_count));
        }
        if self.warning_count > 0 {
            parts.push(format!("warnings: {}", self.warning_count));
        }
        if self.file_count > 0 {
            parts.push(format!("files mentioned: {}", self.file_count));
        }

        if !self.key_lines.is_empty() {
            parts.push("key lines:".to_string());
            parts.extend(
                self.key_lines
                    .iter()
                    .take(MAX_KEY_LINES)
                    .map(|(n, line)| format!("L{n}: {line}")),
            );
        }

        if self.error_count == 0 && !self.tail_lines.is_empty() {
            parts.push("last lines:".to_string());
            let skip = self.tail_lines.len().saturating_sub(MAX_TAIL_LINES);
            parts.extend(self.tail_lines[skip..].iter().cloned());
        }

        clip(&parts.join("\n"), max_len)
    }
}

/// Summarize `text` in at most `max_len` characters.
pub fn summarize(text: &str, max_len: usize) -> String {
    ContentSummary::analyze(text).render(max_len)
}

fn clip(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        return s.to_string();
    }
    if max_len < 3 {
        return s.chars().take(max_len).collect();
    }
    let mut out: String = s.chars().take(max_len - 3).collect();
    out.push_str("...");
    out
}
