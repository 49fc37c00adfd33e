// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
//! Keyword heuristics shared by the summarizer, the selector and the
//! essential-mode renderer, so all three agree on what a line means.

/// Lines that signal an error, success or completion state.
pub const IMPORTANT: &[&str] = &["error", "fail", "exception", "failed", "success", "complete"];

/// Lines counted as errors in the summary.
pub const ERROR: &[&str] = &["error", "fail", "exception", "failed"];

pub const WARNING: &[&str] = &["warning"];

/// Lines worth quoting in the summary.
pub const KEY_LINE: &[&str] = &["error", "fail", "success", "result", "summary", "total"];

/// Heading / separator prefixes that also make a line a key line.
pub const KEY_LINE_PREFIXES: &[&str] = &["===", "---", "#"];

/// Extensions that mark a line as a file mention.
pub const FILE_EXTENSIONS: &[&str] = &[
    ".py", ".js", ".json", ".yml", ".yaml", ".txt", ".rs", ".toml", ".md",
];

/// Case-insensitive substring match against any of `keywords`.
pub fn contains_any(line: &str, keywords: &[&str]) -> bool {
    let lower = line.to_lowercase();
    keywords.iter().any(|k| lower.contains(k))
}

pub fn is_important(line: &str) -> bool {
    contains_any(line, IMPORTANT)
}

pub fn is_error(line: &str) -> bool {
    contains_any(line, ERROR)
}

pub fn is_warning(line: &str) -> bool {
    contains_any(line, WARNING)
}

pub fn is_key_line(line: &str) -> bool {
    contains_any(line, KEY_LINE) || KEY_LINE_PREFIXES.iter().any(|p| line.starts_with(p))
}

pub fn mentions_file(line: &str) -> bool {
    let trimmed = line.trim();
    FILE_EXTENSIONS.iter().any(|ext| trimmed.ends_with(ext))
}
