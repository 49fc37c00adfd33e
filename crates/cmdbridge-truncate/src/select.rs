// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
//! Importance-ranked line selection under a character and a line budget.
//!
//! Lines are picked in three tiers:
//!
//! 1. **important** lines (error / status keywords), in document order;
//! 2. **contextual** lines from the head (first 50% of the line budget) and
//!    tail (last 30%) of the document;
//! 3. **representative** markers `[...line K...] <prefix>...` sampled at a
//!    fixed stride from whatever is left.
//!
//! A final line-granular trim brings the joined text under the character
//! budget minus a reserve kept free for the summary rendered next to it.

use std::collections::HashSet;

use cmdbridge_config::TruncationMode;

use crate::keywords;

/// Characters of the sampled line shown after a representative marker.
const MARKER_PREFIX_CHARS: usize = 50;

/// Hard caps applied when a command-type hint widens the budgets.
const DIAGNOSTIC_MAX_LENGTH: usize = 12_000;
const DIAGNOSTIC_MAX_LINES: usize = 300;

/// Default characters held back during the final trim.
pub const DEFAULT_TRIM_RESERVE: usize = 200;

// ─── Metadata ────────────────────────────────────────────────────────────────

/// Figures describing one truncation call.
#[derive(Debug, Clone, PartialEq)]
pub struct TruncationMetadata {
    pub original_length: usize,
    pub original_lines: usize,
    pub truncated_length: usize,
    pub truncated_lines: usize,
    pub mode: TruncationMode,
    pub command_type: Option<String>,
}

impl TruncationMetadata {
    fn unchanged(text: &str, mode: TruncationMode, command_type: Option<&str>) -> Self {
        let length = text.chars().count();
        let lines = line_count(text);
        Self {
            original_length: length,
            original_lines: lines,
            truncated_length: length,
            truncated_lines: lines,
            mode,
            command_type: command_type.map(str::to_string),
        }
    }

    pub fn was_truncated(&self) -> bool {
        self.original_length > self.truncated_length || self.original_lines > self.truncated_lines
    }

    /// `truncated_length / max(original_length, 1)`.
    pub fn compression_ratio(&self) -> f64 {
        self.truncated_length as f64 / self.original_length.max(1) as f64
    }
}

/// Lines kept by [`ImportanceSelector::select`], plus the call's metadata.
#[derive(Debug, Clone)]
pub struct Selection {
    pub lines: Vec<String>,
    pub metadata: TruncationMetadata,
}

impl Selection {
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }
}

/// Lines are counted by newline separators; the empty string is one line.
pub fn line_count(text: &str) -> usize {
    text.matches('\n').count() + 1
}

// ─── Selector ────────────────────────────────────────────────────────────────

/// Shape of the output a command-type hint suggests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputKind {
    Diagnostic,
    Listing,
    General,
}

impl OutputKind {
    fn classify(command_type: Option<&str>) -> Self {
        let Some(hint) = command_type.map(str::to_lowercase) else {
            return OutputKind::General;
        };
        if ["error", "log", "debug"].iter().any(|k| hint.contains(k)) {
            OutputKind::Diagnostic
        } else if ["list", "ls", "find"].iter().any(|k| hint.contains(k)) {
            OutputKind::Listing
        } else {
            OutputKind::General
        }
    }

    /// Adjusted `(max_length, max_lines)`.
    fn adapt(self, max_length: usize, max_lines: usize) -> (usize, usize) {
        match self {
            OutputKind::Diagnostic => (
                (max_length * 3 / 2).min(DIAGNOSTIC_MAX_LENGTH),
                (max_lines * 6 / 5).min(DIAGNOSTIC_MAX_LINES),
            ),
            OutputKind::Listing => (max_length * 4 / 5, max_lines * 4 / 5),
            OutputKind::General => (max_length, max_lines),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ImportanceSelector {
    /// Run the important-lines tier before positional context.
    pub preserve_errors: bool,
    /// Characters held back from `max_length` in the final trim.
    pub trim_reserve: usize,
    /// Recorded into the metadata; selection itself is mode-agnostic.
    pub mode: TruncationMode,
}

impl Default for ImportanceSelector {
    fn default() -> Self {
        Self {
            preserve_errors: true,
            trim_reserve: DEFAULT_TRIM_RESERVE,
            mode: TruncationMode::Smart,
        }
    }
}

impl ImportanceSelector {
    pub fn select(
        &self,
        text: &str,
        max_length: usize,
        max_lines: usize,
        command_type: Option<&str>,
    ) -> Selection {
        let mut metadata = TruncationMetadata::unchanged(text, self.mode, command_type);
        let passthrough = |metadata: TruncationMetadata| Selection {
            lines: text.split('\n').map(str::to_string).collect(),
            metadata,
        };

        if metadata.original_length <= max_length && metadata.original_lines <= max_lines {
            return passthrough(metadata);
        }

        let (max_length, max_lines) =
            OutputKind::classify(command_type).adapt(max_length, max_lines);
        if metadata.original_length <= max_length && metadata.original_lines <= max_lines {
            return passthrough(metadata);
        }

        let lines: Vec<&str> = text.split('\n').collect();
        let total = lines.len();
        let keep_start = max_lines / 2;
        let keep_end = max_lines * 3 / 10;

        let mut selected: Vec<String> = Vec::new();
        let mut seen: HashSet<usize> = HashSet::new();

        // Tier 1: important lines.
        if self.preserve_errors {
            let cap = max_lines.saturating_sub(3);
            for (i, line) in lines.iter().enumerate() {
                if selected.len() >= cap {
                    break;
                }
                if keywords::is_important(line) {
                    selected.push((*line).to_string());
                    seen.insert(i);
                }
            }
        }

        // Tier 2: head and tail context.
        let cap = max_lines.saturating_sub(2);
        for (i, line) in lines.iter().enumerate() {
            if selected.len() >= cap {
                break;
            }
            let positional = i < keep_start || i >= total.saturating_sub(keep_end);
            if positional && seen.insert(i) {
                selected.push((*line).to_string());
            }
        }

        // Tier 3: representative markers, spliced in ahead of the last line.
        let cap = max_lines.saturating_sub(1);
        if selected.len() < cap {
            let step = (total / (max_lines - selected.len())).max(1);
            for i in (0..total).step_by(step) {
                if selected.len() >= cap {
                    break;
                }
                if seen.contains(&i) {
                    continue;
                }
                let prefix: String = lines[i].chars().take(MARKER_PREFIX_CHARS).collect();
                let marker = format!("[...line {}...] {prefix}...", i + 1);
                let at = selected.len().saturating_sub(1);
                selected.insert(at, marker);
            }
        }

        if joined_len(&selected) > max_length {
            selected = self.trim_to_length(selected, max_length);
        }

        metadata.truncated_length = joined_len(&selected);
        metadata.truncated_lines = selected.len();
        Selection { lines: selected, metadata }
    }

    /// Keep whole lines, in order, while the joined length plus the reserve
    /// stays within `max_length`.  If not even the first line fits, keep a
    /// clipped prefix of it instead of nothing.
    fn trim_to_length(&self, selected: Vec<String>, max_length: usize) -> Vec<String> {
        let budget = max_length.saturating_sub(self.trim_reserve);
        let mut kept = Vec::new();
        let mut used = 0usize;

        for line in &selected {
            let len = line.chars().count();
            if used + len + 1 > budget {
                break;
            }
            used += len + 1;
            kept.push(line.clone());
        }

        if kept.is_empty() && budget > 3 {
            if let Some(first) = selected.first() {
                let mut clipped: String = first.chars().take(budget - 3).collect();
                clipped.push_str("...");
                kept.push(clipped);
            }
        }
        kept
    }
}

fn joined_len(lines: &[String]) -> usize {
    let chars: usize = lines.iter().map(|l| l.chars().count()).sum();
    chars + lines.len().saturating_sub(1)
}
