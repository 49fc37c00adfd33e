// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
//! Final string assembly, one strategy per [`TruncationMode`].

use cmdbridge_config::TruncationMode;

use crate::keywords;
use crate::select::Selection;

pub const SUMMARY_ONLY_NOTICE: &str = "[summary-only mode: full content hidden; call \
configure_output_truncation with truncation_mode=\"smart\" to show it]";

const ESSENTIAL_HEADER: &str = "key information:";
const ESSENTIAL_FALLBACK_LINES: usize = 3;

/// Render `selection` according to the mode recorded in its metadata.
pub fn render(original: &str, selection: &Selection, summary: &str) -> String {
    match selection.metadata.mode {
        TruncationMode::None => original.to_string(),
        TruncationMode::SummaryOnly => summary_only(summary),
        TruncationMode::Essential => essential(selection, summary),
        TruncationMode::Smart => smart(selection, summary),
    }
}

pub fn summary_only(summary: &str) -> String {
    format!("{summary}\n\n{SUMMARY_ONLY_NOTICE}")
}

pub fn essential(selection: &Selection, summary: &str) -> String {
    let mut lines: Vec<&str> = selection
        .lines
        .iter()
        .map(String::as_str)
        .filter(|l| keywords::is_important(l))
        .collect();
    if lines.is_empty() {
        lines = selection
            .lines
            .iter()
            .take(ESSENTIAL_FALLBACK_LINES)
            .map(String::as_str)
            .collect();
    }
    let body = lines.join("\n");
    [ESSENTIAL_HEADER, body.as_str(), summary].join("\n\n")
}

pub fn smart(selection: &Selection, summary: &str) -> String {
    let meta = &selection.metadata;
    let body = selection.text();
    let mut parts: Vec<String> = Vec::new();

    if meta.was_truncated() {
        parts.push(format!(
            "[output truncated: showing {}/{} chars, {}/{} lines]",
            meta.truncated_length, meta.original_length, meta.truncated_lines, meta.original_lines
        ));
    }

    if !body.trim().is_empty() {
        parts.push(body);
    }

    parts.push(summary.to_string());

    parts.push(format!(
        "truncation details:\n\
         - original: {} lines, {} chars\n\
         - displayed: {} lines, {} chars\n\
         - compression: {:.1}%\n\
         - mode: {}\n\
         - command type: {}",
        meta.original_lines,
        meta.original_length,
        meta.truncated_lines,
        meta.truncated_length,
        meta.compression_ratio() * 100.0,
        meta.mode,
        meta.command_type.as_deref().unwrap_or("general"),
    ));

    if meta.was_truncated() {
        if let Some(hint) = suggestion(meta.command_type.as_deref()) {
            parts.push(format!("hint: {hint}"));
        }
    }

    parts.join("\n\n")
}

/// Usage hint for narrowing the output of a given command type.
pub fn suggestion(command_type: Option<&str>) -> Option<&'static str> {
    let hint = command_type?.to_lowercase();
    if hint.contains("list") {
        Some("pipe through `| head -n 20` to limit the listing")
    } else if hint.contains("grep") {
        Some("use `| head -n 10` or `grep -m 5` to limit matches")
    } else if hint.contains("cat") || hint.contains("tail") {
        Some("use `| head -n 50` to limit lines")
    } else {
        None
    }
}
