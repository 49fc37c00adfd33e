// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
//! Adaptive truncation of process output.
//!
//! Raw bytes go through [`is_binary`] and [`decode`]; the resulting text is
//! cut down by [`ImportanceSelector`], summarized by [`summarize`] and
//! assembled by [`render`] according to the active [`TruncationMode`].
//! [`Truncator`] wires those steps together around a
//! [`SharedTruncationConfig`].
//!
//! Every entry point is total: any input yields a string.

mod binary;
mod decode;
pub mod keywords;
mod render;
mod select;
mod settings;
mod summary;

pub use binary::{binary_placeholder, is_binary};
pub use cmdbridge_config::TruncationMode;
pub use decode::{decode, decode_with_encoding};
pub use render::{render, suggestion, SUMMARY_ONLY_NOTICE};
pub use select::{line_count, ImportanceSelector, Selection, TruncationMetadata, DEFAULT_TRIM_RESERVE};
pub use settings::{
    SharedTruncationConfig, TruncationConfig, MAX_MAX_LENGTH, MAX_MAX_LINES, MIN_MAX_LENGTH,
    MIN_MAX_LINES,
};
pub use summary::{summarize, ContentSummary};

use cmdbridge_config::TruncationSection;
use tracing::debug;

pub const DEFAULT_SUMMARY_LENGTH: usize = 200;

/// Entry point used by the tools: snapshot config, select, summarize, render.
#[derive(Debug, Clone)]
pub struct Truncator {
    config: SharedTruncationConfig,
    summary_length: usize,
    summary_reserve: usize,
}

impl Truncator {
    pub fn new(config: SharedTruncationConfig) -> Self {
        Self {
            config,
            summary_length: DEFAULT_SUMMARY_LENGTH,
            summary_reserve: DEFAULT_TRIM_RESERVE,
        }
    }

    /// Build a truncator and a fresh shared config from the `[truncation]`
    /// config section.
    pub fn from_section(section: &TruncationSection) -> Self {
        Self::new(SharedTruncationConfig::new(TruncationConfig::from_section(section)))
            .with_summary_length(section.summary_length)
            .with_summary_reserve(section.summary_reserve)
    }

    pub fn with_summary_length(mut self, n: usize) -> Self {
        self.summary_length = n;
        self
    }

    pub fn with_summary_reserve(mut self, n: usize) -> Self {
        self.summary_reserve = n;
        self
    }

    /// Handle to the live settings; clones share state with this truncator.
    pub fn config(&self) -> &SharedTruncationConfig {
        &self.config
    }

    /// Bound `text` for a token-constrained reader.
    ///
    /// Empty text, mode `none`, and text already within budget are returned
    /// verbatim.
    pub fn truncate(&self, text: &str, command_type: Option<&str>) -> String {
        let cfg = self.config.snapshot();
        if text.is_empty() || cfg.mode == TruncationMode::None {
            return text.to_string();
        }

        let selector = ImportanceSelector {
            preserve_errors: cfg.preserve_errors,
            trim_reserve: self.summary_reserve,
            mode: cfg.mode,
        };
        let selection = selector.select(text, cfg.max_length, cfg.max_lines, command_type);
        let meta = &selection.metadata;
        if !meta.was_truncated() {
            return text.to_string();
        }

        debug!(
            mode = %meta.mode,
            command_type = command_type.unwrap_or("general"),
            original_chars = meta.original_length,
            original_lines = meta.original_lines,
            kept_chars = meta.truncated_length,
            kept_lines = meta.truncated_lines,
            "output truncated"
        );

        let summary = summarize(text, self.summary_length);
        render(text, &selection, &summary)
    }

    /// Classify, decode and truncate one raw output stream.
    pub fn render_stream(&self, data: &[u8], command_type: Option<&str>) -> String {
        if is_binary(data) {
            debug!(bytes = data.len(), "binary output replaced by placeholder");
            return binary_placeholder(data.len());
        }
        self.truncate(&decode(data), command_type)
    }
}

impl Default for Truncator {
    fn default() -> Self {
        Self::new(SharedTruncationConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn five_hundred_with_error() -> String {
        let mut lines: Vec<String> = (1..=500).map(|k| format!("INFO line {k}")).collect();
        lines.insert(249, "ERROR: disk full".into());
        lines.join("\n")
    }

    fn truncator_with(f: impl FnOnce(&mut TruncationConfig)) -> Truncator {
        let t = Truncator::default();
        t.config().update(f);
        t
    }

    // ── truncate ─────────────────────────────────────────────────────────────

    #[test]
    fn empty_text_passes_through() {
        assert_eq!(Truncator::default().truncate("", Some("execute_command")), "");
    }

    #[test]
    fn short_text_passes_through() {
        assert_eq!(Truncator::default().truncate("hello\nworld", None), "hello\nworld");
    }

    #[test]
    fn smart_mode_keeps_error_and_reports() {
        let t = truncator_with(|c| c.set_max_lines(50));
        let out = t.truncate(&five_hundred_with_error(), None);
        assert!(out.starts_with("[output truncated: showing "));
        assert!(out.contains("\nERROR: disk full\n"));
        assert!(out.contains("errors: 1"));
        assert!(out.contains("- original: 501 lines"));
    }

    #[test]
    fn mode_none_returns_large_text_verbatim() {
        let text = five_hundred_with_error().repeat(20);
        let t = truncator_with(|c| c.set_mode(TruncationMode::None));
        assert_eq!(t.truncate(&text, None), text);
    }

    #[test]
    fn summary_only_mode_hides_payload() {
        let t = truncator_with(|c| {
            c.set_max_lines(50);
            c.set_mode(TruncationMode::SummaryOnly);
        });
        let out = t.truncate(&five_hundred_with_error(), None);
        assert!(out.ends_with(SUMMARY_ONLY_NOTICE));
        assert!(!out.contains("INFO line 1\n"));
    }

    #[test]
    fn essential_mode_shows_error_line() {
        let t = truncator_with(|c| {
            c.set_max_lines(50);
            c.set_mode(TruncationMode::Essential);
        });
        let out = t.truncate(&five_hundred_with_error(), None);
        assert!(out.starts_with("key information:\n\nERROR: disk full\n\n"));
    }

    #[test]
    fn config_change_applies_to_next_call() {
        let t = Truncator::default();
        let text = five_hundred_with_error();
        assert!(t.truncate(&text, None).starts_with("[output truncated"));
        t.config().update(|c| c.disable());
        assert_eq!(t.truncate(&text, None), text);
    }

    #[test]
    fn from_section_applies_tuning() {
        let section = TruncationSection {
            max_lines: 50,
            summary_length: 40,
            ..TruncationSection::default()
        };
        let t = Truncator::from_section(&section);
        assert_eq!(t.config().snapshot().max_lines, 50);
        let out = t.truncate(&five_hundred_with_error(), None);
        let summary = out.split("\n\n").find(|s| s.starts_with("content summary")).unwrap();
        assert!(summary.chars().count() <= 40);
    }

    // ── render_stream ────────────────────────────────────────────────────────

    #[test]
    fn binary_stream_becomes_placeholder() {
        let data: Vec<u8> = (0u8..=255).collect();
        assert_eq!(
            Truncator::default().render_stream(&data, None),
            "[binary data, 256 bytes]"
        );
    }

    #[test]
    fn text_stream_is_decoded_and_trimmed() {
        assert_eq!(Truncator::default().render_stream(b"  ok\n", None), "ok");
    }
}
