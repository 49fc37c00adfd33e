// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
//! Runtime truncation settings.
//!
//! [`TruncationConfig`] is a plain `Copy` value; [`SharedTruncationConfig`]
//! is the process-wide handle that every truncation call snapshots at entry.
//! A configuration change made while a call is in flight is therefore never
//! observed half-way through that call.

use std::sync::{Arc, PoisonError, RwLock};

use cmdbridge_config::{TruncationMode, TruncationSection};

pub const MIN_MAX_LENGTH: usize = 1_000;
pub const MAX_MAX_LENGTH: usize = 50_000;
pub const MIN_MAX_LINES: usize = 50;
pub const MAX_MAX_LINES: usize = 1_000;

/// Budgets, mode and error-preservation flag consulted by every call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TruncationConfig {
    pub max_length: usize,
    pub max_lines: usize,
    pub preserve_errors: bool,
    pub mode: TruncationMode,
}

impl Default for TruncationConfig {
    fn default() -> Self {
        Self {
            max_length: 8_000,
            max_lines: 200,
            preserve_errors: true,
            mode: TruncationMode::Smart,
        }
    }
}

impl TruncationConfig {
    /// Build from the `[truncation]` config section, clamping the budgets.
    pub fn from_section(section: &TruncationSection) -> Self {
        let mut cfg = Self {
            preserve_errors: section.preserve_errors,
            mode: section.mode,
            ..Self::default()
        };
        cfg.set_max_length(to_i64(section.max_length));
        cfg.set_max_lines(to_i64(section.max_lines));
        cfg
    }

    /// Set the character budget, clamped into `[1000, 50000]`.
    pub fn set_max_length(&mut self, n: i64) {
        self.max_length = clamp(n, MIN_MAX_LENGTH, MAX_MAX_LENGTH);
    }

    /// Set the line budget, clamped into `[50, 1000]`.
    pub fn set_max_lines(&mut self, n: i64) {
        self.max_lines = clamp(n, MIN_MAX_LINES, MAX_MAX_LINES);
    }

    pub fn set_preserve_errors(&mut self, preserve: bool) {
        self.preserve_errors = preserve;
    }

    pub fn set_mode(&mut self, mode: TruncationMode) {
        self.mode = mode;
    }

    /// Set the mode by name.  Unknown names leave the mode unchanged.
    /// Returns whether the name was accepted.
    pub fn set_mode_str(&mut self, name: &str) -> bool {
        match TruncationMode::parse(name) {
            Some(mode) => {
                self.mode = mode;
                true
            }
            None => false,
        }
    }

    /// Maximise both budgets and switch to [`TruncationMode::None`].
    pub fn disable(&mut self) {
        self.max_length = MAX_MAX_LENGTH;
        self.max_lines = MAX_MAX_LINES;
        self.mode = TruncationMode::None;
    }
}

fn clamp(n: i64, lo: usize, hi: usize) -> usize {
    n.clamp(lo as i64, hi as i64) as usize
}

fn to_i64(n: usize) -> i64 {
    i64::try_from(n).unwrap_or(i64::MAX)
}

/// Process-wide, cloneable handle to the live [`TruncationConfig`].
///
/// Clones share the same underlying value: a change made through one handle
/// is seen by the next [`snapshot`][Self::snapshot] of every other handle.
#[derive(Debug, Clone, Default)]
pub struct SharedTruncationConfig(Arc<RwLock<TruncationConfig>>);

impl SharedTruncationConfig {
    pub fn new(config: TruncationConfig) -> Self {
        Self(Arc::new(RwLock::new(config)))
    }

    /// Copy of the current settings.
    #[must_use]
    pub fn snapshot(&self) -> TruncationConfig {
        // A panicking writer cannot leave the Copy value half-written, so a
        // poisoned lock still holds a consistent config.
        *self.0.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Apply `f` under the write lock and return the resulting settings.
    pub fn update(&self, f: impl FnOnce(&mut TruncationConfig)) -> TruncationConfig {
        let mut guard = self.0.write().unwrap_or_else(PoisonError::into_inner);
        f(&mut guard);
        *guard
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let c = TruncationConfig::default();
        assert_eq!(c.max_length, 8000);
        assert_eq!(c.max_lines, 200);
        assert!(c.preserve_errors);
        assert_eq!(c.mode, TruncationMode::Smart);
    }

    #[test]
    fn max_length_below_floor_is_raised() {
        let mut c = TruncationConfig::default();
        c.set_max_length(500);
        assert_eq!(c.max_length, 1000);
    }

    #[test]
    fn max_length_above_ceiling_is_lowered() {
        let mut c = TruncationConfig::default();
        c.set_max_length(1_000_000);
        assert_eq!(c.max_length, 50_000);
    }

    #[test]
    fn negative_budgets_clamp_to_floor() {
        let mut c = TruncationConfig::default();
        c.set_max_length(-5);
        c.set_max_lines(i64::MIN);
        assert_eq!(c.max_length, MIN_MAX_LENGTH);
        assert_eq!(c.max_lines, MIN_MAX_LINES);
    }

    #[test]
    fn max_lines_in_range_is_kept() {
        let mut c = TruncationConfig::default();
        c.set_max_lines(321);
        assert_eq!(c.max_lines, 321);
        c.set_max_lines(5000);
        assert_eq!(c.max_lines, 1000);
    }

    #[test]
    fn invalid_mode_name_is_a_no_op() {
        let mut c = TruncationConfig::default();
        c.set_mode(TruncationMode::Essential);
        assert!(!c.set_mode_str("everything"));
        assert_eq!(c.mode, TruncationMode::Essential);
    }

    #[test]
    fn valid_mode_name_is_applied() {
        let mut c = TruncationConfig::default();
        assert!(c.set_mode_str("summary_only"));
        assert_eq!(c.mode, TruncationMode::SummaryOnly);
    }

    #[test]
    fn disable_maximises_budgets_and_sets_mode_none() {
        let mut c = TruncationConfig::default();
        c.disable();
        assert_eq!(c.max_length, 50_000);
        assert_eq!(c.max_lines, 1000);
        assert_eq!(c.mode, TruncationMode::None);
    }

    #[test]
    fn from_section_clamps_file_values() {
        let section = TruncationSection {
            max_length: 10,
            max_lines: 99_999,
            preserve_errors: false,
            mode: TruncationMode::Essential,
            ..TruncationSection::default()
        };
        let c = TruncationConfig::from_section(&section);
        assert_eq!(c.max_length, 1000);
        assert_eq!(c.max_lines, 1000);
        assert!(!c.preserve_errors);
        assert_eq!(c.mode, TruncationMode::Essential);
    }

    #[test]
    fn shared_handle_clones_see_updates() {
        let a = SharedTruncationConfig::default();
        let b = a.clone();
        a.update(|c| c.set_max_lines(75));
        assert_eq!(b.snapshot().max_lines, 75);
    }

    #[test]
    fn snapshot_is_detached_from_later_updates() {
        let shared = SharedTruncationConfig::default();
        let before = shared.snapshot();
        shared.update(|c| c.disable());
        assert_eq!(before.mode, TruncationMode::Smart);
        assert_eq!(shared.snapshot().mode, TruncationMode::None);
    }

    #[test]
    fn update_returns_new_settings() {
        let shared = SharedTruncationConfig::default();
        let after = shared.update(|c| c.set_preserve_errors(false));
        assert!(!after.preserve_errors);
    }
}
