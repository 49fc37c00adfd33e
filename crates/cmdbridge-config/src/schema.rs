// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: Apache-2.0
use serde::{Deserialize, Serialize};

/// Serde default helper — returns `true`.
///
/// `#[serde(default)]` on a `bool` always falls back to `false`, so fields
/// that should be enabled unless explicitly disabled need a named function.
fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub truncation: TruncationSection,
    #[serde(default)]
    pub tools: ToolsConfig,
}

/// How much of a command's output is exposed to the caller.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum TruncationMode {
    /// Importance-ranked excerpt plus summary and metadata
    #[default]
    Smart,
    /// Only the content summary; the output itself is hidden
    #[value(name = "summary_only")]
    SummaryOnly,
    /// Only error / status lines plus the summary
    Essential,
    /// No truncation at all
    None,
}

impl TruncationMode {
    pub const ALL: [TruncationMode; 4] = [
        TruncationMode::Smart,
        TruncationMode::SummaryOnly,
        TruncationMode::Essential,
        TruncationMode::None,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            TruncationMode::Smart => "smart",
            TruncationMode::SummaryOnly => "summary_only",
            TruncationMode::Essential => "essential",
            TruncationMode::None => "none",
        }
    }

    /// Parse a mode name.  Returns `None` for anything that is not one of the
    /// four canonical names (surrounding whitespace and case are ignored).
    pub fn parse(s: &str) -> Option<Self> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL.into_iter().find(|m| m.as_str() == wanted)
    }

    /// One-line explanation shown to callers that change the mode.
    pub fn description(self) -> &'static str {
        match self {
            TruncationMode::Smart => "smart truncation, keeps key information and context",
            TruncationMode::SummaryOnly => "shows only a content summary, details are hidden",
            TruncationMode::Essential => "keeps only the most important error and status lines",
            TruncationMode::None => {
                "truncation disabled, large outputs may overflow the model context"
            }
        }
    }
}

impl std::fmt::Display for TruncationMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Initial truncation settings applied at process start.
///
/// The four runtime-adjustable values (`max_length`, `max_lines`,
/// `preserve_errors`, `mode`) are clamped into their valid ranges when they
/// are applied to the engine, so out-of-range values in a config file are
/// tolerated rather than rejected.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TruncationSection {
    /// Character budget for the displayed payload
    #[serde(default = "TruncationSection::default_max_length")]
    pub max_length: usize,
    /// Line budget for the displayed payload
    #[serde(default = "TruncationSection::default_max_lines")]
    pub max_lines: usize,
    /// Prioritise error / status lines over positional context
    #[serde(default = "default_true")]
    pub preserve_errors: bool,
    #[serde(default)]
    pub mode: TruncationMode,
    /// Maximum length of the generated content summary
    #[serde(default = "TruncationSection::default_summary_length")]
    pub summary_length: usize,
    /// Characters held back from `max_length` during the final line-level
    /// trim so the summary has room next to the payload.
    #[serde(default = "TruncationSection::default_summary_reserve")]
    pub summary_reserve: usize,
}

impl TruncationSection {
    fn default_max_length() -> usize {
        8000
    }
    fn default_max_lines() -> usize {
        200
    }
    fn default_summary_length() -> usize {
        200
    }
    fn default_summary_reserve() -> usize {
        200
    }
}

impl Default for TruncationSection {
    fn default() -> Self {
        Self {
            max_length: Self::default_max_length(),
            max_lines: Self::default_max_lines(),
            preserve_errors: true,
            mode: TruncationMode::Smart,
            summary_length: Self::default_summary_length(),
            summary_reserve: Self::default_summary_reserve(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolsConfig {
    /// Default timeout in seconds for `execute_command`
    #[serde(default = "ToolsConfig::default_command_timeout_secs")]
    pub command_timeout_secs: u64,
    /// Default timeout in seconds for `execute_script`
    #[serde(default = "ToolsConfig::default_script_timeout_secs")]
    pub script_timeout_secs: u64,
    /// Interpreter used by `execute_script` when the caller names none
    #[serde(default = "ToolsConfig::default_script_shell")]
    pub default_script_shell: String,
    /// Source the user's shell profile before running a command so that
    /// PATH additions from rc files are visible.
    #[serde(default = "default_true")]
    pub load_shell_profile: bool,
}

impl ToolsConfig {
    fn default_command_timeout_secs() -> u64 {
        30
    }
    fn default_script_timeout_secs() -> u64 {
        60
    }
    fn default_script_shell() -> String {
        "bash".into()
    }
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            command_timeout_secs: Self::default_command_timeout_secs(),
            script_timeout_secs: Self::default_script_timeout_secs(),
            default_script_shell: Self::default_script_shell(),
            load_shell_profile: true,
        }
    }
}

// ─── Unit tests ──────────────────────────────────────────────────────────────
