// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
use async_trait::async_trait;
use cmdbridge_truncate::{SharedTruncationConfig, TruncationConfig, MAX_MAX_LENGTH};
use serde_json::{json, Value};
use tracing::info;

use crate::tool::{arg_bool, arg_i64, arg_str, Tool, ToolCall, ToolOutput};

/// Budgets above this get a reminder to watch the caller's context usage.
const LARGE_BUDGET_HINT: usize = 15_000;

/// Adjusts the live truncation settings shared with every other tool.
pub struct ConfigureTruncationTool {
    pub config: SharedTruncationConfig,
}

#[async_trait]
impl Tool for ConfigureTruncationTool {
    fn name(&self) -> &str { "configure_output_truncation" }

    fn description(&self) -> &str {
        "Change how command output is truncated. All parameters are optional; \
         omitted ones keep their current value. max_length is clamped to \
         1000..=50000 and max_lines to 50..=1000. Modes: smart (key lines plus \
         context), summary_only (summary without content), essential (error and \
         status lines only), none (no truncation). disable=true maximises both \
         budgets and sets mode none."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "max_length": {
                    "type": "integer",
                    "description": "Maximum characters of command output to show"
                },
                "max_lines": {
                    "type": "integer",
                    "description": "Maximum lines of command output to show"
                },
                "preserve_errors": {
                    "type": "boolean",
                    "description": "Keep error and status lines before positional context"
                },
                "truncation_mode": {
                    "type": "string",
                    "enum": ["smart", "summary_only", "essential", "none"],
                    "description": "Rendering mode"
                },
                "disable": {
                    "type": "boolean",
                    "description": "Turn truncation off entirely (applied before the other fields)"
                }
            },
            "additionalProperties": false
        })
    }

    async fn execute(&self, call: &ToolCall) -> ToolOutput {
        let mut rejected_mode: Option<String> = None;
        let cfg = self.config.update(|c| {
            if arg_bool(call, "disable") == Some(true) {
                c.disable();
            }
            if let Some(n) = arg_i64(call, "max_length") {
                c.set_max_length(n);
            }
            if let Some(n) = arg_i64(call, "max_lines") {
                c.set_max_lines(n);
            }
            if let Some(b) = arg_bool(call, "preserve_errors") {
                c.set_preserve_errors(b);
            }
            if let Some(mode) = arg_str(call, "truncation_mode") {
                if !c.set_mode_str(mode) {
                    rejected_mode = Some(mode.to_string());
                }
            }
        });

        info!(
            max_length = cfg.max_length,
            max_lines = cfg.max_lines,
            preserve_errors = cfg.preserve_errors,
            mode = %cfg.mode,
            "truncation settings updated"
        );

        ToolOutput::ok(&call.id, report(&cfg, rejected_mode.as_deref()))
    }
}

fn report(cfg: &TruncationConfig, rejected_mode: Option<&str>) -> String {
    let mut out = format!(
        "output truncation settings updated:\n\n\
         max length: {}\n\
         max lines: {}\n\
         preserve errors: {}\n\
         mode: {}\n\n\
         mode description: {}",
        cfg.max_length,
        cfg.max_lines,
        if cfg.preserve_errors { "yes" } else { "no" },
        cfg.mode,
        cfg.mode.description(),
    );

    if let Some(mode) = rejected_mode {
        out.push_str(&format!(
            "\n\nnote: unknown truncation mode '{mode}' ignored \
             (valid: smart, summary_only, essential, none)"
        ));
    }

    if cfg.max_length >= MAX_MAX_LENGTH {
        out.push_str(
            "\n\nwarning: output length is effectively unlimited; \
             large outputs may overflow the model context",
        );
    } else if cfg.max_length > LARGE_BUDGET_HINT {
        out.push_str("\n\nhint: large output budget; keep an eye on context usage");
    }
    out
}

#[cfg(test)]
mod tests {
    use cmdbridge_truncate::TruncationMode;
    use serde_json::json;

    use super::*;

    fn call(args: Value) -> ToolCall {
        ToolCall { id: "c1".into(), name: "configure_output_truncation".into(), args }
    }

    fn tool() -> ConfigureTruncationTool {
        ConfigureTruncationTool { config: SharedTruncationConfig::default() }
    }

    #[tokio::test]
    async fn below_floor_max_length_is_clamped() {
        let t = tool();
        let out = t.execute(&call(json!({"max_length": 500}))).await;
        assert!(!out.is_error);
        assert!(out.content.contains("max length: 1000\n"));
        assert_eq!(t.config.snapshot().max_length, 1000);
    }

    #[tokio::test]
    async fn omitted_fields_are_kept() {
        let t = tool();
        t.execute(&call(json!({"max_lines": 120}))).await;
        let cfg = t.config.snapshot();
        assert_eq!(cfg.max_lines, 120);
        assert_eq!(cfg.max_length, 8000);
        assert_eq!(cfg.mode, TruncationMode::Smart);
        assert!(cfg.preserve_errors);
    }

    #[tokio::test]
    async fn unknown_mode_is_ignored_with_note() {
        let t = tool();
        let out = t.execute(&call(json!({"truncation_mode": "verbose"}))).await;
        assert!(!out.is_error);
        assert!(out.content.contains("unknown truncation mode 'verbose' ignored"));
        assert_eq!(t.config.snapshot().mode, TruncationMode::Smart);
    }

    #[tokio::test]
    async fn mode_change_reports_description() {
        let t = tool();
        let out = t.execute(&call(json!({"truncation_mode": "essential", "preserve_errors": false}))).await;
        assert!(out.content.contains("mode: essential\n"));
        assert!(out.content.contains(TruncationMode::Essential.description()));
        assert!(out.content.contains("preserve errors: no"));
    }

    #[tokio::test]
    async fn disable_warns_about_context() {
        let t = tool();
        let out = t.execute(&call(json!({"disable": true}))).await;
        assert!(out.content.contains("mode: none"));
        assert!(out.content.contains("warning: output length is effectively unlimited"));
        assert_eq!(t.config.snapshot().max_lines, 1000);
    }

    #[tokio::test]
    async fn disable_then_explicit_fields_apply_on_top() {
        let t = tool();
        t.execute(&call(json!({"disable": true, "truncation_mode": "smart", "max_length": 20000}))).await;
        let cfg = t.config.snapshot();
        assert_eq!(cfg.mode, TruncationMode::Smart);
        assert_eq!(cfg.max_length, 20000);
        assert_eq!(cfg.max_lines, 1000);
    }

    #[tokio::test]
    async fn large_budget_gets_hint() {
        let out = tool().execute(&call(json!({"max_length": 20000}))).await;
        assert!(out.content.contains("hint: large output budget"));
        assert!(!out.content.contains("warning:"));
    }

    #[tokio::test]
    async fn shared_handle_sees_change() {
        let shared = SharedTruncationConfig::default();
        let t = ConfigureTruncationTool { config: shared.clone() };
        t.execute(&call(json!({"max_lines": 77}))).await;
        assert_eq!(shared.snapshot().max_lines, 77);
    }
}
