// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
//!
//! Tool registry served by the MCP server.
//!
//! All command tools share one [`Truncator`], so a change made through
//! `configure_output_truncation` applies to the next call of every other
//! tool.

use cmdbridge_config::ToolsConfig;
use cmdbridge_tools::{
    ConfigureTruncationTool, ExecuteCommandTool, ExecuteScriptTool, ListDirectoryTool,
    ToolRegistry,
};
use cmdbridge_truncate::Truncator;

/// Tool names included in the default set, sorted.
pub const DEFAULT_TOOL_NAMES: &[&str] = &[
    "configure_output_truncation",
    "execute_command",
    "execute_script",
    "list_directory",
];

/// Build a [`ToolRegistry`] with the default tool set.
///
/// `allowed_names` is an optional comma-separated list of tool names to
/// include.  Pass `"all"` (or `None`) to include every default tool.
/// Names not in [`DEFAULT_TOOL_NAMES`] are silently ignored.
pub fn build_mcp_registry(
    truncator: &Truncator,
    tools: &ToolsConfig,
    allowed_names: Option<&str>,
) -> ToolRegistry {
    let filter: Option<std::collections::HashSet<&str>> = match allowed_names {
        None | Some("all") => None,
        Some(list) => Some(list.split(',').map(|s| s.trim()).collect()),
    };

    let allow = |name: &str| -> bool {
        match &filter {
            None => true,
            Some(set) => set.contains(name),
        }
    };

    let mut reg = ToolRegistry::new();

    if allow("configure_output_truncation") {
        reg.register(ConfigureTruncationTool {
            config: truncator.config().clone(),
        });
    }
    if allow("execute_command") {
        reg.register(ExecuteCommandTool {
            truncator: truncator.clone(),
            timeout_secs: tools.command_timeout_secs,
            load_shell_profile: tools.load_shell_profile,
        });
    }
    if allow("execute_script") {
        reg.register(ExecuteScriptTool {
            truncator: truncator.clone(),
            timeout_secs: tools.script_timeout_secs,
            default_shell: tools.default_script_shell.clone(),
        });
    }
    if allow("list_directory") {
        reg.register(ListDirectoryTool {
            truncator: truncator.clone(),
        });
    }

    reg
}

// ─── Unit tests ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn build(allowed: Option<&str>) -> ToolRegistry {
        build_mcp_registry(&Truncator::default(), &ToolsConfig::default(), allowed)
    }

    #[test]
    fn default_registry_contains_all_default_tools() {
        assert_eq!(build(None).names(), DEFAULT_TOOL_NAMES);
    }

    #[test]
    fn all_keyword_includes_all_default_tools() {
        assert_eq!(build(Some("all")).names().len(), DEFAULT_TOOL_NAMES.len());
    }

    #[test]
    fn allowed_names_filter_restricts_tools() {
        let reg = build(Some("execute_command,list_directory"));
        assert_eq!(reg.names(), vec!["execute_command", "list_directory"]);
    }

    #[test]
    fn unknown_tool_name_in_filter_is_ignored() {
        let reg = build(Some("execute_script,rm_rf_everything"));
        assert_eq!(reg.names(), vec!["execute_script"]);
    }

    #[test]
    fn whitespace_around_tool_names_is_trimmed() {
        let reg = build(Some(" execute_command , execute_script "));
        assert_eq!(reg.names(), vec!["execute_command", "execute_script"]);
    }

    #[test]
    fn default_tool_names_constant_is_sorted() {
        let mut sorted = DEFAULT_TOOL_NAMES.to_vec();
        sorted.sort_unstable();
        assert_eq!(
            DEFAULT_TOOL_NAMES,
            sorted.as_slice(),
            "DEFAULT_TOOL_NAMES should be sorted for deterministic output"
        );
    }

    #[tokio::test]
    async fn tools_share_one_truncation_config() {
        use cmdbridge_tools::ToolCall;
        use serde_json::json;

        let truncator = Truncator::default();
        let reg = build_mcp_registry(&truncator, &ToolsConfig::default(), None);
        let call = ToolCall {
            id: "1".into(),
            name: "configure_output_truncation".into(),
            args: json!({"max_lines": 60}),
        };
        reg.execute(&call).await;
        assert_eq!(truncator.config().snapshot().max_lines, 60);
    }
}
