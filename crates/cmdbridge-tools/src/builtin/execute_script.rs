// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
use std::io::Write;
use std::path::Path;

use async_trait::async_trait;
use cmdbridge_truncate::Truncator;
use serde_json::{json, Value};
use tempfile::TempPath;
use tokio::process::Command;
use tracing::debug;

use crate::error::ExecError;
use crate::process::{self, output_sections};
use crate::tool::{arg_str, arg_timeout, Tool, ToolCall, ToolOutput};

pub const COMMAND_TYPE: &str = "execute_script";

pub struct ExecuteScriptTool {
    pub truncator: Truncator,
    pub timeout_secs: u64,
    /// Interpreter used when the caller names none.
    pub default_shell: String,
}

impl ExecuteScriptTool {
    pub fn new(truncator: Truncator) -> Self {
        Self { truncator, timeout_secs: 60, default_shell: "bash".into() }
    }
}

/// Write `script` to a temporary file inside `dir`.  The file is removed
/// when the returned path is dropped.
fn materialize(dir: &Path, shell: &str, script: &str) -> Result<TempPath, ExecError> {
    let (suffix, header) = if cfg!(windows) {
        (".bat", "@echo off\r\n".to_string())
    } else {
        (".sh", format!("#!/bin/{shell}\nset -e\n"))
    };

    let mut file = tempfile::Builder::new()
        .prefix(".cmdbridge-script-")
        .suffix(suffix)
        .tempfile_in(dir)?;
    file.write_all(header.as_bytes())?;
    file.write_all(script.as_bytes())?;
    file.flush()?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(file.path(), std::fs::Permissions::from_mode(0o755))?;
    }

    Ok(file.into_temp_path())
}

fn script_command(shell: &str, path: &Path) -> Command {
    if cfg!(windows) {
        let mut cmd = Command::new("cmd");
        cmd.arg("/C").arg(path);
        cmd
    } else {
        let mut cmd = Command::new(shell);
        cmd.arg(path);
        cmd
    }
}

#[async_trait]
impl Tool for ExecuteScriptTool {
    fn name(&self) -> &str { "execute_script" }

    fn description(&self) -> &str {
        "Run a multi-line script and return its output.\n\
         The script is written to a temporary file in the working directory, \
         prefixed with a shebang for the chosen shell and 'set -e', executed, \
         and deleted afterwards. Output is truncated like execute_command."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "script": {
                    "type": "string",
                    "description": "Script content to execute"
                },
                "working_dir": {
                    "type": "string",
                    "description": "Working directory (optional, defaults to the server's cwd)"
                },
                "shell": {
                    "type": "string",
                    "description": "Interpreter: bash, sh, zsh, ... (optional, default bash)"
                },
                "timeout": {
                    "type": "integer",
                    "description": "Timeout in seconds (optional, default 60)"
                }
            },
            "required": ["script"],
            "additionalProperties": false
        })
    }

    async fn execute(&self, call: &ToolCall) -> ToolOutput {
        let script = match arg_str(call, "script") {
            Some(s) => s,
            None => return ToolOutput::err(&call.id, "missing 'script' argument"),
        };
        let shell = arg_str(call, "shell")
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(&self.default_shell);
        let timeout = arg_timeout(call, "timeout", self.timeout_secs);

        let workdir = match process::resolve_workdir(arg_str(call, "working_dir")) {
            Ok(dir) => dir,
            Err(e) => return ToolOutput::err(&call.id, format!("error: {e}")),
        };

        let path = match materialize(&workdir, shell, script) {
            Ok(p) => p,
            Err(e) => return ToolOutput::err(&call.id, format!("error running script: {e}")),
        };
        debug!(shell = %shell, path = %path.display(), timeout, "execute_script tool");

        let result = process::run(script_command(shell, &path), &workdir, timeout).await;
        if let Err(e) = path.close() {
            debug!(error = %e, "could not remove temporary script");
        }

        let output = match result {
            Ok(o) => o,
            Err(ExecError::Timeout(secs)) => {
                return ToolOutput::err(&call.id, format!("script timed out after {secs} seconds"))
            }
            Err(e) => return ToolOutput::err(&call.id, format!("error running script: {e}")),
        };

        let sections = output_sections(&output, &self.truncator, COMMAND_TYPE);
        let code = output.exit_code;
        let status = if output.success() {
            "script succeeded".to_string()
        } else {
            format!("script failed (exit code: {code})")
        };
        let content = if sections.is_empty() {
            if output.success() {
                format!("{status} (exit code: {code})")
            } else {
                status
            }
        } else {
            format!("{status}\n\n{}", sections.join("\n\n"))
        };

        if output.success() {
            ToolOutput::ok(&call.id, content)
        } else {
            ToolOutput::err(&call.id, content)
        }
    }
}

#[cfg(all(test, unix))]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::tool::{Tool, ToolCall};

    fn call(args: serde_json::Value) -> ToolCall {
        ToolCall { id: "s1".into(), name: "execute_script".into(), args }
    }

    fn tool() -> ExecuteScriptTool {
        ExecuteScriptTool { default_shell: "sh".into(), ..ExecuteScriptTool::new(Truncator::default()) }
    }

    #[tokio::test]
    async fn multi_line_script_runs() {
        let out = tool()
            .execute(&call(json!({"script": "A=hello\necho $A\necho world"})))
            .await;
        assert!(!out.is_error, "{}", out.content);
        assert_eq!(out.content, "script succeeded\n\nstdout:\nhello\nworld");
    }

    #[tokio::test]
    async fn set_e_stops_at_first_failure() {
        let out = tool()
            .execute(&call(json!({"script": "echo before\nfalse\necho after"})))
            .await;
        assert!(out.is_error);
        assert!(out.content.starts_with("script failed (exit code: 1)"));
        assert!(out.content.contains("before"));
        assert!(!out.content.contains("after"));
    }

    #[tokio::test]
    async fn silent_script_reports_status() {
        let out = tool().execute(&call(json!({"script": "true"}))).await;
        assert_eq!(out.content, "script succeeded (exit code: 0)");
        let out = tool().execute(&call(json!({"script": "exit 5"}))).await;
        assert!(out.is_error);
        assert_eq!(out.content, "script failed (exit code: 5)");
    }

    #[tokio::test]
    async fn temporary_file_is_removed() {
        let dir = tempfile::tempdir().unwrap();
        let out = tool()
            .execute(&call(json!({"script": "ls -a", "working_dir": dir.path()})))
            .await;
        assert!(out.content.contains(".cmdbridge-script-"), "script should see itself: {}", out.content);
        let leftover: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
        assert!(leftover.is_empty());
    }

    #[tokio::test]
    async fn explicit_shell_is_used() {
        let out = tool()
            .execute(&call(json!({"script": "echo $0", "shell": "sh"})))
            .await;
        assert!(out.content.contains(".cmdbridge-script-"));
    }

    #[tokio::test]
    async fn timeout_is_reported() {
        let out = tool().execute(&call(json!({"script": "sleep 30", "timeout": 1}))).await;
        assert!(out.is_error);
        assert_eq!(out.content, "script timed out after 1 seconds");
    }

    #[tokio::test]
    async fn missing_working_dir_is_error() {
        let out = tool()
            .execute(&call(json!({"script": "true", "working_dir": "/tmp/cmdbridge_missing_wd_xyzzy"})))
            .await;
        assert!(out.is_error);
        assert!(out.content.contains("does not exist"));
    }

    #[tokio::test]
    async fn missing_script_is_error() {
        let out = tool().execute(&call(json!({}))).await;
        assert!(out.is_error);
        assert!(out.content.contains("missing 'script'"));
    }
}
