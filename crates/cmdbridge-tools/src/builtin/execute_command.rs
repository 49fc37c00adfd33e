// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
use async_trait::async_trait;
use cmdbridge_truncate::Truncator;
use serde_json::{json, Value};
use tracing::debug;

use crate::error::ExecError;
use crate::process::{self, output_sections};
use crate::tool::{arg_str, arg_timeout, Tool, ToolCall, ToolOutput};

pub const COMMAND_TYPE: &str = "execute_command";

pub struct ExecuteCommandTool {
    pub truncator: Truncator,
    pub timeout_secs: u64,
    /// Source the shell's profile files before the command.
    pub load_shell_profile: bool,
}

impl ExecuteCommandTool {
    pub fn new(truncator: Truncator) -> Self {
        Self { truncator, timeout_secs: 30, load_shell_profile: true }
    }
}

#[async_trait]
impl Tool for ExecuteCommandTool {
    fn name(&self) -> &str { "execute_command" }

    fn description(&self) -> &str {
        "Run a shell command and return its stdout and stderr.\n\
         The command runs in the user's login shell with the shell profile loaded, \
         so PATH additions from rc files are available. Output is truncated to the \
         configured budget; error lines are kept preferentially. \
         Confirm destructive commands such as 'rm -rf' before running them. \
         For long-running processes start them with 'nohup' and follow the log with \
         'tail -f' instead of waiting for them."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "command": {
                    "type": "string",
                    "description": "The shell command to execute"
                },
                "working_dir": {
                    "type": "string",
                    "description": "Working directory (optional, defaults to the server's cwd)"
                },
                "timeout": {
                    "type": "integer",
                    "description": "Timeout in seconds (optional, default 30)"
                }
            },
            "required": ["command"],
            "additionalProperties": false
        })
    }

    async fn execute(&self, call: &ToolCall) -> ToolOutput {
        let command = match arg_str(call, "command") {
            Some(c) if !c.trim().is_empty() => c,
            _ => return ToolOutput::err(&call.id, "missing 'command' argument"),
        };
        let timeout = arg_timeout(call, "timeout", self.timeout_secs);

        let workdir = match process::resolve_workdir(arg_str(call, "working_dir")) {
            Ok(dir) => dir,
            Err(e) => return ToolOutput::err(&call.id, format!("error: {e}")),
        };

        let shell = process::user_shell();
        let script = if self.load_shell_profile && !cfg!(windows) {
            process::with_profile(&shell, command)
        } else {
            command.to_string()
        };
        debug!(cmd = %command, shell = %shell, timeout, "execute_command tool");

        let output = match process::run(process::shell_command(&shell, &script), &workdir, timeout).await {
            Ok(o) => o,
            Err(ExecError::Timeout(secs)) => {
                return ToolOutput::err(
                    &call.id,
                    format!(
                        "command timed out after {secs} seconds. \
                         For long-running commands consider starting them with 'nohup'."
                    ),
                )
            }
            Err(e) => return ToolOutput::err(&call.id, format!("error running command: {e}")),
        };

        let sections = output_sections(&output, &self.truncator, COMMAND_TYPE);
        let code = output.exit_code;
        match (sections.is_empty(), output.success()) {
            (true, true) => ToolOutput::ok(&call.id, format!("command succeeded (exit code: {code})")),
            (true, false) => ToolOutput::err(&call.id, format!("command failed (exit code: {code})")),
            (false, true) => ToolOutput::ok(&call.id, sections.join("\n\n")),
            (false, false) => ToolOutput::err(
                &call.id,
                format!("command failed (exit code: {code})\n\n{}", sections.join("\n\n")),
            ),
        }
    }
}
