// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
//! Spawning shell processes and turning their output into sections.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use cmdbridge_truncate::Truncator;
use tokio::process::Command;
use tracing::{debug, warn};

use crate::error::ExecError;

/// Exit status and raw output of a finished process.
#[derive(Debug, Clone)]
pub struct ProcessOutput {
    /// `-1` when the process was terminated by a signal.
    pub exit_code: i32,
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
}

impl ProcessOutput {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Resolve an optional working directory, defaulting to the current one.
pub fn resolve_workdir(dir: Option<&str>) -> Result<PathBuf, ExecError> {
    let path = match dir {
        Some(d) if !d.trim().is_empty() => PathBuf::from(d),
        _ => std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
    };
    if !path.exists() {
        return Err(ExecError::WorkdirMissing(path));
    }
    Ok(path)
}

/// The user's login shell: `$SHELL` on unix, `%COMSPEC%` on Windows.
pub fn user_shell() -> String {
    if cfg!(windows) {
        std::env::var("COMSPEC").unwrap_or_else(|_| "cmd.exe".into())
    } else {
        std::env::var("SHELL")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| "/bin/bash".into())
    }
}

/// Prefix `command` with the profile sourcing appropriate for `shell`, so
/// PATH additions from rc files are visible.  Unknown shells get the
/// command unchanged.
pub fn with_profile(shell: &str, command: &str) -> String {
    let name = Path::new(shell)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(shell);
    if name.contains("zsh") {
        format!(
            "source /etc/zsh/zshenv 2>/dev/null; source ~/.zshenv 2>/dev/null; \
             source ~/.zshrc 2>/dev/null; {command}"
        )
    } else if name.contains("bash") {
        format!("source /etc/profile 2>/dev/null; source ~/.bashrc 2>/dev/null; {command}")
    } else if name.contains("sh") {
        format!(". /etc/profile 2>/dev/null; . ~/.profile 2>/dev/null; {command}")
    } else {
        command.to_string()
    }
}

/// Build the command that runs `command` through `shell`.
pub fn shell_command(shell: &str, command: &str) -> Command {
    let mut cmd = Command::new(shell);
    if cfg!(windows) {
        cmd.arg("/C").arg(command);
    } else {
        cmd.arg("-c").arg(command);
    }
    cmd
}

/// Run `cmd` in `workdir` with piped output and no stdin, killing it if it
/// has not finished after `timeout_secs`.
pub async fn run(
    mut cmd: Command,
    workdir: &Path,
    timeout_secs: u64,
) -> Result<ProcessOutput, ExecError> {
    let program = cmd.as_std().get_program().to_string_lossy().into_owned();
    cmd.current_dir(workdir)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    debug!(program = %program, workdir = %workdir.display(), timeout_secs, "spawning process");

    let child = cmd
        .spawn()
        .map_err(|source| ExecError::Spawn { program: program.clone(), source })?;

    match tokio::time::timeout(Duration::from_secs(timeout_secs), child.wait_with_output()).await {
        Ok(Ok(output)) => {
            let exit_code = output.status.code().unwrap_or(-1);
            debug!(
                exit_code,
                stdout_bytes = output.stdout.len(),
                stderr_bytes = output.stderr.len(),
                "process finished"
            );
            Ok(ProcessOutput { exit_code, stdout: output.stdout, stderr: output.stderr })
        }
        Ok(Err(source)) => Err(ExecError::Spawn { program, source }),
        Err(_) => {
            warn!(program = %program, timeout_secs, "process timed out, killed");
            Err(ExecError::Timeout(timeout_secs))
        }
    }
}

/// Render non-empty streams as labelled `stdout:` / `stderr:` sections,
/// each passed through the truncator on its own.
pub fn output_sections(
    output: &ProcessOutput,
    truncator: &Truncator,
    command_type: &str,
) -> Vec<String> {
    [("stdout", &output.stdout), ("stderr", &output.stderr)]
        .into_iter()
        .filter(|(_, data)| !data.is_empty())
        .filter_map(|(label, data)| {
            let rendered = truncator.render_stream(data, Some(command_type));
            (!rendered.is_empty()).then(|| format!("{label}:\n{rendered}"))
        })
        .collect()
}
