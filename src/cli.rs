// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use cmdbridge_config::{Config, TruncationMode};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "cmdbridge",
    about = "Run shell commands for MCP clients and return output sized for an LLM",
    version,
    long_about = None,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Path to config file (overrides auto-discovery)
    #[arg(long, short = 'c', global = true, env = "CMDBRIDGE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v = debug, -vv = trace)
    #[arg(long, short = 'v', global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// Truncation overrides shared by `serve` and `truncate`.
#[derive(clap::Args, Debug, Clone, Default)]
pub struct TruncationArgs {
    /// Character budget for a single output stream
    #[arg(long, value_name = "CHARS")]
    pub max_length: Option<usize>,

    /// Line budget for a single output stream
    #[arg(long, value_name = "LINES")]
    pub max_lines: Option<usize>,

    /// Truncation strategy
    #[arg(long, value_enum)]
    pub mode: Option<TruncationMode>,
}

impl TruncationArgs {
    /// Write the overrides into the `[truncation]` section of `config`.
    pub fn apply(&self, config: &mut Config) {
        if let Some(n) = self.max_length {
            config.truncation.max_length = n;
        }
        if let Some(n) = self.max_lines {
            config.truncation.max_lines = n;
        }
        if let Some(mode) = self.mode {
            config.truncation.mode = mode;
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Serve the command tools over MCP on stdin/stdout (default)
    Serve {
        /// Comma-separated tool names to expose, or "all"
        #[arg(long, value_name = "NAMES", default_value = "all")]
        tools: String,

        #[command(flatten)]
        truncation: TruncationArgs,
    },
    /// Truncate stdin the way tool output is truncated and print the result
    Truncate {
        /// Command type used for budget adaptation and hints (e.g. "grep")
        #[arg(long, short = 't', value_name = "TYPE")]
        command_type: Option<String>,

        #[command(flatten)]
        truncation: TruncationArgs,
    },
    /// Print the effective configuration and exit
    ShowConfig,
    /// Generate shell completion script
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

pub fn print_completions(shell: Shell) {
    let mut cmd = Cli::command();
    generate(shell, &mut cmd, "cmdbridge", &mut std::io::stdout());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn bare_invocation_has_no_subcommand() {
        let cli = Cli::try_parse_from(["cmdbridge"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.verbose, 0);
    }

    #[test]
    fn serve_parses_tools_and_overrides() {
        let cli = Cli::try_parse_from([
            "cmdbridge",
            "serve",
            "--tools",
            "execute_command",
            "--max-lines",
            "80",
            "--mode",
            "summary_only",
        ])
        .unwrap();
        match cli.command {
            Some(Commands::Serve { tools, truncation }) => {
                assert_eq!(tools, "execute_command");
                assert_eq!(truncation.max_lines, Some(80));
                assert_eq!(truncation.mode, Some(TruncationMode::SummaryOnly));
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["cmdbridge", "truncate", "-vv", "-t", "grep"]).unwrap();
        assert_eq!(cli.verbose, 2);
        assert!(matches!(
            cli.command,
            Some(Commands::Truncate { command_type: Some(ref t), .. }) if t == "grep"
        ));
    }

    #[test]
    fn overrides_apply_to_config() {
        let mut config = Config::default();
        TruncationArgs {
            max_length: Some(3000),
            max_lines: None,
            mode: Some(TruncationMode::Essential),
        }
        .apply(&mut config);
        assert_eq!(config.truncation.max_length, 3000);
        assert_eq!(config.truncation.max_lines, 200);
        assert_eq!(config.truncation.mode, TruncationMode::Essential);
    }
}
