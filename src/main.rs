// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
mod cli;

use std::io::{self, Read, Write};
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing::debug;
use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};

use cli::{Cli, Commands, TruncationArgs};
use cmdbridge_config::Config;
use cmdbridge_truncate::Truncator;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let command = cli.command.unwrap_or(Commands::Serve {
        tools: "all".into(),
        truncation: TruncationArgs::default(),
    });

    match command {
        Commands::Completions { shell } => {
            cli::print_completions(shell);
            Ok(())
        }
        Commands::ShowConfig => {
            let config = cmdbridge_config::load(cli.config.as_deref())?;
            let text = toml::to_string_pretty(&config).context("serializing configuration")?;
            print!("{text}");
            Ok(())
        }
        Commands::Serve { tools, truncation } => {
            let config = load_with(cli.config.as_deref(), &truncation)?;
            serve(&config, &tools).await
        }
        Commands::Truncate {
            command_type,
            truncation,
        } => {
            let config = load_with(cli.config.as_deref(), &truncation)?;
            truncate_stdin(&config, command_type.as_deref())
        }
    }
}

fn load_with(path: Option<&std::path::Path>, overrides: &TruncationArgs) -> anyhow::Result<Config> {
    let mut config = cmdbridge_config::load(path)?;
    overrides.apply(&mut config);
    debug!(?config, "effective configuration");
    Ok(config)
}

async fn serve(config: &Config, tools: &str) -> anyhow::Result<()> {
    let truncator = Truncator::from_section(&config.truncation);
    let registry = cmdbridge_mcp::build_mcp_registry(&truncator, &config.tools, Some(tools));
    if registry.names().is_empty() {
        anyhow::bail!("no known tools selected by --tools {tools:?}");
    }
    cmdbridge_mcp::serve_stdio(Arc::new(registry)).await
}

fn truncate_stdin(config: &Config, command_type: Option<&str>) -> anyhow::Result<()> {
    let mut data = Vec::new();
    io::stdin()
        .read_to_end(&mut data)
        .context("reading stdin")?;

    let truncator = Truncator::from_section(&config.truncation);
    let out = truncator.render_stream(&data, command_type);

    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{out}").context("writing stdout")?;
    Ok(())
}

/// Logs go to stderr; stdout carries the MCP protocol.
fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}
