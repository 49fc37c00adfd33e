// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use cmdbridge_truncate::Truncator;
use serde_json::{json, Value};
use tracing::debug;

use crate::tool::{arg_bool, arg_str, Tool, ToolCall, ToolOutput};

pub const COMMAND_TYPE: &str = "list_directory";

pub struct ListDirectoryTool {
    pub truncator: Truncator,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum EntryKind {
    Dir,
    File(u64),
    Link(PathBuf),
    Other,
    Unreadable(String),
}

#[derive(Debug, Clone)]
struct Entry {
    name: String,
    kind: EntryKind,
}

impl Entry {
    fn render(&self) -> String {
        match &self.kind {
            EntryKind::Dir => format!("[dir]  {}/", self.name),
            EntryKind::File(size) => format!("[file] {} ({})", self.name, format_file_size(*size)),
            EntryKind::Link(target) => format!("[link] {} -> {}", self.name, target.display()),
            EntryKind::Other => format!("[other] {}", self.name),
            EntryKind::Unreadable(e) => format!("[error] {} ({e})", self.name),
        }
    }
}

/// Classify by the followed metadata, so links to directories list as
/// directories; only dangling links are shown as links.
async fn classify(path: &Path, is_symlink: bool) -> EntryKind {
    match tokio::fs::metadata(path).await {
        Ok(m) if m.is_dir() => EntryKind::Dir,
        Ok(m) if m.is_file() => EntryKind::File(m.len()),
        Ok(_) => EntryKind::Other,
        Err(_) if is_symlink => match tokio::fs::read_link(path).await {
            Ok(target) => EntryKind::Link(target),
            Err(e) => EntryKind::Unreadable(e.to_string()),
        },
        Err(e) => EntryKind::Unreadable(e.to_string()),
    }
}

/// Human-readable size with one decimal: `0 B`, `512.0 B`, `1.5 KB`, ...
pub fn format_file_size(bytes: u64) -> String {
    const UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];
    if bytes == 0 {
        return "0 B".to_string();
    }
    let mut size = bytes as f64;
    let mut unit = 0;
    while size >= 1024.0 && unit < UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }
    format!("{size:.1} {}", UNITS[unit])
}

#[async_trait]
impl Tool for ListDirectoryTool {
    fn name(&self) -> &str { "list_directory" }

    fn description(&self) -> &str {
        "List the entries of a directory, directories first, with file sizes \
         and symlink targets. Hidden entries are skipped unless show_hidden is set."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "path": {
                    "type": "string",
                    "description": "Directory to list (optional, defaults to the server's cwd)"
                },
                "show_hidden": {
                    "type": "boolean",
                    "description": "Include entries whose name starts with '.' (default false)"
                }
            },
            "additionalProperties": false
        })
    }

    async fn execute(&self, call: &ToolCall) -> ToolOutput {
        let dir = match arg_str(call, "path").filter(|p| !p.trim().is_empty()) {
            Some(p) => PathBuf::from(p),
            None => std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
        };
        let show_hidden = arg_bool(call, "show_hidden").unwrap_or(false);
        debug!(path = %dir.display(), show_hidden, "list_directory tool");

        match tokio::fs::metadata(&dir).await {
            Ok(m) if m.is_dir() => {}
            Ok(_) => {
                return ToolOutput::err(&call.id, format!("error: '{}' is not a directory", dir.display()))
            }
            Err(_) => {
                return ToolOutput::err(&call.id, format!("error: directory '{}' does not exist", dir.display()))
            }
        }

        let mut rd = match tokio::fs::read_dir(&dir).await {
            Ok(rd) => rd,
            Err(e) => {
                return ToolOutput::err(&call.id, format!("error: cannot read '{}': {e}", dir.display()))
            }
        };

        let mut entries: Vec<Entry> = Vec::new();
        while let Ok(Some(entry)) = rd.next_entry().await {
            let name = entry.file_name().to_string_lossy().into_owned();
            if !show_hidden && name.starts_with('.') {
                continue;
            }
            let is_symlink = entry.file_type().await.map(|t| t.is_symlink()).unwrap_or(false);
            let kind = classify(&entry.path(), is_symlink).await;
            entries.push(Entry { name, kind });
        }
        entries.sort_by(|a, b| {
            let a_dir = a.kind == EntryKind::Dir;
            let b_dir = b.kind == EntryKind::Dir;
            b_dir.cmp(&a_dir).then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
        });

        let mut text = format!("contents of '{}' ({} items):\n\n", dir.display(), entries.len());
        if entries.is_empty() {
            text.push_str("directory is empty");
        } else {
            let lines: Vec<String> = entries.iter().map(Entry::render).collect();
            text.push_str(&lines.join("\n"));
        }

        ToolOutput::ok(&call.id, self.truncator.truncate(&text, Some(COMMAND_TYPE)))
    }
}
