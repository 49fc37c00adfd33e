// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
//! Host and environment report served as the `system://info` resource.

const KEY_VARS: &[&str] = &["PATH", "LANG", "LC_ALL", "TERM"];
const UNKNOWN: &str = "(unknown)";
const UNSET: &str = "(not set)";

/// Multi-section, human-readable description of the host.
pub fn system_info() -> String {
    let env = |key: &str| std::env::var(key).ok().filter(|v| !v.is_empty());
    let cwd = std::env::current_dir()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|_| UNKNOWN.into());
    let home = dirs::home_dir()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| UNKNOWN.into());
    let user = env("USER").or_else(|| env("USERNAME")).unwrap_or_else(|| UNKNOWN.into());
    let shell = env("SHELL").or_else(|| env("COMSPEC")).unwrap_or_else(|| UNKNOWN.into());

    let mut lines = vec![
        "=== system ===".to_string(),
        format!("os: {}", std::env::consts::OS),
        format!("family: {}", std::env::consts::FAMILY),
        format!("architecture: {}", std::env::consts::ARCH),
        format!("hostname: {}", hostname().unwrap_or_else(|| UNKNOWN.into())),
        format!("cmdbridge version: {}", env!("CARGO_PKG_VERSION")),
        String::new(),
        "=== environment ===".to_string(),
        format!("working directory: {cwd}"),
        format!("user: {user}"),
        format!("home: {home}"),
        format!("shell: {shell}"),
        String::new(),
        "=== key variables ===".to_string(),
    ];
    lines.extend(
        KEY_VARS
            .iter()
            .map(|k| format!("{k}: {}", env(k).unwrap_or_else(|| UNSET.into()))),
    );
    lines.join("\n")
}

#[cfg(unix)]
fn hostname() -> Option<String> {
    let mut buf = [0u8; 256];
    // SAFETY: `buf` is valid for writes of `buf.len()` bytes.
    let rc = unsafe { libc::gethostname(buf.as_mut_ptr().cast(), buf.len()) };
    if rc != 0 {
        return None;
    }
    let end = buf.iter().position(|&b| b == 0).unwrap_or(buf.len());
    let name = String::from_utf8_lossy(&buf[..end]).into_owned();
    (!name.is_empty()).then_some(name)
}

#[cfg(not(unix))]
fn hostname() -> Option<String> {
    std::env::var("COMPUTERNAME").ok()
}
