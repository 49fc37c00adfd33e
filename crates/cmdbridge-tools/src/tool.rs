// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
use async_trait::async_trait;
use serde_json::Value;

/// A single tool invocation requested by the client.
#[derive(Debug, Clone)]
pub struct ToolCall {
    /// Opaque identifier (forwarded verbatim)
    pub id: String,
    pub name: String,
    /// Parsed JSON arguments
    pub args: Value,
}

/// The result of executing a tool.
///
/// Every outcome is text: failures are reported through `is_error` with a
/// readable message rather than as a protocol error.
#[derive(Debug, Clone)]
pub struct ToolOutput {
    pub call_id: String,
    pub content: String,
    /// If true, the tool execution failed non-fatally (returned error message).
    pub is_error: bool,
}

impl ToolOutput {
    pub fn ok(call_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            call_id: call_id.into(),
            content: content.into(),
            is_error: false,
        }
    }

    pub fn err(call_id: impl Into<String>, msg: impl Into<String>) -> Self {
        Self {
            call_id: call_id.into(),
            content: msg.into(),
            is_error: true,
        }
    }
}

/// Trait that every built-in tool implements.
#[async_trait]
pub trait Tool: Send + Sync {
    fn name(&self) -> &str;
    fn description(&self) -> &str;
    /// JSON Schema for parameters
    fn parameters_schema(&self) -> Value;
    /// Execute the tool.  Errors should be wrapped in [`ToolOutput::err`].
    async fn execute(&self, call: &ToolCall) -> ToolOutput;
}

// ─── Argument helpers ────────────────────────────────────────────────────────

pub(crate) fn arg_str<'a>(call: &'a ToolCall, key: &str) -> Option<&'a str> {
    call.args.get(key).and_then(Value::as_str)
}

/// Integer argument; JSON floats are truncated toward zero.
pub(crate) fn arg_i64(call: &ToolCall, key: &str) -> Option<i64> {
    let v = call.args.get(key)?;
    v.as_i64().or_else(|| v.as_f64().map(|f| f as i64))
}

pub(crate) fn arg_bool(call: &ToolCall, key: &str) -> Option<bool> {
    call.args.get(key).and_then(Value::as_bool)
}

/// Timeout argument in seconds; missing, zero or negative values fall back
/// to `default`.
pub(crate) fn arg_timeout(call: &ToolCall, key: &str, default: u64) -> u64 {
    match arg_i64(call, key) {
        Some(n) if n > 0 => n as u64,
        _ => default,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn call(args: Value) -> ToolCall {
        ToolCall { id: "c".into(), name: "t".into(), args }
    }

    #[test]
    fn ok_and_err_set_flag() {
        assert!(!ToolOutput::ok("1", "fine").is_error);
        let e = ToolOutput::err("1", "broken");
        assert!(e.is_error);
        assert_eq!(e.content, "broken");
        assert_eq!(e.call_id, "1");
    }

    #[test]
    fn integer_arg_accepts_floats() {
        let c = call(json!({"n": 12.9, "m": 4}));
        assert_eq!(arg_i64(&c, "n"), Some(12));
        assert_eq!(arg_i64(&c, "m"), Some(4));
        assert_eq!(arg_i64(&c, "missing"), None);
    }

    #[test]
    fn timeout_falls_back_on_non_positive() {
        let c = call(json!({"timeout": 0, "t2": -3, "t3": 7}));
        assert_eq!(arg_timeout(&c, "timeout", 30), 30);
        assert_eq!(arg_timeout(&c, "t2", 30), 30);
        assert_eq!(arg_timeout(&c, "t3", 30), 7);
        assert_eq!(arg_timeout(&c, "absent", 60), 60);
    }

    #[test]
    fn string_arg_ignores_wrong_type() {
        let c = call(json!({"command": 5}));
        assert_eq!(arg_str(&c, "command"), None);
    }
}
