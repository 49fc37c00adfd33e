// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT

/// Below this share of printable bytes a stream is treated as binary.
const PRINTABLE_THRESHOLD: f64 = 0.7;

/// Return `true` when `data` looks like binary rather than human text.
///
/// Printable ASCII (32–126) plus tab, newline and carriage return count as
/// text.  Empty input is text.
pub fn is_binary(data: &[u8]) -> bool {
    if data.is_empty() {
        return false;
    }
    let printable = data
        .iter()
        .filter(|&&b| matches!(b, 32..=126 | b'\t' | b'\n' | b'\r'))
        .count();
    (printable as f64 / data.len() as f64) < PRINTABLE_THRESHOLD
}

/// Text shown instead of a binary stream.
pub fn binary_placeholder(len: usize) -> String {
    format!("[binary data, {len} bytes]")
}
