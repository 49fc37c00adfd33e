// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
//! Byte-to-text decoding for process output.
//!
//! Output comes from tools running under arbitrary locales, so decoding
//! walks a fixed chain of encodings and takes the first strict success.
//! The chain ends in ISO-8859-1, which maps every byte to a code point, and
//! a lossy UTF-8 decode backs that up; [`decode`] therefore never fails.

use encoding_rs::Encoding;
use tracing::debug;

/// One step of the fallback chain.
#[derive(Debug, Clone, Copy)]
enum Attempt {
    /// WHATWG label resolved through `encoding_rs`.
    Label(&'static str),
    /// ISO-8859-1: byte `b` becomes `U+00bb`.  `encoding_rs` maps the
    /// `latin1` label to windows-1252, which differs in 0x80–0x9F, so this
    /// step is done by hand.
    Latin1,
}

const CHAIN: [Attempt; 4] = [
    Attempt::Label("utf-8"),
    Attempt::Label("gbk"),
    Attempt::Label("gb2312"),
    Attempt::Latin1,
];

impl Attempt {
    fn name(self) -> &'static str {
        match self {
            Attempt::Label(l) => l,
            Attempt::Latin1 => "latin1",
        }
    }

    fn try_decode(self, data: &[u8]) -> Option<String> {
        match self {
            Attempt::Label(label) => Encoding::for_label(label.as_bytes())?
                .decode_without_bom_handling_and_without_replacement(data)
                .map(|text| text.into_owned()),
            Attempt::Latin1 => Some(data.iter().map(|&b| char::from(b)).collect()),
        }
    }
}

/// Decode `data` and trim surrounding whitespace.
pub fn decode(data: &[u8]) -> String {
    decode_with_encoding(data).0
}

/// Like [`decode`] but also reports which encoding produced the text.
pub fn decode_with_encoding(data: &[u8]) -> (String, &'static str) {
    for attempt in CHAIN {
        if let Some(text) = attempt.try_decode(data) {
            return (text.trim().to_string(), attempt.name());
        }
        debug!(encoding = attempt.name(), "decode attempt failed, trying next");
    }
    let text = String::from_utf8_lossy(data);
    (text.trim().to_string(), "utf-8 (lossy)")
}
