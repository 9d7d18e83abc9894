// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Pulls a JSON object out of free-form model output.
//!
//! Chat models wrap JSON in Markdown fences or surround it with prose. The
//! extractor strips fence markers, then parses the greedy span from the
//! first `{` to the last `}`.

use serde::de::DeserializeOwned;

use crate::error::ParseError;

/// Returns the greedy `{ ... }` span of `text` after removing code fences.
pub fn json_span(text: &str) -> Option<String> {
	let cleaned = text.replace("```json", "").replace("```", "");
	let cleaned = cleaned.trim();
	let start = cleaned.find('{')?;
	let end = cleaned.rfind('}')?;
	if end < start {
		return None;
	}
	Some(cleaned[start..=end].to_string())
}

/// Parses the JSON object embedded in `text` into `T`.
pub fn extract_json<T: DeserializeOwned>(text: &str) -> Result<T, ParseError> {
	let span = json_span(text).ok_or(ParseError::NoJsonObject)?;
	serde_json::from_str(&span).map_err(|e| ParseError::InvalidJson(e.to_string()))
}
