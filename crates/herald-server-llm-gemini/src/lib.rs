// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Gemini LLM client implementation for Herald.
//!
//! Calls the public Generative Language API with the `google_search` tool
//! enabled, so answers are grounded in live web results and the cited pages
//! come back alongside the text.

mod client;
mod types;

pub use client::GeminiClient;
pub use types::*;
