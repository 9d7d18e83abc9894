// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! OpenAI-compatible chat completion client for Herald.
//!
//! Groq, OpenAI, Together and OpenRouter all speak the same
//! `/chat/completions` dialect; one client serves them all, configured with
//! the provider's endpoint and any extra headers it wants.

mod client;
mod types;

pub use client::OpenAiClient;
pub use types::*;
