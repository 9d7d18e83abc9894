// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Shared HTTP utilities for Herald.
//!
//! Every upstream client (GNews, Google CSE, Gemini, the chat-completion
//! family) builds its `reqwest::Client` from here so the User-Agent is
//! consistent across providers.

mod client;

pub use client::{
	builder, builder_with_user_agent, new_client, new_client_with_timeout, user_agent,
};
