// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! LLM provider credentials.
//!
//! Provider selection is implicit: every provider with a key is a
//! candidate, tried in a fixed priority order by the search service.

use herald_common_config::SecretString;
use serde::{Deserialize, Serialize};

/// Referer sent to OpenRouter when `SITE_URL` is not set.
pub const DEFAULT_SITE_URL: &str = "http://localhost:3000";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LlmConfigLayer {
	pub gemini_api_key: Option<SecretString>,
	pub groq_api_key: Option<SecretString>,
	pub openai_api_key: Option<SecretString>,
	pub together_api_key: Option<SecretString>,
	pub openrouter_api_key: Option<SecretString>,
	pub site_url: Option<String>,
}

impl LlmConfigLayer {
	/// Merges another layer on top of this one.
	/// Values from `other` take precedence when present.
	pub fn merge(&mut self, other: LlmConfigLayer) {
		if other.gemini_api_key.is_some() {
			self.gemini_api_key = other.gemini_api_key;
		}
		if other.groq_api_key.is_some() {
			self.groq_api_key = other.groq_api_key;
		}
		if other.openai_api_key.is_some() {
			self.openai_api_key = other.openai_api_key;
		}
		if other.together_api_key.is_some() {
			self.together_api_key = other.together_api_key;
		}
		if other.openrouter_api_key.is_some() {
			self.openrouter_api_key = other.openrouter_api_key;
		}
		if other.site_url.is_some() {
			self.site_url = other.site_url;
		}
	}

	/// Resolves this layer into a runtime configuration. Blank keys count
	/// as absent.
	pub fn finalize(self) -> LlmConfig {
		let present = |key: Option<SecretString>| key.filter(|k| !k.is_blank());
		LlmConfig {
			gemini_api_key: present(self.gemini_api_key),
			groq_api_key: present(self.groq_api_key),
			openai_api_key: present(self.openai_api_key),
			together_api_key: present(self.together_api_key),
			openrouter_api_key: present(self.openrouter_api_key),
			site_url: self
				.site_url
				.filter(|u| !u.trim().is_empty())
				.unwrap_or_else(|| DEFAULT_SITE_URL.to_string()),
		}
	}
}

/// Resolved LLM credentials, built once at start-up.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
	pub gemini_api_key: Option<SecretString>,
	pub groq_api_key: Option<SecretString>,
	pub openai_api_key: Option<SecretString>,
	pub together_api_key: Option<SecretString>,
	pub openrouter_api_key: Option<SecretString>,
	pub site_url: String,
}

impl Default for LlmConfig {
	fn default() -> Self {
		LlmConfigLayer::default().finalize()
	}
}

impl LlmConfig {
	pub fn has_any_provider(&self) -> bool {
		self.gemini_api_key.is_some()
			|| self.groq_api_key.is_some()
			|| self.openai_api_key.is_some()
			|| self.together_api_key.is_some()
			|| self.openrouter_api_key.is_some()
	}
}
