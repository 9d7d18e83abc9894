// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! LLM abstraction types for request/response handling.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::LlmError;

/// Sampling temperature used for every search prompt.
pub const DEFAULT_TEMPERATURE: f32 = 0.7;

/// Completion budget used for every search prompt.
pub const DEFAULT_MAX_TOKENS: u32 = 4096;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
	System,
	User,
	Assistant,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Message {
	pub role: Role,
	pub content: String,
}

impl Message {
	pub fn user(content: impl Into<String>) -> Self {
		Self {
			role: Role::User,
			content: content.into(),
		}
	}

	pub fn system(content: impl Into<String>) -> Self {
		Self {
			role: Role::System,
			content: content.into(),
		}
	}
}

/// Request to send to an LLM for completion.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LlmRequest {
	pub model: String,
	pub messages: Vec<Message>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub max_tokens: Option<u32>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub temperature: Option<f32>,
}

impl LlmRequest {
	pub fn new(model: impl Into<String>) -> Self {
		Self {
			model: model.into(),
			messages: Vec::new(),
			max_tokens: None,
			temperature: None,
		}
	}

	/// A single user-turn prompt with the standard search sampling settings.
	pub fn prompt(model: impl Into<String>, prompt: impl Into<String>) -> Self {
		Self::new(model)
			.with_messages(vec![Message::user(prompt)])
			.with_temperature(DEFAULT_TEMPERATURE)
			.with_max_tokens(DEFAULT_MAX_TOKENS)
	}

	pub fn with_model(mut self, model: impl Into<String>) -> Self {
		self.model = model.into();
		self
	}

	pub fn with_messages(mut self, messages: Vec<Message>) -> Self {
		self.messages = messages;
		self
	}

	pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
		self.max_tokens = Some(max_tokens);
		self
	}

	pub fn with_temperature(mut self, temperature: f32) -> Self {
		self.temperature = Some(temperature);
		self
	}
}

/// A web page the model cited while answering (Gemini search grounding).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroundingSource {
	pub uri: String,
	#[serde(default)]
	pub title: String,
}

/// Response from an LLM completion request.
#[derive(Clone, Debug, Default)]
pub struct LlmResponse {
	pub content: String,
	pub model: String,
	pub finish_reason: Option<String>,
	pub grounding: Vec<GroundingSource>,
}

impl LlmResponse {
	pub fn new(model: impl Into<String>, content: impl Into<String>) -> Self {
		Self {
			content: content.into(),
			model: model.into(),
			..Self::default()
		}
	}

	/// True when the model returned nothing usable.
	pub fn is_empty(&self) -> bool {
		self.content.trim().is_empty()
	}
}

/// Trait for LLM client implementations.
#[async_trait]
pub trait LlmClient: Send + Sync {
	/// Sends a completion request and waits for the full response.
	async fn complete(&self, request: LlmRequest) -> Result<LlmResponse, LlmError>;
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn prompt_request_uses_search_sampling_settings() {
		let request = LlmRequest::prompt("gpt-4o-mini", "find news");
		assert_eq!(request.model, "gpt-4o-mini");
		assert_eq!(request.messages, vec![Message::user("find news")]);
		assert_eq!(request.max_tokens, Some(4096));
		assert_eq!(request.temperature, Some(0.7));
	}

	#[test]
	fn optional_fields_are_skipped() {
		let json = serde_json::to_value(LlmRequest::new("m")).unwrap();
		assert!(json.get("max_tokens").is_none());
		assert!(json.get("temperature").is_none());
		assert_eq!(json["messages"], serde_json::json!([]));
	}

	#[test]
	fn whitespace_content_is_empty() {
		assert!(LlmResponse::new("m", "  \n").is_empty());
		assert!(!LlmResponse::new("m", "{}").is_empty());
	}
}
