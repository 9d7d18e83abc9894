// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! OpenAI-compatible API types and conversions.

use herald_common_core::{LlmRequest, LlmResponse, Message, Role};
use herald_common_secret::SecretString;
use serde::{Deserialize, Serialize};

/// Configuration for an OpenAI-compatible client.
#[derive(Debug, Clone)]
pub struct OpenAiConfig {
	pub api_key: SecretString,
	/// Full chat-completions URL, e.g. `https://api.groq.com/openai/v1/chat/completions`.
	pub endpoint: String,
	pub model: String,
	/// Additional headers sent with every request (OpenRouter wants `HTTP-Referer`).
	pub extra_headers: Vec<(String, String)>,
}

impl OpenAiConfig {
	pub fn new(api_key: SecretString) -> Self {
		Self {
			api_key,
			endpoint: "https://api.openai.com/v1/chat/completions".to_string(),
			model: "gpt-4o-mini".to_string(),
			extra_headers: Vec::new(),
		}
	}

	pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
		self.endpoint = endpoint.into();
		self
	}

	pub fn with_model(mut self, model: impl Into<String>) -> Self {
		self.model = model.into();
		self
	}

	pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.extra_headers.push((name.into(), value.into()));
		self
	}
}

/// Chat completion request body.
#[derive(Debug, Clone, Serialize)]
pub struct OpenAiRequest {
	pub model: String,
	pub messages: Vec<OpenAiMessage>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub max_tokens: Option<u32>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub temperature: Option<f32>,
}

impl OpenAiRequest {
	pub fn from_llm_request(request: &LlmRequest) -> Self {
		Self {
			model: request.model.clone(),
			messages: request.messages.iter().map(OpenAiMessage::from).collect(),
			max_tokens: request.max_tokens,
			temperature: request.temperature,
		}
	}
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAiMessage {
	pub role: String,
	#[serde(default)]
	pub content: Option<String>,
}

impl From<&Message> for OpenAiMessage {
	fn from(message: &Message) -> Self {
		let role = match message.role {
			Role::System => "system",
			Role::User => "user",
			Role::Assistant => "assistant",
		};
		Self {
			role: role.to_string(),
			content: Some(message.content.clone()),
		}
	}
}

/// Chat completion response. Some gateways return HTTP 200 with an `error`
/// body instead of choices, so every field is optional.
#[derive(Debug, Clone, Deserialize)]
pub struct OpenAiResponse {
	#[serde(default)]
	pub id: Option<String>,
	#[serde(default)]
	pub model: Option<String>,
	#[serde(default)]
	pub choices: Vec<OpenAiChoice>,
	#[serde(default)]
	pub error: Option<OpenAiErrorDetail>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OpenAiChoice {
	#[serde(default)]
	pub message: Option<OpenAiMessage>,
	#[serde(default)]
	pub finish_reason: Option<String>,
}

impl OpenAiResponse {
	/// Text of the first choice, if there is any.
	pub fn first_content(&self) -> Option<&str> {
		self.choices
			.first()
			.and_then(|c| c.message.as_ref())
			.and_then(|m| m.content.as_deref())
	}

	pub fn into_llm_response(self, requested_model: &str) -> LlmResponse {
		let content = self.first_content().unwrap_or_default().to_string();
		let finish_reason = self.choices.first().and_then(|c| c.finish_reason.clone());
		LlmResponse {
			content,
			model: self.model.unwrap_or_else(|| requested_model.to_string()),
			finish_reason,
			grounding: Vec::new(),
		}
	}
}

/// API error envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct OpenAiError {
	pub error: OpenAiErrorDetail,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OpenAiErrorDetail {
	#[serde(default)]
	pub message: String,
	#[serde(rename = "type", default)]
	pub error_type: Option<String>,
	/// A string for OpenAI, a number for OpenRouter.
	#[serde(default)]
	pub code: Option<serde_json::Value>,
}

impl OpenAiErrorDetail {
	pub fn is_rate_limit_code(&self) -> bool {
		match &self.code {
			Some(serde_json::Value::Number(n)) => n.as_u64() == Some(429),
			Some(serde_json::Value::String(s)) => s == "rate_limit_exceeded" || s == "insufficient_quota",
			_ => false,
		}
	}
}
