// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Gemini-specific API types and conversions.

use herald_common_core::{GroundingSource, LlmError, LlmRequest, LlmResponse, Role};
use herald_common_secret::SecretString;
use serde::{Deserialize, Serialize};

/// Configuration for the Gemini client.
#[derive(Debug, Clone)]
pub struct GeminiConfig {
	pub api_key: SecretString,
	/// Base URL of the Generative Language API, up to and including the version.
	pub base_url: String,
	/// Model used when a request does not name one.
	pub model: String,
	/// Enable the `google_search` grounding tool.
	pub search_grounding: bool,
}

impl GeminiConfig {
	pub fn new(api_key: SecretString) -> Self {
		Self {
			api_key,
			base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
			model: "gemini-2.0-flash".to_string(),
			search_grounding: true,
		}
	}

	pub fn with_model(mut self, model: impl Into<String>) -> Self {
		self.model = model.into();
		self
	}

	pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
		self.base_url = base_url.into();
		self
	}

	pub fn with_search_grounding(mut self, enabled: bool) -> Self {
		self.search_grounding = enabled;
		self
	}
}

/// generateContent request body.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiRequest {
	pub contents: Vec<GeminiContent>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub system_instruction: Option<GeminiContent>,
	#[serde(skip_serializing_if = "Vec::is_empty", default)]
	pub tools: Vec<GeminiTool>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub generation_config: Option<GeminiGenerationConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiContent {
	#[serde(skip_serializing_if = "Option::is_none", default)]
	pub role: Option<String>,
	#[serde(default)]
	pub parts: Vec<GeminiPart>,
}

/// A content part. Only text is produced or consumed here; other part kinds
/// deserialize with `text: None`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiPart {
	#[serde(skip_serializing_if = "Option::is_none", default)]
	pub text: Option<String>,
}

impl GeminiPart {
	fn text(text: impl Into<String>) -> Self {
		Self {
			text: Some(text.into()),
		}
	}
}

/// Tool declaration; Herald only uses Google Search grounding.
#[derive(Debug, Clone, Serialize)]
pub struct GeminiTool {
	pub google_search: GoogleSearchTool,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct GoogleSearchTool {}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiGenerationConfig {
	#[serde(skip_serializing_if = "Option::is_none")]
	pub max_output_tokens: Option<u32>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub temperature: Option<f32>,
}

impl GeminiRequest {
	pub fn from_llm_request(req: &LlmRequest, search_grounding: bool) -> Self {
		let mut system_instruction = None;
		let mut contents = Vec::new();

		for msg in &req.messages {
			match msg.role {
				Role::System => {
					if system_instruction.is_none() {
						system_instruction = Some(GeminiContent {
							role: None,
							parts: vec![GeminiPart::text(msg.content.clone())],
						});
					}
				}
				Role::User => contents.push(GeminiContent {
					role: Some("user".to_string()),
					parts: vec![GeminiPart::text(msg.content.clone())],
				}),
				Role::Assistant => contents.push(GeminiContent {
					role: Some("model".to_string()),
					parts: vec![GeminiPart::text(msg.content.clone())],
				}),
			}
		}

		let tools = if search_grounding {
			vec![GeminiTool {
				google_search: GoogleSearchTool::default(),
			}]
		} else {
			Vec::new()
		};

		let generation_config = if req.max_tokens.is_some() || req.temperature.is_some() {
			Some(GeminiGenerationConfig {
				max_output_tokens: req.max_tokens,
				temperature: req.temperature,
			})
		} else {
			None
		};

		Self {
			contents,
			system_instruction,
			tools,
			generation_config,
		}
	}
}

/// generateContent response.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiResponse {
	#[serde(default)]
	pub candidates: Vec<GeminiCandidate>,
	#[serde(default)]
	pub prompt_feedback: Option<GeminiPromptFeedback>,
	#[serde(default)]
	pub model_version: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiCandidate {
	#[serde(default)]
	pub content: Option<GeminiContent>,
	#[serde(default)]
	pub finish_reason: Option<String>,
	#[serde(default)]
	pub grounding_metadata: Option<GroundingMetadata>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiPromptFeedback {
	#[serde(default)]
	pub block_reason: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroundingMetadata {
	#[serde(default)]
	pub grounding_chunks: Vec<GroundingChunk>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GroundingChunk {
	#[serde(default)]
	pub web: Option<GroundingWeb>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GroundingWeb {
	#[serde(default)]
	pub uri: Option<String>,
	#[serde(default)]
	pub title: Option<String>,
}

/// Error envelope from the Generative Language API.
#[derive(Debug, Clone, Deserialize)]
pub struct GeminiError {
	pub error: GeminiErrorDetail,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeminiErrorDetail {
	#[serde(default)]
	pub message: String,
	/// e.g. `RESOURCE_EXHAUSTED`, `INVALID_ARGUMENT`.
	#[serde(default)]
	pub status: Option<String>,
	#[serde(default)]
	pub code: Option<i32>,
}

impl GeminiErrorDetail {
	pub fn is_resource_exhausted(&self) -> bool {
		self.code == Some(429) || self.status.as_deref() == Some("RESOURCE_EXHAUSTED")
	}
}

impl GeminiResponse {
	/// Concatenates the text parts of the first candidate and collects its
	/// grounding sources.
	pub fn into_llm_response(self, model: &str) -> Result<LlmResponse, LlmError> {
		let model = self.model_version.unwrap_or_else(|| model.to_string());

		let Some(candidate) = self.candidates.into_iter().next() else {
			let reason = self
				.prompt_feedback
				.and_then(|f| f.block_reason)
				.unwrap_or_else(|| "no candidates".to_string());
			return Err(LlmError::InvalidResponse(format!(
				"Gemini response had no candidates ({reason})"
			)));
		};

		let content: String = candidate
			.content
			.map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
			.unwrap_or_default();

		let grounding = candidate
			.grounding_metadata
			.unwrap_or_default()
			.grounding_chunks
			.into_iter()
			.filter_map(|chunk| chunk.web)
			.filter_map(|web| {
				web.uri.filter(|u| !u.is_empty()).map(|uri| GroundingSource {
					uri,
					title: web.title.unwrap_or_default(),
				})
			})
			.collect();

		Ok(LlmResponse {
			content,
			model,
			finish_reason: candidate.finish_reason,
			grounding,
		})
	}
}
