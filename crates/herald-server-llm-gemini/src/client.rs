// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Gemini API client implementation.

use std::time::Duration;

use async_trait::async_trait;
use herald_common_core::{mentions_rate_limit, LlmClient, LlmError, LlmRequest, LlmResponse};
use reqwest::Client;
use tracing::{debug, error, info, instrument, trace};

use crate::types::{GeminiConfig, GeminiError, GeminiRequest, GeminiResponse};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// Gemini API client.
///
/// Implements [`LlmClient`] for the `generateContent` endpoint. Text parts of
/// the first candidate become the response content; grounding chunks become
/// [`LlmResponse::grounding`].
#[derive(Debug, Clone)]
pub struct GeminiClient {
	config: GeminiConfig,
	http_client: Client,
}

impl GeminiClient {
	pub fn new(config: GeminiConfig) -> Result<Self, LlmError> {
		let http_client = herald_common_http::builder()
			.timeout(REQUEST_TIMEOUT)
			.build()
			.map_err(|e| LlmError::Http(e.to_string()))?;

		debug!(
			model = %config.model,
			base_url = %config.base_url,
			search_grounding = config.search_grounding,
			"Initialized Gemini client"
		);

		Ok(Self {
			config,
			http_client,
		})
	}

	pub fn config(&self) -> &GeminiConfig {
		&self.config
	}

	fn endpoint(&self, model: &str) -> String {
		format!(
			"{}/models/{}:generateContent",
			self.config.base_url.trim_end_matches('/'),
			model
		)
	}

	async fn handle_error_response(&self, response: reqwest::Response) -> LlmError {
		let status = response.status();
		let status_code = status.as_u16();
		let body = response.text().await.unwrap_or_default();

		debug!(status = %status, "Received error response from Gemini");

		match serde_json::from_str::<GeminiError>(&body) {
			Ok(error) => {
				error!(
					status = status_code,
					error_status = ?error.error.status,
					message = %error.error.message,
					"Gemini API error"
				);
				if status_code == 429 || error.error.is_resource_exhausted() {
					return LlmError::RateLimited {
						retry_after_secs: None,
					};
				}
				LlmError::Api(error.error.message)
			}
			Err(_) if status_code == 429 || mentions_rate_limit(&body) => LlmError::RateLimited {
				retry_after_secs: None,
			},
			Err(e) => {
				error!(
					status = %status,
					parse_error = %e,
					"Failed to parse Gemini error response"
				);
				LlmError::Api(format!("HTTP {status}"))
			}
		}
	}
}

#[async_trait]
impl LlmClient for GeminiClient {
	#[instrument(skip(self, request), fields(model = %request.model))]
	async fn complete(&self, request: LlmRequest) -> Result<LlmResponse, LlmError> {
		let model = if request.model.is_empty() {
			self.config.model.clone()
		} else {
			request.model.clone()
		};
		let url = self.endpoint(&model);
		let body = GeminiRequest::from_llm_request(&request, self.config.search_grounding);

		trace!(url = %url, message_count = request.messages.len(), "Building Gemini request");

		let response = self
			.http_client
			.post(&url)
			.header("x-goog-api-key", self.config.api_key.expose())
			.json(&body)
			.send()
			.await
			.map_err(|e| {
				if e.is_timeout() {
					LlmError::Timeout
				} else {
					LlmError::Http(e.to_string())
				}
			})?;

		if !response.status().is_success() {
			return Err(self.handle_error_response(response).await);
		}

		let gemini_response: GeminiResponse = response
			.json()
			.await
			.map_err(|e| LlmError::InvalidResponse(e.to_string()))?;

		let response = gemini_response.into_llm_response(&model)?;
		if response.is_empty() {
			return Err(LlmError::InvalidResponse(
				"No content in response".to_string(),
			));
		}

		info!(
			content_len = response.content.len(),
			grounding_sources = response.grounding.len(),
			finish_reason = ?response.finish_reason,
			"Completion request successful"
		);
		Ok(response)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use herald_common_secret::SecretString;
	use serde_json::json;
	use wiremock::matchers::{header, method, path};
	use wiremock::{Mock, MockServer, ResponseTemplate};

	fn client_for(server: &MockServer) -> GeminiClient {
		let config = GeminiConfig::new(SecretString::new("gm-test".to_string()))
			.with_base_url(format!("{}/v1beta", server.uri()));
		GeminiClient::new(config).unwrap()
	}

	#[test]
	fn endpoint_includes_model() {
		let client = GeminiClient::new(GeminiConfig::new(SecretString::new("k".to_string()))).unwrap();
		assert_eq!(
			client.endpoint("gemini-1.5-flash"),
			"https://generativelanguage.googleapis.com/v1beta/models/gemini-1.5-flash:generateContent"
		);
	}

	#[tokio::test]
	async fn grounded_completion() {
		let server = MockServer::start().await;
		Mock::given(method("POST"))
			.and(path("/v1beta/models/gemini-2.0-flash:generateContent"))
			.and(header("x-goog-api-key", "gm-test"))
			.respond_with(ResponseTemplate::new(200).set_body_json(json!({
				"candidates": [{
					"content": { "parts": [{ "text": "{\"articles\": []}" }] },
					"groundingMetadata": {
						"groundingChunks": [{ "web": { "uri": "https://a.example", "title": "a.example" } }]
					}
				}]
			})))
			.expect(1)
			.mount(&server)
			.await;

		let response = client_for(&server)
			.complete(LlmRequest::prompt("gemini-2.0-flash", "news"))
			.await
			.unwrap();
		assert_eq!(response.content, "{\"articles\": []}");
		assert_eq!(response.grounding.len(), 1);
		assert_eq!(response.model, "gemini-2.0-flash");
	}

	#[tokio::test]
	async fn resource_exhausted_is_rate_limited() {
		let server = MockServer::start().await;
		Mock::given(method("POST"))
			.respond_with(ResponseTemplate::new(429).set_body_json(json!({
				"error": { "code": 429, "message": "Resource has been exhausted", "status": "RESOURCE_EXHAUSTED" }
			})))
			.mount(&server)
			.await;

		let err = client_for(&server)
			.complete(LlmRequest::prompt("gemini-2.0-flash", "news"))
			.await
			.unwrap_err();
		assert!(err.is_rate_limited());
	}

	#[tokio::test]
	async fn invalid_argument_is_api_error() {
		let server = MockServer::start().await;
		Mock::given(method("POST"))
			.respond_with(ResponseTemplate::new(400).set_body_json(json!({
				"error": { "code": 400, "message": "API key not valid", "status": "INVALID_ARGUMENT" }
			})))
			.mount(&server)
			.await;

		let err = client_for(&server)
			.complete(LlmRequest::prompt("gemini-2.0-flash", "news"))
			.await
			.unwrap_err();
		match err {
			LlmError::Api(message) => assert_eq!(message, "API key not valid"),
			other => panic!("unexpected error: {other:?}"),
		}
	}
}
