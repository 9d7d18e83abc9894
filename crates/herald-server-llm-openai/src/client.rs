// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! OpenAI-compatible chat completion client implementation.

use std::time::Duration;

use async_trait::async_trait;
use herald_common_core::{mentions_rate_limit, LlmClient, LlmError, LlmRequest, LlmResponse};
use reqwest::Client;
use tracing::{debug, error, info, instrument, trace};

use crate::types::{OpenAiConfig, OpenAiError, OpenAiRequest, OpenAiResponse};

/// Upper bound for a single HTTP exchange; orchestration applies its own,
/// shorter, per-attempt timeouts.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// Chat completion client for any OpenAI-compatible provider.
#[derive(Debug, Clone)]
pub struct OpenAiClient {
	config: OpenAiConfig,
	http_client: Client,
}

impl OpenAiClient {
	pub fn new(config: OpenAiConfig) -> Result<Self, LlmError> {
		let http_client = herald_common_http::builder()
			.timeout(REQUEST_TIMEOUT)
			.build()
			.map_err(|e| LlmError::Http(e.to_string()))?;

		debug!(
			model = %config.model,
			endpoint = %config.endpoint,
			"Initialized OpenAI-compatible client"
		);

		Ok(Self {
			config,
			http_client,
		})
	}

	pub fn config(&self) -> &OpenAiConfig {
		&self.config
	}

	fn build_request(&self, request: &LlmRequest) -> reqwest::RequestBuilder {
		let body = OpenAiRequest::from_llm_request(request);

		let mut builder = self
			.http_client
			.post(&self.config.endpoint)
			.header("Content-Type", "application/json")
			.header(
				"Authorization",
				format!("Bearer {}", self.config.api_key.expose()),
			);

		for (name, value) in &self.config.extra_headers {
			builder = builder.header(name.as_str(), value.as_str());
		}

		trace!(
			endpoint = %self.config.endpoint,
			model = %request.model,
			message_count = request.messages.len(),
			"Building chat completion request"
		);

		builder.json(&body)
	}

	async fn handle_error_response(&self, response: reqwest::Response) -> LlmError {
		let status = response.status();
		let status_code = status.as_u16();

		debug!(status = %status, "Received error response");

		if status_code == 429 {
			let retry_after = response
				.headers()
				.get("retry-after")
				.and_then(|v| v.to_str().ok())
				.and_then(|v| v.parse().ok());

			return LlmError::RateLimited {
				retry_after_secs: retry_after,
			};
		}

		if status_code == 401 {
			return LlmError::Api("Authentication failed".to_string());
		}

		let body = response.text().await.unwrap_or_default();
		match serde_json::from_str::<OpenAiError>(&body) {
			Ok(error) => {
				error!(
					status = status_code,
					error_type = ?error.error.error_type,
					code = ?error.error.code,
					message = %error.error.message,
					"Chat completion API error"
				);
				if error.error.is_rate_limit_code() {
					return LlmError::RateLimited {
						retry_after_secs: None,
					};
				}
				LlmError::Api(error.error.message)
			}
			Err(_) if status_code == 403 && mentions_rate_limit(&body) => LlmError::RateLimited {
				retry_after_secs: None,
			},
			Err(e) => {
				error!(
					status = %status,
					parse_error = %e,
					"Failed to parse error response"
				);
				LlmError::Api(format!("HTTP {status}"))
			}
		}
	}
}

#[async_trait]
impl LlmClient for OpenAiClient {
	#[instrument(skip(self, request), fields(model = %request.model, endpoint = %self.config.endpoint))]
	async fn complete(&self, request: LlmRequest) -> Result<LlmResponse, LlmError> {
		debug!(
			message_count = request.messages.len(),
			"Starting completion request"
		);

		let response = self.build_request(&request).send().await.map_err(|e| {
			if e.is_timeout() {
				LlmError::Timeout
			} else {
				LlmError::Http(e.to_string())
			}
		})?;

		if !response.status().is_success() {
			return Err(self.handle_error_response(response).await);
		}

		let body: OpenAiResponse = response
			.json()
			.await
			.map_err(|e| LlmError::InvalidResponse(e.to_string()))?;

		if let Some(detail) = body.error {
			error!(code = ?detail.code, message = %detail.message, "Error payload in successful response");
			if detail.is_rate_limit_code() {
				return Err(LlmError::RateLimited {
					retry_after_secs: None,
				});
			}
			return Err(LlmError::Api(detail.message));
		}

		trace!(response_id = ?body.id, model = ?body.model, "Received chat completion");

		let response = body.into_llm_response(&request.model);
		if response.is_empty() {
			return Err(LlmError::InvalidResponse(
				"No content in response".to_string(),
			));
		}

		info!(
			content_len = response.content.len(),
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
	use wiremock::matchers::{body_partial_json, header, method};
	use wiremock::{Mock, MockServer, ResponseTemplate};

	fn client_for(server: &MockServer) -> OpenAiClient {
		let config = OpenAiConfig::new(SecretString::new("sk-test".to_string()))
			.with_endpoint(format!("{}/v1/chat/completions", server.uri()))
			.with_model("gpt-4o-mini")
			.with_header("HTTP-Referer", "http://localhost:3000");
		OpenAiClient::new(config).unwrap()
	}

	#[test]
	fn test_client_creation() {
		let config = OpenAiConfig::new(SecretString::new("key".to_string()))
			.with_endpoint("https://api.groq.com/openai/v1/chat/completions")
			.with_model("llama-3.3-70b-versatile");
		let client = OpenAiClient::new(config).unwrap();
		assert_eq!(client.config().model, "llama-3.3-70b-versatile");
		assert!(!format!("{client:?}").contains("\"key\""));
	}

	#[tokio::test]
	async fn sends_bearer_auth_extra_headers_and_body() {
		let server = MockServer::start().await;
		Mock::given(method("POST"))
			.and(header("authorization", "Bearer sk-test"))
			.and(header("http-referer", "http://localhost:3000"))
			.and(body_partial_json(json!({
				"model": "gpt-4o-mini",
				"max_tokens": 4096,
				"messages": [{ "role": "user", "content": "find news" }]
			})))
			.respond_with(ResponseTemplate::new(200).set_body_json(json!({
				"id": "chatcmpl-1",
				"model": "gpt-4o-mini",
				"choices": [{
					"message": { "role": "assistant", "content": "{\"articles\": []}" },
					"finish_reason": "stop"
				}]
			})))
			.expect(1)
			.mount(&server)
			.await;

		let response = client_for(&server)
			.complete(LlmRequest::prompt("gpt-4o-mini", "find news"))
			.await
			.unwrap();
		assert_eq!(response.content, "{\"articles\": []}");
		assert_eq!(response.model, "gpt-4o-mini");
	}

	#[tokio::test]
	async fn status_429_is_rate_limited_with_retry_after() {
		let server = MockServer::start().await;
		Mock::given(method("POST"))
			.respond_with(ResponseTemplate::new(429).insert_header("retry-after", "12"))
			.mount(&server)
			.await;

		let err = client_for(&server)
			.complete(LlmRequest::prompt("gpt-4o-mini", "x"))
			.await
			.unwrap_err();
		assert!(err.is_rate_limited());
		assert_eq!(err.retry_after_secs(), Some(12));
	}

	#[tokio::test]
	async fn empty_content_is_invalid_response() {
		let server = MockServer::start().await;
		Mock::given(method("POST"))
			.respond_with(ResponseTemplate::new(200).set_body_json(json!({
				"choices": [{ "message": { "role": "assistant", "content": "" } }]
			})))
			.mount(&server)
			.await;

		let err = client_for(&server)
			.complete(LlmRequest::prompt("gpt-4o-mini", "x"))
			.await
			.unwrap_err();
		assert!(matches!(err, LlmError::InvalidResponse(_)));
	}

	#[tokio::test]
	async fn error_payload_with_ok_status_is_an_error() {
		let server = MockServer::start().await;
		Mock::given(method("POST"))
			.respond_with(ResponseTemplate::new(200).set_body_json(json!({
				"error": { "message": "Rate limit exceeded: free-models-per-day", "code": 429 }
			})))
			.mount(&server)
			.await;

		let err = client_for(&server)
			.complete(LlmRequest::prompt("gpt-4o-mini", "x"))
			.await
			.unwrap_err();
		assert!(err.is_rate_limited());
	}

	#[tokio::test]
	async fn api_error_message_is_surfaced() {
		let server = MockServer::start().await;
		Mock::given(method("POST"))
			.respond_with(ResponseTemplate::new(404).set_body_json(json!({
				"error": { "message": "The model does not exist", "code": "model_not_found" }
			})))
			.mount(&server)
			.await;

		let err = client_for(&server)
			.complete(LlmRequest::prompt("gpt-4o-mini", "x"))
			.await
			.unwrap_err();
		match err {
			LlmError::Api(message) => assert_eq!(message, "The model does not exist"),
			other => panic!("unexpected error: {other:?}"),
		}
	}
}
