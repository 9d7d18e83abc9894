// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! GNews API client implementation.

use std::time::Duration;

use herald_common_core::mentions_rate_limit;
use herald_common_secret::SecretString;
use reqwest::Client;
use tracing::{debug, error, instrument, trace};

use crate::error::GnewsError;
use crate::types::{first_error_message, GnewsApiResponse, GnewsRequest, GnewsResponse};

const DEFAULT_BASE_URL: &str = "https://gnews.io/api/v4/search";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Client for the GNews search API.
#[derive(Debug, Clone)]
pub struct GnewsClient {
	http_client: Client,
	api_key: SecretString,
	base_url: String,
}

impl GnewsClient {
	/// Creates a new GNews client with the given API key.
	pub fn new(api_key: SecretString) -> Self {
		let http_client = herald_common_http::builder()
			.timeout(REQUEST_TIMEOUT)
			.build()
			.expect("Failed to create HTTP client");

		Self {
			http_client,
			api_key,
			base_url: DEFAULT_BASE_URL.to_string(),
		}
	}

	/// Sets a custom base URL for the API (useful for testing).
	pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
		self.base_url = base_url.into();
		self
	}

	/// Searches GNews and maps the results onto articles.
	///
	/// Relevance is position based: the first article scores 98, each
	/// following one 3 less, never below 60.
	#[instrument(skip(self, request), fields(query = %request.query, max = request.max))]
	pub async fn search(&self, request: &GnewsRequest) -> Result<GnewsResponse, GnewsError> {
		let mut params: Vec<(&str, String)> = vec![
			("q", request.query.clone()),
			("lang", request.lang.clone()),
			("max", request.max.to_string()),
			("apikey", self.api_key.expose().clone()),
		];
		if let Some(from) = &request.from {
			params.push(("from", from.clone()));
		}
		if let Some(to) = &request.to {
			params.push(("to", to.clone()));
		}

		debug!(url = %self.base_url, "Sending search request to GNews");
		trace!(from = ?request.from, to = ?request.to, "Search window");

		let response = self
			.http_client
			.get(&self.base_url)
			.query(&params)
			.send()
			.await
			.map_err(|e| {
				if e.is_timeout() {
					error!("Request timed out");
					return GnewsError::Timeout;
				}
				// The API key travels in the query string.
				let e = e.without_url();
				error!(error = %e, "Network error during GNews request");
				GnewsError::Network(e)
			})?;

		let status = response.status();
		debug!(status = %status, "Received response from GNews");

		let body = response.text().await.map_err(|e| {
			let e = e.without_url();
			error!(error = %e, "Failed to read response body");
			GnewsError::Network(e)
		})?;
		trace!(body = %body, "Response body");

		if !status.is_success() {
			let status_code = status.as_u16();
			let message = serde_json::from_str::<GnewsApiResponse>(&body)
				.ok()
				.and_then(|r| r.errors)
				.map(|e| first_error_message(&e))
				.unwrap_or(body);

			if status_code == 429 {
				error!(status = status_code, "Rate limit exceeded");
				return Err(GnewsError::RateLimited(message));
			}

			if status_code == 401 || status_code == 403 {
				if mentions_rate_limit(&message) {
					error!(status = status_code, "Request quota exhausted");
					return Err(GnewsError::RateLimited(message));
				}
				error!(status = status_code, "Unauthorized request");
				return Err(GnewsError::Unauthorized);
			}

			error!(status = status_code, message = %message, "GNews API error");
			return Err(GnewsError::ApiError {
				status: status_code,
				message,
			});
		}

		let api_response: GnewsApiResponse = serde_json::from_str(&body).map_err(|e| {
			error!(error = %e, "Failed to parse GNews response");
			GnewsError::InvalidResponse(format!("JSON parse error: {e}"))
		})?;

		if let Some(errors) = api_response.errors {
			let message = first_error_message(&errors);
			error!(message = %message, "GNews returned an error payload");
			return Err(GnewsError::ApiError {
				status: status.as_u16(),
				message,
			});
		}

		let Some(items) = api_response.articles else {
			error!("GNews response has no articles field");
			return Err(GnewsError::ApiError {
				status: status.as_u16(),
				message: "GNews API error".to_string(),
			});
		};

		let articles: Vec<_> = items
			.into_iter()
			.enumerate()
			.map(|(index, item)| item.into_article(index))
			.collect();

		debug!(
			result_count = articles.len(),
			"Search completed successfully"
		);

		Ok(GnewsResponse {
			query: request.query.clone(),
			total_articles: api_response.total_articles.unwrap_or(articles.len() as u64),
			articles,
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use herald_common_core::ArticleSource;
	use serde_json::json;
	use wiremock::matchers::{method, query_param};
	use wiremock::{Mock, MockServer, ResponseTemplate};

	fn client_for(server: &MockServer) -> GnewsClient {
		GnewsClient::new(SecretString::new("test-key".to_string())).with_base_url(server.uri())
	}

	#[test]
	fn test_client_creation() {
		let client = GnewsClient::new(SecretString::new("test-api-key".to_string()));
		assert_eq!(client.api_key.expose(), "test-api-key");
		assert_eq!(client.base_url, DEFAULT_BASE_URL);
	}

	#[test]
	fn test_debug_never_shows_key() {
		let client = GnewsClient::new(SecretString::new("super-secret".to_string()));
		assert!(!format!("{client:?}").contains("super-secret"));
	}

	#[tokio::test]
	async fn sends_expected_parameters_and_maps_articles() {
		let server = MockServer::start().await;
		Mock::given(method("GET"))
			.and(query_param("q", "climate policy"))
			.and(query_param("lang", "en"))
			.and(query_param("max", "10"))
			.and(query_param("apikey", "test-key"))
			.and(query_param("from", "2025-01-01T00:00:00Z"))
			.and(query_param("to", "2025-01-31T23:59:59Z"))
			.respond_with(ResponseTemplate::new(200).set_body_json(json!({
				"totalArticles": 120,
				"articles": [
					{
						"title": "First",
						"description": "one",
						"url": "https://news.example/1",
						"publishedAt": "2025-01-10T09:00:00Z",
						"source": { "name": "Wire" }
					},
					{
						"title": "Second",
						"description": "two",
						"url": "https://news.example/2",
						"publishedAt": "2025-01-11T09:00:00Z",
						"source": { "name": null }
					}
				]
			})))
			.expect(1)
			.mount(&server)
			.await;

		let request = GnewsRequest::new("climate policy")
			.with_date_range(Some("2025-01-01"), Some("2025-01-31"));
		let response = client_for(&server).search(&request).await.unwrap();

		assert_eq!(response.total_articles, 120);
		assert_eq!(response.articles.len(), 2);
		assert_eq!(response.articles[0].relevance_score, 98);
		assert_eq!(response.articles[1].relevance_score, 95);
		assert_eq!(response.articles[1].publisher, "Unknown");
		assert!(response
			.articles
			.iter()
			.all(|a| a.source == Some(ArticleSource::Gnews)));
	}

	#[tokio::test]
	async fn quota_exhaustion_is_rate_limited() {
		let server = MockServer::start().await;
		Mock::given(method("GET"))
			.respond_with(ResponseTemplate::new(403).set_body_json(json!({
				"errors": ["You have reached your request limit for today"]
			})))
			.mount(&server)
			.await;

		let err = client_for(&server)
			.search(&GnewsRequest::new("q"))
			.await
			.unwrap_err();
		assert!(err.is_rate_limited(), "got {err:?}");
	}

	#[tokio::test]
	async fn status_429_is_rate_limited() {
		let server = MockServer::start().await;
		Mock::given(method("GET"))
			.respond_with(ResponseTemplate::new(429).set_body_string("slow down"))
			.mount(&server)
			.await;

		let err = client_for(&server)
			.search(&GnewsRequest::new("q"))
			.await
			.unwrap_err();
		assert!(matches!(err, GnewsError::RateLimited(_)));
	}

	#[tokio::test]
	async fn bad_key_is_unauthorized() {
		let server = MockServer::start().await;
		Mock::given(method("GET"))
			.respond_with(ResponseTemplate::new(401).set_body_json(json!({
				"errors": ["Your API key is invalid"]
			})))
			.mount(&server)
			.await;

		let err = client_for(&server)
			.search(&GnewsRequest::new("q"))
			.await
			.unwrap_err();
		assert!(matches!(err, GnewsError::Unauthorized));
	}

	#[tokio::test]
	async fn error_payload_on_success_status_is_an_error() {
		let server = MockServer::start().await;
		Mock::given(method("GET"))
			.respond_with(ResponseTemplate::new(200).set_body_json(json!({
				"errors": { "q": "The query is required" }
			})))
			.mount(&server)
			.await;

		let err = client_for(&server)
			.search(&GnewsRequest::new("q"))
			.await
			.unwrap_err();
		match err {
			GnewsError::ApiError { message, .. } => assert_eq!(message, "The query is required"),
			other => panic!("unexpected error: {other:?}"),
		}
	}

	#[tokio::test]
	async fn missing_articles_is_an_error() {
		let server = MockServer::start().await;
		Mock::given(method("GET"))
			.respond_with(ResponseTemplate::new(200).set_body_json(json!({ "totalArticles": 0 })))
			.mount(&server)
			.await;

		let err = client_for(&server)
			.search(&GnewsRequest::new("q"))
			.await
			.unwrap_err();
		assert!(matches!(err, GnewsError::ApiError { .. }));
	}

	#[tokio::test]
	async fn non_json_body_is_invalid_response() {
		let server = MockServer::start().await;
		Mock::given(method("GET"))
			.respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
			.mount(&server)
			.await;

		let err = client_for(&server)
			.search(&GnewsRequest::new("q"))
			.await
			.unwrap_err();
		assert!(matches!(err, GnewsError::InvalidResponse(_)));
	}
}
