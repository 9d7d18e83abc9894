// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Google Custom Search Engine client implementation.

use std::time::Duration;

use herald_common_core::mentions_rate_limit;
use herald_common_secret::SecretString;
use reqwest::{Client, Url};
use tracing::{debug, error, instrument, trace};

use crate::error::CseError;
use crate::normalize::normalize_item;
use crate::types::{CseRequest, CseResponse, GoogleCseResponse};

const DEFAULT_BASE_URL: &str = "https://www.googleapis.com/customsearch/v1";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Client for interacting with Google Custom Search Engine API.
#[derive(Debug, Clone)]
pub struct CseClient {
	http_client: Client,
	api_key: SecretString,
	cx: String,
	base_url: String,
}

impl CseClient {
	/// Creates a new CSE client with the given API key and search engine ID.
	pub fn new(api_key: SecretString, cx: impl Into<String>) -> Self {
		let http_client = herald_common_http::builder()
			.timeout(REQUEST_TIMEOUT)
			.build()
			.expect("Failed to create HTTP client");

		Self {
			http_client,
			api_key,
			cx: cx.into(),
			base_url: DEFAULT_BASE_URL.to_string(),
		}
	}

	/// Sets a custom base URL for the API (useful for testing).
	pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
		self.base_url = base_url.into();
		self
	}

	/// Performs a search and normalizes the items into articles.
	#[instrument(skip(self, request), fields(query = %request.query, start = request.start))]
	pub async fn search(&self, request: &CseRequest) -> Result<CseResponse, CseError> {
		let mut url = Url::parse(&self.base_url)
			.map_err(|e| CseError::InvalidResponse(format!("Invalid base URL: {e}")))?;

		{
			let mut pairs = url.query_pairs_mut();
			pairs
				.append_pair("key", self.api_key.expose())
				.append_pair("cx", &self.cx)
				.append_pair("q", &request.query)
				.append_pair("num", &request.num.to_string())
				.append_pair("start", &request.start.to_string());
			if let Some(sort) = request.sort_restriction() {
				pairs.append_pair("sort", &sort);
			}
		}

		debug!(url = %self.base_url, "Sending search request to Google CSE");
		trace!(sort = ?request.sort_restriction(), num = request.num, "Search parameters");

		let response = self.http_client.get(url).send().await.map_err(|e| {
			if e.is_timeout() {
				error!("Request timed out");
				return CseError::Timeout;
			}
			let e = e.without_url();
			error!(error = %e, "Network error during CSE request");
			CseError::Network(e)
		})?;

		let status = response.status();
		debug!(status = %status, "Received response from Google CSE");

		if !status.is_success() {
			let status_code = status.as_u16();
			let body = response.text().await.unwrap_or_default();

			if status_code == 429 {
				error!(status = status_code, "Rate limit exceeded");
				return Err(CseError::RateLimited);
			}

			if status_code == 401 || status_code == 403 {
				if mentions_rate_limit(&body) {
					error!(status = status_code, "Rate limit exceeded");
					return Err(CseError::RateLimited);
				}
				error!(status = status_code, "Unauthorized request");
				return Err(CseError::Unauthorized);
			}

			error!(status = status_code, body = %body, "Google API error");
			return Err(CseError::ApiError {
				status: status_code,
				message: body,
			});
		}

		let body = response.text().await.map_err(|e| {
			let e = e.without_url();
			error!(error = %e, "Failed to read response body");
			CseError::Network(e)
		})?;

		trace!(body = %body, "Response body");

		let google_response: GoogleCseResponse = serde_json::from_str(&body).map_err(|e| {
			error!(error = %e, "Failed to parse Google CSE response");
			CseError::InvalidResponse(format!("JSON parse error: {e}"))
		})?;

		if let Some(error) = google_response.error {
			error!(code = error.code, message = %error.message, "Google API returned error");
			if error.code == 429 || mentions_rate_limit(&error.message) {
				return Err(CseError::RateLimited);
			}
			return Err(CseError::ApiError {
				status: error.code,
				message: error.message,
			});
		}

		let offset = request.offset();
		let articles: Vec<_> = google_response
			.items
			.unwrap_or_default()
			.into_iter()
			.enumerate()
			.map(|(index, item)| normalize_item(item, offset + index))
			.collect();

		let (total_results, search_time) = google_response
			.search_information
			.map(|info| {
				(
					info.total_results
						.and_then(|t| t.parse::<u64>().ok())
						.unwrap_or(0),
					info.search_time.unwrap_or(0.0),
				)
			})
			.unwrap_or((0, 0.0));

		let next_start = google_response
			.queries
			.and_then(|q| q.next_page)
			.and_then(|pages| pages.into_iter().next())
			.and_then(|page| page.start_index);

		debug!(
			result_count = articles.len(),
			total_results,
			"Search completed successfully"
		);

		Ok(CseResponse {
			query: request.query.clone(),
			articles,
			total_results,
			search_time,
			next_start,
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use chrono::NaiveDate;
	use serde_json::json;
	use wiremock::matchers::{method, query_param};
	use wiremock::{Mock, MockServer, ResponseTemplate};

	fn client_for(server: &MockServer) -> CseClient {
		CseClient::new(SecretString::new("test-key".to_string()), "test-cx").with_base_url(server.uri())
	}

	#[test]
	fn test_client_creation() {
		let client = CseClient::new(SecretString::new("test-api-key".to_string()), "test-cx");
		assert_eq!(client.api_key.expose(), "test-api-key");
		assert_eq!(client.cx, "test-cx");
		assert_eq!(client.base_url, DEFAULT_BASE_URL);
	}

	#[test]
	fn test_with_base_url() {
		let client = CseClient::new(SecretString::new("key".to_string()), "cx")
			.with_base_url("https://custom.api.com");
		assert_eq!(client.base_url, "https://custom.api.com");
	}

	#[tokio::test]
	async fn sends_paging_and_date_restriction() {
		let server = MockServer::start().await;
		Mock::given(method("GET"))
			.and(query_param("key", "test-key"))
			.and(query_param("cx", "test-cx"))
			.and(query_param("q", "climate policy"))
			.and(query_param("start", "11"))
			.and(query_param("sort", "date:r:20250101:20250131"))
			.respond_with(ResponseTemplate::new(200).set_body_json(json!({
				"searchInformation": { "totalResults": "1234", "searchTime": 0.31 },
				"queries": { "nextPage": [{ "startIndex": 21 }] },
				"items": [
					{
						"title": "Council adopts climate plan",
						"link": "https://www.example.org/plan",
						"snippet": "Jan 12, 2025 ... The council adopted",
						"displayLink": "www.example.org"
					}
				]
			})))
			.expect(1)
			.mount(&server)
			.await;

		let request = CseRequest::new("climate policy", 10)
			.with_start(11)
			.with_date_range(
				NaiveDate::from_ymd_opt(2025, 1, 1),
				NaiveDate::from_ymd_opt(2025, 1, 31),
			);
		let response = client_for(&server).search(&request).await.unwrap();

		assert_eq!(response.total_results, 1234);
		assert_eq!(response.next_start, Some(21));
		assert_eq!(response.articles.len(), 1);
		let article = &response.articles[0];
		assert_eq!(article.publisher, "example.org");
		assert_eq!(article.relevance_score, 68);
		assert_eq!(article.published_date.as_deref(), Some("Jan 12, 2025"));
	}

	#[tokio::test]
	async fn no_items_is_an_empty_page() {
		let server = MockServer::start().await;
		Mock::given(method("GET"))
			.respond_with(ResponseTemplate::new(200).set_body_json(json!({
				"searchInformation": { "totalResults": "0", "searchTime": 0.1 }
			})))
			.mount(&server)
			.await;

		let response = client_for(&server)
			.search(&CseRequest::new("nothing", 10))
			.await
			.unwrap();
		assert!(response.articles.is_empty());
		assert_eq!(response.next_start, None);
	}

	#[tokio::test]
	async fn daily_quota_is_rate_limited() {
		let server = MockServer::start().await;
		Mock::given(method("GET"))
			.respond_with(ResponseTemplate::new(429).set_body_json(json!({
				"error": { "code": 429, "message": "Quota exceeded for quota metric 'Queries'" }
			})))
			.mount(&server)
			.await;

		let err = client_for(&server)
			.search(&CseRequest::new("q", 10))
			.await
			.unwrap_err();
		assert!(err.is_rate_limited());
	}

	#[tokio::test]
	async fn forbidden_without_quota_wording_is_unauthorized() {
		let server = MockServer::start().await;
		Mock::given(method("GET"))
			.respond_with(ResponseTemplate::new(403).set_body_string("API key not valid"))
			.mount(&server)
			.await;

		let err = client_for(&server)
			.search(&CseRequest::new("q", 10))
			.await
			.unwrap_err();
		assert!(matches!(err, CseError::Unauthorized));
	}

	#[tokio::test]
	async fn server_error_is_api_error() {
		let server = MockServer::start().await;
		Mock::given(method("GET"))
			.respond_with(ResponseTemplate::new(500).set_body_string("backend down"))
			.mount(&server)
			.await;

		let err = client_for(&server)
			.search(&CseRequest::new("q", 10))
			.await
			.unwrap_err();
		assert!(matches!(err, CseError::ApiError { status: 500, .. }));
	}
}
