// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! HTTP mapping of search failures.

use axum::{
	http::StatusCode,
	response::{IntoResponse, Response},
	Json,
};
use herald_common_core::SearchError;
use serde::Serialize;
use std::collections::BTreeMap;

/// Retry hint sent when the upstream gave none.
pub const DEFAULT_RETRY_AFTER_SECS: u64 = 60;

pub const NEWS_SUGGESTION: &str = "Try adding a GNews API key for real article links";

/// Error body. Only the fields relevant to the failure are present.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
	pub error: String,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub setup: Option<BTreeMap<String, String>>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub retry_after: Option<u64>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub suggestion: Option<&'static str>,
}

impl ErrorBody {
	fn new(error: impl Into<String>) -> Self {
		Self {
			error: error.into(),
			setup: None,
			retry_after: None,
			suggestion: None,
		}
	}
}

/// A [`SearchError`] on its way out of a handler.
#[derive(Debug)]
pub struct ServerError {
	source: SearchError,
	suggestion: Option<&'static str>,
}

impl ServerError {
	/// Error from the news search endpoint; generic failures carry a hint.
	pub fn news(source: SearchError) -> Self {
		Self {
			source,
			suggestion: Some(NEWS_SUGGESTION),
		}
	}

	/// Error from the web search endpoint.
	pub fn web(source: SearchError) -> Self {
		Self {
			source,
			suggestion: None,
		}
	}

	pub fn status(&self) -> StatusCode {
		match &self.source {
			SearchError::Validation(_) => StatusCode::BAD_REQUEST,
			SearchError::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
			_ => StatusCode::INTERNAL_SERVER_ERROR,
		}
	}

	fn body(self) -> ErrorBody {
		let mut body = ErrorBody::new(self.source.to_string());
		match self.source {
			SearchError::Validation(_) => {}
			SearchError::Configuration { setup, .. } => body.setup = Some(setup),
			SearchError::RateLimited {
				retry_after_secs, ..
			} => body.retry_after = Some(retry_after_secs.unwrap_or(DEFAULT_RETRY_AFTER_SECS)),
			SearchError::Upstream { .. } | SearchError::AllProvidersFailed { .. } => {
				body.suggestion = self.suggestion
			}
		}
		body
	}
}

impl IntoResponse for ServerError {
	fn into_response(self) -> Response {
		let status = self.status();
		if status.is_server_error() {
			tracing::error!(error = %self.source, "Search request failed");
		} else {
			tracing::warn!(status = %status, error = %self.source, "Search request rejected");
		}
		(status, Json(self.body())).into_response()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn body_json(err: ServerError) -> serde_json::Value {
		serde_json::to_value(err.body()).unwrap()
	}

	#[test]
	fn validation_is_bad_request_without_extras() {
		let err = ServerError::news(SearchError::validation("Query is required"));
		assert_eq!(err.status(), StatusCode::BAD_REQUEST);
		assert_eq!(
			body_json(err),
			serde_json::json!({ "error": "Query is required" })
		);
	}

	#[test]
	fn configuration_carries_setup() {
		let mut setup = BTreeMap::new();
		setup.insert("gnews".to_string(), "https://gnews.io".to_string());
		let err = ServerError::news(SearchError::Configuration {
			message: "No API keys configured".to_string(),
			setup,
		});
		assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
		let body = body_json(err);
		assert_eq!(body["error"], "No API keys configured");
		assert_eq!(body["setup"]["gnews"], "https://gnews.io");
		assert!(body.get("suggestion").is_none());
	}

	#[test]
	fn rate_limit_defaults_retry_hint() {
		let err = ServerError::news(SearchError::RateLimited {
			provider: "groq".to_string(),
			retry_after_secs: None,
		});
		assert_eq!(err.status(), StatusCode::TOO_MANY_REQUESTS);
		assert_eq!(body_json(err)["retryAfter"], 60);

		let err = ServerError::web(SearchError::RateLimited {
			provider: "google_cse".to_string(),
			retry_after_secs: Some(5),
		});
		assert_eq!(body_json(err)["retryAfter"], 5);
	}

	#[test]
	fn generic_failure_suggests_news_key_only_for_news_search() {
		let news = ServerError::news(SearchError::AllProvidersFailed { attempts: 3 });
		assert_eq!(news.status(), StatusCode::INTERNAL_SERVER_ERROR);
		assert_eq!(body_json(news)["suggestion"], NEWS_SUGGESTION);

		let web = ServerError::web(SearchError::upstream("google_cse", "backend down"));
		let body = body_json(web);
		assert_eq!(body["error"], "google_cse error: backend down");
		assert!(body.get("suggestion").is_none());
	}
}
