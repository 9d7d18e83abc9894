// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

use std::collections::BTreeMap;

use thiserror::Error;

/// Result type alias for search operations.
pub type SearchResult<T> = Result<T, SearchError>;

/// Top-level error type for a search request.
#[derive(Error, Debug, Clone)]
pub enum SearchError {
	#[error("{0}")]
	Validation(String),

	#[error("{message}")]
	Configuration {
		message: String,
		/// Credential name to where it can be obtained.
		setup: BTreeMap<String, String>,
	},

	#[error("{provider} error: {message}")]
	Upstream { provider: String, message: String },

	#[error("{provider} rate limited")]
	RateLimited {
		provider: String,
		retry_after_secs: Option<u64>,
	},

	#[error("All {attempts} AI provider attempts failed")]
	AllProvidersFailed { attempts: usize },
}

impl SearchError {
	pub fn validation(message: impl Into<String>) -> Self {
		SearchError::Validation(message.into())
	}

	pub fn upstream(provider: impl Into<String>, message: impl Into<String>) -> Self {
		SearchError::Upstream {
			provider: provider.into(),
			message: message.into(),
		}
	}
}

/// Failure to pull a JSON object out of model output.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
	#[error("no JSON object found in content")]
	NoJsonObject,

	#[error("invalid JSON: {0}")]
	InvalidJson(String),
}

/// Errors that can occur during LLM interactions.
#[derive(Clone, Error, Debug)]
pub enum LlmError {
	#[error("HTTP error: {0}")]
	Http(String),

	#[error("API error: {0}")]
	Api(String),

	#[error("Request timed out")]
	Timeout,

	#[error("Invalid response: {0}")]
	InvalidResponse(String),

	#[error("Rate limited: retry after {retry_after_secs:?} seconds")]
	RateLimited { retry_after_secs: Option<u64> },
}

impl LlmError {
	/// True for explicit rate limiting and for API errors whose message
	/// mentions a quota or limit.
	pub fn is_rate_limited(&self) -> bool {
		match self {
			LlmError::RateLimited { .. } => true,
			LlmError::Api(message) => mentions_rate_limit(message),
			_ => false,
		}
	}

	pub fn retry_after_secs(&self) -> Option<u64> {
		match self {
			LlmError::RateLimited { retry_after_secs } => *retry_after_secs,
			_ => None,
		}
	}
}

/// Matches the wording providers use for quota and rate-limit failures.
pub fn mentions_rate_limit(message: &str) -> bool {
	let lower = message.to_lowercase();
	lower.contains("quota") || lower.contains("rate") || lower.contains("limit")
}
