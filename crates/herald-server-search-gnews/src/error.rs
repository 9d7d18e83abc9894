// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Error types for the GNews API client.

use thiserror::Error;

/// Errors that can occur when interacting with the GNews API.
#[derive(Debug, Error)]
pub enum GnewsError {
	/// Network-level error during HTTP communication.
	#[error("Network error: {0}")]
	Network(#[from] reqwest::Error),

	/// Request timed out.
	#[error("Request timed out")]
	Timeout,

	/// Daily request quota or rate limit exceeded.
	#[error("Rate limit exceeded: {0}")]
	RateLimited(String),

	/// Invalid API key.
	#[error("Invalid API key")]
	Unauthorized,

	/// Invalid or unparseable response from GNews.
	#[error("Invalid response from GNews: {0}")]
	InvalidResponse(String),

	/// GNews reported an error, either through the status code or an
	/// `errors` payload.
	#[error("GNews API error: {status} - {message}")]
	ApiError { status: u16, message: String },
}

impl GnewsError {
	pub fn is_rate_limited(&self) -> bool {
		matches!(self, GnewsError::RateLimited(_))
	}
}
