// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Request and response shapes of the search API.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::article::{Article, ArticleSource};
use crate::error::SearchError;
use crate::llm::GroundingSource;

/// Results returned by a normal search.
pub const STANDARD_TARGET_RESULTS: usize = 15;

/// Results returned by a deep-research search.
pub const DEEP_RESEARCH_TARGET_RESULTS: usize = 25;

/// Body of `POST /api/search`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
	#[serde(default)]
	pub query: Option<String>,
	#[serde(default)]
	pub date_from: Option<String>,
	#[serde(default)]
	pub date_to: Option<String>,
	#[serde(default, deserialize_with = "truthy")]
	pub deep_research: bool,
}

impl SearchRequest {
	pub fn new(query: impl Into<String>) -> Self {
		Self {
			query: Some(query.into()),
			..Self::default()
		}
	}

	pub fn with_dates(mut self, from: Option<&str>, to: Option<&str>) -> Self {
		self.date_from = from.map(str::to_string);
		self.date_to = to.map(str::to_string);
		self
	}

	pub fn with_deep_research(mut self, deep: bool) -> Self {
		self.deep_research = deep;
		self
	}

	/// Returns the trimmed query, or a validation error when it is missing or blank.
	pub fn validated_query(&self) -> Result<&str, SearchError> {
		self.query
			.as_deref()
			.map(str::trim)
			.filter(|q| !q.is_empty())
			.ok_or_else(|| SearchError::validation("Query is required"))
	}

	/// Lower date bound, if a non-empty one was given.
	pub fn date_from(&self) -> Option<&str> {
		non_empty(self.date_from.as_deref())
	}

	/// Upper date bound, if a non-empty one was given.
	pub fn date_to(&self) -> Option<&str> {
		non_empty(self.date_to.as_deref())
	}

	pub fn has_date_bounds(&self) -> bool {
		self.date_from().is_some() || self.date_to().is_some()
	}

	pub fn target_results(&self) -> usize {
		if self.deep_research {
			DEEP_RESEARCH_TARGET_RESULTS
		} else {
			STANDARD_TARGET_RESULTS
		}
	}
}

/// Flag parsing for loosely typed clients: null, `0`, `""`, `"0"` and
/// `"false"` are off; other numbers, strings and containers are on.
fn truthy<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
	D: Deserializer<'de>,
{
	Ok(match Value::deserialize(deserializer)? {
		Value::Null => false,
		Value::Bool(b) => b,
		Value::Number(n) => n.as_f64().is_some_and(|v| v != 0.0),
		Value::String(s) => !matches!(s.trim().to_ascii_lowercase().as_str(), "" | "0" | "false"),
		Value::Array(_) | Value::Object(_) => true,
	})
}

fn non_empty(value: Option<&str>) -> Option<&str> {
	value.map(str::trim).filter(|v| !v.is_empty())
}

/// Per-producer article counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceCounts {
	pub gnews: usize,
	pub ai: usize,
}

impl SourceCounts {
	pub fn tally(articles: &[Article]) -> Self {
		articles.iter().fold(Self::default(), |mut counts, article| {
			match article.source {
				Some(ArticleSource::Gnews) => counts.gnews += 1,
				Some(ArticleSource::Ai) => counts.ai += 1,
				_ => {}
			}
			counts
		})
	}
}

/// Body of a successful `POST /api/search` response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
	pub articles: Vec<Article>,
	pub search_summary: String,
	pub total_results: usize,
	pub provider: Option<String>,
	pub model: Option<String>,
	/// Elapsed seconds, two decimals.
	pub search_time: String,
	pub sources: SourceCounts,
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub grounding_sources: Vec<GroundingSource>,
}

/// Query parameters of `GET /api/search`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebSearchRequest {
	#[serde(default)]
	pub q: Option<String>,
	#[serde(default)]
	pub date_from: Option<String>,
	#[serde(default)]
	pub date_to: Option<String>,
	/// One-based index of the first result, as Google CSE counts it.
	#[serde(default)]
	pub start: Option<u32>,
}

impl WebSearchRequest {
	pub fn validated_query(&self) -> Result<&str, SearchError> {
		self.q
			.as_deref()
			.map(str::trim)
			.filter(|q| !q.is_empty())
			.ok_or_else(|| SearchError::validation("Query parameter 'q' is required"))
	}

	pub fn date_from(&self) -> Option<&str> {
		non_empty(self.date_from.as_deref())
	}

	pub fn date_to(&self) -> Option<&str> {
		non_empty(self.date_to.as_deref())
	}

	pub fn start(&self) -> u32 {
		self.start.unwrap_or(1).max(1)
	}
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebSearchInfo {
	pub total_results: u64,
	pub search_time: f64,
	pub query: String,
}

/// Body of a successful `GET /api/search` response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebSearchResponse {
	pub articles: Vec<Article>,
	pub search_info: WebSearchInfo,
	/// `start` value for the next page, when there is one.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub next_page: Option<u32>,
}

/// Formats elapsed seconds with two decimals.
pub fn format_search_time(elapsed: std::time::Duration) -> String {
	format!("{:.2}", elapsed.as_secs_f64())
}
