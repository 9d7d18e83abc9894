// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Request/response types for the GNews API.

use chrono::{DateTime, Utc};
use herald_common_core::{display_date_time, Article, ArticleSource, UNKNOWN_PUBLISHER};
use serde::Deserialize;
use serde_json::Value;

/// GNews returns at most this many articles per request.
pub const MAX_PER_REQUEST: u32 = 10;

/// Length of the `content` fallback used when an article has no description.
const SUMMARY_FALLBACK_CHARS: usize = 200;

/// A single GNews search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GnewsRequest {
	pub query: String,
	pub max: u32,
	pub lang: String,
	/// ISO 8601 lower bound, already widened to a timestamp.
	pub from: Option<String>,
	/// ISO 8601 upper bound, already widened to a timestamp.
	pub to: Option<String>,
}

impl GnewsRequest {
	pub fn new(query: impl Into<String>) -> Self {
		Self {
			query: query.into(),
			max: MAX_PER_REQUEST,
			lang: "en".to_string(),
			from: None,
			to: None,
		}
	}

	pub fn with_max(mut self, max: u32) -> Self {
		self.max = max.clamp(1, MAX_PER_REQUEST);
		self
	}

	/// Sets the date window; plain dates cover the whole day on each side.
	pub fn with_date_range(mut self, from: Option<&str>, to: Option<&str>) -> Self {
		self.from = from.map(|d| widen_bound(d, Bound::Start));
		self.to = to.map(|d| widen_bound(d, Bound::End));
		self
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Bound {
	Start,
	End,
}

/// Turns `2025-01-31` into `2025-01-31T23:59:59Z` (or `T00:00:00Z` for a lower
/// bound). Full timestamps and unrecognised strings pass through unchanged.
pub(crate) fn widen_bound(raw: &str, bound: Bound) -> String {
	let raw = raw.trim();
	if DateTime::parse_from_rfc3339(raw).is_ok() {
		return raw.to_string();
	}
	match herald_common_core::parse_date(raw) {
		Some(date) => {
			let time = match bound {
				Bound::Start => "00:00:00",
				Bound::End => "23:59:59",
			};
			format!("{}T{time}Z", date.format("%Y-%m-%d"))
		}
		None => raw.to_string(),
	}
}

/// Normalized GNews search result.
#[derive(Debug, Clone)]
pub struct GnewsResponse {
	pub query: String,
	pub total_articles: u64,
	pub articles: Vec<Article>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GnewsApiResponse {
	#[serde(default)]
	pub total_articles: Option<u64>,
	#[serde(default)]
	pub articles: Option<Vec<GnewsApiArticle>>,
	#[serde(default)]
	pub errors: Option<Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GnewsApiArticle {
	#[serde(default)]
	pub title: Option<String>,
	#[serde(default)]
	pub description: Option<String>,
	#[serde(default)]
	pub content: Option<String>,
	#[serde(default)]
	pub url: Option<String>,
	#[serde(default)]
	pub image: Option<String>,
	#[serde(default)]
	pub published_at: Option<String>,
	#[serde(default)]
	pub source: Option<GnewsApiSource>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GnewsApiSource {
	#[serde(default)]
	pub name: Option<String>,
}

/// First human-readable message of a GNews `errors` payload.
///
/// GNews sends either a list of strings or an object keyed by field.
pub(crate) fn first_error_message(errors: &Value) -> String {
	let message = match errors {
		Value::String(s) => Some(s.clone()),
		Value::Array(items) => items.iter().find_map(|v| v.as_str().map(str::to_string)),
		Value::Object(map) => map.values().find_map(|v| match v {
			Value::String(s) => Some(s.clone()),
			Value::Array(items) => items.first().and_then(|i| i.as_str()).map(str::to_string),
			_ => None,
		}),
		_ => None,
	};
	message.unwrap_or_else(|| "GNews API error".to_string())
}

impl GnewsApiArticle {
	pub(crate) fn into_article(self, index: usize) -> Article {
		let (published_date, published_time) = self
			.published_at
			.as_deref()
			.and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
			.map(|dt| display_date_time(dt.with_timezone(&Utc)))
			.map_or((None, None), |(d, t)| (Some(d), Some(t)));

		let summary = self
			.description
			.filter(|d| !d.trim().is_empty())
			.or_else(|| {
				self.content
					.map(|c| c.chars().take(SUMMARY_FALLBACK_CHARS).collect::<String>())
			})
			.unwrap_or_default();

		Article {
			title: self.title.unwrap_or_default(),
			publisher: self
				.source
				.and_then(|s| s.name)
				.filter(|n| !n.trim().is_empty())
				.unwrap_or_else(|| UNKNOWN_PUBLISHER.to_string()),
			published_date,
			published_time,
			url: self.url.unwrap_or_default(),
			summary,
			image: self.image.filter(|i| !i.is_empty()),
			relevance_score: Article::position_score(index),
			source: Some(ArticleSource::Gnews),
		}
	}
}
