// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! The normalized news article record shared by every provider.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Publisher name used when a provider does not report one.
pub const UNKNOWN_PUBLISHER: &str = "Unknown";

/// Highest score handed out by position-based scoring.
pub const TOP_POSITION_SCORE: u8 = 98;

/// Lowest score handed out by position-based scoring.
pub const MIN_POSITION_SCORE: u8 = 60;

/// Which collaborator produced an article.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArticleSource {
	Gnews,
	Ai,
	Web,
}

impl fmt::Display for ArticleSource {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			ArticleSource::Gnews => write!(f, "gnews"),
			ArticleSource::Ai => write!(f, "ai"),
			ArticleSource::Web => write!(f, "web"),
		}
	}
}

/// A single news article.
///
/// Request-scoped: articles are built from upstream responses, enhanced,
/// filtered and ranked, then serialized back to the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
	#[serde(default, deserialize_with = "lenient_string")]
	pub title: String,

	#[serde(default = "default_publisher", deserialize_with = "lenient_publisher")]
	pub publisher: String,

	#[serde(
		default,
		deserialize_with = "lenient_opt_string",
		skip_serializing_if = "Option::is_none"
	)]
	pub published_date: Option<String>,

	#[serde(
		default,
		deserialize_with = "lenient_opt_string",
		skip_serializing_if = "Option::is_none"
	)]
	pub published_time: Option<String>,

	#[serde(default, deserialize_with = "lenient_string")]
	pub url: String,

	#[serde(default, deserialize_with = "lenient_string")]
	pub summary: String,

	#[serde(
		default,
		deserialize_with = "lenient_opt_string",
		skip_serializing_if = "Option::is_none"
	)]
	pub image: Option<String>,

	#[serde(default, deserialize_with = "lenient_score")]
	pub relevance_score: u8,

	/// Unrecognized tags (models sometimes put the outlet name here) read as absent.
	#[serde(
		default,
		deserialize_with = "lenient_source",
		skip_serializing_if = "Option::is_none"
	)]
	pub source: Option<ArticleSource>,
}

impl Default for Article {
	fn default() -> Self {
		Self {
			title: String::new(),
			publisher: default_publisher(),
			published_date: None,
			published_time: None,
			url: String::new(),
			summary: String::new(),
			image: None,
			relevance_score: 0,
			source: None,
		}
	}
}

impl Article {
	pub fn new(title: impl Into<String>, url: impl Into<String>) -> Self {
		Self {
			title: title.into(),
			url: url.into(),
			..Self::default()
		}
	}

	pub fn with_publisher(mut self, publisher: impl Into<String>) -> Self {
		self.publisher = publisher.into();
		self
	}

	pub fn with_published_date(mut self, date: impl Into<String>) -> Self {
		self.published_date = Some(date.into());
		self
	}

	pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
		self.summary = summary.into();
		self
	}

	pub fn with_relevance(mut self, score: u8) -> Self {
		self.relevance_score = score.min(100);
		self
	}

	pub fn with_source(mut self, source: ArticleSource) -> Self {
		self.source = Some(source);
		self
	}

	/// Score for the result at zero-based `position`: 98, 95, 92, ... floored at 60.
	pub fn position_score(position: usize) -> u8 {
		let drop = position.saturating_mul(3);
		let score = usize::from(TOP_POSITION_SCORE).saturating_sub(drop);
		score.max(usize::from(MIN_POSITION_SCORE)) as u8
	}
}

fn default_publisher() -> String {
	UNKNOWN_PUBLISHER.to_string()
}

/// Text of a scalar JSON value. Numbers and booleans are rendered; null,
/// arrays and objects have no text.
fn scalar_text(value: Value) -> Option<String> {
	match value {
		Value::String(s) => Some(s),
		Value::Number(n) => Some(n.to_string()),
		Value::Bool(b) => Some(b.to_string()),
		Value::Null | Value::Array(_) | Value::Object(_) => None,
	}
}

fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
	D: Deserializer<'de>,
{
	Ok(scalar_text(Value::deserialize(deserializer)?).unwrap_or_default())
}

fn lenient_opt_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
	D: Deserializer<'de>,
{
	Ok(scalar_text(Value::deserialize(deserializer)?))
}

fn lenient_publisher<'de, D>(deserializer: D) -> Result<String, D::Error>
where
	D: Deserializer<'de>,
{
	Ok(scalar_text(Value::deserialize(deserializer)?)
		.filter(|p| !p.trim().is_empty())
		.unwrap_or_else(default_publisher))
}

fn lenient_source<'de, D>(deserializer: D) -> Result<Option<ArticleSource>, D::Error>
where
	D: Deserializer<'de>,
{
	Ok(serde_json::from_value(Value::deserialize(deserializer)?).ok())
}

/// Accepts integers, floats and numeric strings, clamped to 0..=100.
/// Anything else scores 0.
fn lenient_score<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
	D: Deserializer<'de>,
{
	let value = Value::deserialize(deserializer)?;
	let raw = match value {
		Value::Number(n) => n.as_f64(),
		Value::String(s) => s.trim().parse::<f64>().ok(),
		_ => None,
	};
	Ok(raw
		.filter(|v| v.is_finite())
		.map(|v| v.round().clamp(0.0, 100.0) as u8)
		.unwrap_or(0))
}
