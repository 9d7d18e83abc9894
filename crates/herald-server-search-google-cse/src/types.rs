// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Types for Google Custom Search Engine API.

use std::collections::HashMap;

use chrono::NaiveDate;
use herald_common_core::Article;
use serde::Deserialize;
use serde_json::Value;

/// CSE returns at most this many items per request.
pub const MAX_PER_REQUEST: u32 = 10;

/// Stand-ins for an open side of a date restriction.
const OPEN_LOWER: &str = "19700101";
const OPEN_UPPER: &str = "99991231";

/// Request parameters for a CSE search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CseRequest {
	pub query: String,
	pub num: u32,
	/// One-based index of the first result.
	pub start: u32,
	pub date_from: Option<NaiveDate>,
	pub date_to: Option<NaiveDate>,
}

impl CseRequest {
	/// Creates a new CSE request with the given query and result count.
	/// The `num` parameter is clamped to the valid range of 1-10.
	pub fn new(query: impl Into<String>, num: u32) -> Self {
		Self {
			query: query.into(),
			num: num.clamp(1, MAX_PER_REQUEST),
			start: 1,
			date_from: None,
			date_to: None,
		}
	}

	pub fn with_start(mut self, start: u32) -> Self {
		self.start = start.max(1);
		self
	}

	pub fn with_date_range(mut self, from: Option<NaiveDate>, to: Option<NaiveDate>) -> Self {
		self.date_from = from;
		self.date_to = to;
		self
	}

	/// The `sort` parameter restricting results to the date window, e.g.
	/// `date:r:20250101:20250131`.
	pub fn sort_restriction(&self) -> Option<String> {
		if self.date_from.is_none() && self.date_to.is_none() {
			return None;
		}
		let lower = self
			.date_from
			.map(|d| d.format("%Y%m%d").to_string())
			.unwrap_or_else(|| OPEN_LOWER.to_string());
		let upper = self
			.date_to
			.map(|d| d.format("%Y%m%d").to_string())
			.unwrap_or_else(|| OPEN_UPPER.to_string());
		Some(format!("date:r:{lower}:{upper}"))
	}

	/// Zero-based absolute position of the first item in this page.
	pub fn offset(&self) -> usize {
		self.start.saturating_sub(1) as usize
	}
}

/// Normalized response from a CSE search.
#[derive(Debug, Clone)]
pub struct CseResponse {
	pub query: String,
	pub articles: Vec<Article>,
	pub total_results: u64,
	pub search_time: f64,
	/// `start` for the following page, if Google reports one.
	pub next_start: Option<u32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GoogleCseResponse {
	#[serde(default)]
	pub items: Option<Vec<GoogleCseItem>>,
	#[serde(default)]
	pub error: Option<GoogleCseError>,
	#[serde(default)]
	pub search_information: Option<GoogleSearchInformation>,
	#[serde(default)]
	pub queries: Option<GoogleQueries>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GoogleSearchInformation {
	/// Google sends this as a string.
	#[serde(default)]
	pub total_results: Option<String>,
	#[serde(default)]
	pub search_time: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GoogleQueries {
	#[serde(default)]
	pub next_page: Option<Vec<GooglePageRef>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GooglePageRef {
	#[serde(default)]
	pub start_index: Option<u32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoogleCseItem {
	#[serde(default)]
	pub title: String,
	#[serde(default)]
	pub link: String,
	#[serde(default)]
	pub snippet: Option<String>,
	#[serde(default)]
	pub display_link: Option<String>,
	#[serde(default)]
	pub pagemap: Option<PageMap>,
}

/// Structured data Google extracted from the page.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageMap {
	#[serde(default)]
	pub organization: Vec<PageMapOrganization>,
	#[serde(default)]
	pub metatags: Vec<HashMap<String, Value>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageMapOrganization {
	#[serde(default)]
	pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GoogleCseError {
	pub code: u16,
	#[serde(default)]
	pub message: String,
}
