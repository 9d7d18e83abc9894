// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Multi-query composition against a direct news API.

use std::time::Duration;

use async_trait::async_trait;
use futures::future::join_all;
use herald_common_core::{dedupe_by_url, Article, SearchError, SearchRequest};
use herald_server_search_gnews::{GnewsClient, GnewsError, GnewsRequest, MAX_PER_REQUEST};
use tracing::{debug, info, instrument, warn};

/// Gap between consecutive variant requests.
pub const VARIANT_STAGGER: Duration = Duration::from_millis(100);

/// A search API that returns real, linkable articles.
#[async_trait]
pub trait NewsSource: Send + Sync {
	fn name(&self) -> &'static str;

	async fn fetch(
		&self,
		query: &str,
		date_from: Option<&str>,
		date_to: Option<&str>,
	) -> Result<Vec<Article>, SearchError>;
}

#[async_trait]
impl NewsSource for GnewsClient {
	fn name(&self) -> &'static str {
		"gnews"
	}

	async fn fetch(
		&self,
		query: &str,
		date_from: Option<&str>,
		date_to: Option<&str>,
	) -> Result<Vec<Article>, SearchError> {
		let request = GnewsRequest::new(query)
			.with_max(MAX_PER_REQUEST)
			.with_date_range(date_from, date_to);
		self.search(&request)
			.await
			.map(|response| response.articles)
			.map_err(gnews_error)
	}
}

fn gnews_error(error: GnewsError) -> SearchError {
	if error.is_rate_limited() {
		SearchError::RateLimited {
			provider: "gnews".to_string(),
			retry_after_secs: None,
		}
	} else {
		SearchError::upstream("gnews", error.to_string())
	}
}

/// `[q, "q latest", "q news", "q update"]`, three of them unless deep research
/// asks for all four.
pub fn query_variants(query: &str, deep_research: bool) -> Vec<String> {
	let all = [
		query.to_string(),
		format!("{query} latest"),
		format!("{query} news"),
		format!("{query} update"),
	];
	let count = if deep_research { 4 } else { 3 };
	all.into_iter().take(count).collect()
}

/// Runs every query variant concurrently, staggered by [`VARIANT_STAGGER`],
/// and merges the results by URL in issuance order.
///
/// Individual variant failures are logged and contribute nothing. If every
/// variant fails, the last error is returned.
#[instrument(skip_all, fields(source = source.name(), deep_research = request.deep_research))]
pub async fn compose(
	source: &dyn NewsSource,
	query: &str,
	request: &SearchRequest,
	variant_timeout: Duration,
) -> Result<Vec<Article>, SearchError> {
	let variants = query_variants(query, request.deep_research);
	let date_from = request.date_from();
	let date_to = request.date_to();

	let calls = variants.iter().enumerate().map(|(index, variant)| async move {
		if index > 0 {
			tokio::time::sleep(VARIANT_STAGGER * index as u32).await;
		}
		let result = tokio::time::timeout(variant_timeout, source.fetch(variant, date_from, date_to))
			.await
			.unwrap_or_else(|_| {
				Err(SearchError::upstream(
					source.name(),
					format!("timed out after {variant_timeout:?}"),
				))
			});
		(variant, result)
	});

	let mut pages = Vec::with_capacity(variants.len());
	let mut last_error = None;
	for (variant, result) in join_all(calls).await {
		match result {
			Ok(articles) => {
				debug!(variant = %variant, count = articles.len(), "variant succeeded");
				pages.push(articles);
			}
			Err(e) => {
				warn!(variant = %variant, error = %e, "variant failed");
				last_error = Some(e);
			}
		}
	}

	if pages.is_empty() {
		return Err(last_error.unwrap_or_else(|| SearchError::upstream(source.name(), "no query variants")));
	}

	let mut articles = dedupe_by_url(pages.into_iter().flatten());
	articles.truncate(request.target_results());

	info!(count = articles.len(), "composed news results");
	Ok(articles)
}
