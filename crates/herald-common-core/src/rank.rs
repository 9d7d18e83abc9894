// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Merging, deduplication and relevance ordering of article lists.

use std::collections::HashSet;

use crate::article::Article;

/// Keeps the first article per non-empty URL, preserving input order.
///
/// Articles with an empty URL cannot be identified and are always kept.
pub fn dedupe_by_url(articles: impl IntoIterator<Item = Article>) -> Vec<Article> {
	let mut seen: HashSet<String> = HashSet::new();
	articles
		.into_iter()
		.filter(|article| article.url.is_empty() || seen.insert(article.url.clone()))
		.collect()
}

/// Stable sort, highest relevance first; ties keep their current order.
pub fn sort_by_relevance(articles: &mut [Article]) {
	articles.sort_by(|a, b| b.relevance_score.cmp(&a.relevance_score));
}

/// Concatenates `lists` in order, dedupes by URL, then ranks by relevance.
pub fn merge_and_rank<I>(lists: I) -> Vec<Article>
where
	I: IntoIterator<Item = Vec<Article>>,
{
	let mut merged = dedupe_by_url(lists.into_iter().flatten());
	sort_by_relevance(&mut merged);
	merged
}
