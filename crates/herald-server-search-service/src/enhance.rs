// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! AI enhancement of news results: better summaries and an overall analysis.

use std::time::Duration;

use herald_common_core::Article;
use serde::Deserialize;
use serde_json::Value;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::prompts::{enhancement_prompt, ENHANCE_LIMIT};
use crate::provider::Candidate;
use crate::race::race;

/// Expected reply. Entries of `summaries` that are not non-empty strings are
/// ignored.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnhancementReply {
	#[serde(default)]
	pub summaries: Vec<Value>,
	#[serde(default)]
	pub overall_analysis: Option<String>,
}

/// Replaces summaries by index; returns how many were replaced.
pub fn apply_enhancement(articles: &mut [Article], reply: &EnhancementReply) -> usize {
	let mut replaced = 0;
	for (article, summary) in articles
		.iter_mut()
		.take(ENHANCE_LIMIT)
		.zip(reply.summaries.iter())
	{
		if let Some(text) = summary.as_str().map(str::trim).filter(|s| !s.is_empty()) {
			article.summary = text.to_string();
			replaced += 1;
		}
	}
	replaced
}

pub fn default_summary(count: usize, query: &str) -> String {
	format!("Found {count} articles about \"{query}\"")
}

/// Races `entrants` for enhanced summaries and applies them in place.
///
/// Returns the search summary: the model's analysis when one came back,
/// otherwise the plain count. Failures leave the articles untouched.
pub async fn enhance(
	entrants: &[Candidate],
	articles: &mut [Article],
	query: &str,
	timeout: Duration,
	cancel: &CancellationToken,
) -> String {
	if articles.is_empty() || entrants.is_empty() {
		return default_summary(articles.len(), query);
	}

	let prompt = enhancement_prompt(query, articles);
	match race::<EnhancementReply>(entrants, &prompt, timeout, cancel).await {
		Some(completion) => {
			let replaced = apply_enhancement(articles, &completion.value);
			info!(
				provider = %completion.provider,
				replaced,
				"enhanced article summaries"
			);
			completion
				.value
				.overall_analysis
				.filter(|a| !a.trim().is_empty())
				.unwrap_or_else(|| default_summary(articles.len(), query))
		}
		None => {
			debug!("AI enhancement failed, using original summaries");
			default_summary(articles.len(), query)
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::provider::ProviderKind;
	use crate::testing::{candidate, FakeLlm};
	use herald_common_core::LlmError;
	use serde_json::json;

	fn articles(n: usize) -> Vec<Article> {
		(0..n)
			.map(|i| Article::new(format!("T{i}"), format!("https://x/{i}")).with_summary("original"))
			.collect()
	}

	#[test]
	fn apply_skips_blank_and_non_string_entries() {
		let mut list = articles(4);
		let reply = EnhancementReply {
			summaries: vec![json!("new 0"), json!(""), json!(null), json!("new 3")],
			overall_analysis: None,
		};
		assert_eq!(apply_enhancement(&mut list, &reply), 2);
		assert_eq!(list[0].summary, "new 0");
		assert_eq!(list[1].summary, "original");
		assert_eq!(list[2].summary, "original");
		assert_eq!(list[3].summary, "new 3");
	}

	#[test]
	fn apply_never_touches_articles_past_the_limit() {
		let mut list = articles(20);
		let reply = EnhancementReply {
			summaries: (0..20).map(|i| json!(format!("s{i}"))).collect(),
			overall_analysis: None,
		};
		assert_eq!(apply_enhancement(&mut list, &reply), 15);
		assert_eq!(list[15].summary, "original");
	}

	#[tokio::test]
	async fn enhancement_uses_analysis() {
		let llm = FakeLlm::ok(r#"{"summaries": ["better"], "overallAnalysis": "Broad coverage."}"#);
		let entrants = vec![candidate(ProviderKind::Groq, "m", llm)];
		let mut list = articles(2);

		let summary = enhance(&entrants, &mut list, "ai", Duration::from_secs(1), &CancellationToken::new()).await;
		assert_eq!(summary, "Broad coverage.");
		assert_eq!(list[0].summary, "better");
		assert_eq!(list[1].summary, "original");
	}

	#[tokio::test]
	async fn failed_enhancement_keeps_originals() {
		let entrants = vec![candidate(
			ProviderKind::Groq,
			"m",
			FakeLlm::err(LlmError::Api("down".into())),
		)];
		let mut list = articles(3);

		let summary = enhance(&entrants, &mut list, "ai", Duration::from_secs(1), &CancellationToken::new()).await;
		assert_eq!(summary, "Found 3 articles about \"ai\"");
		assert!(list.iter().all(|a| a.summary == "original"));
	}
}
