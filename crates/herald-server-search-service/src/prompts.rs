// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Prompt text sent to AI providers.

use chrono::NaiveDate;
use herald_common_core::Article;

/// Articles listed in an enhancement prompt.
pub const ENHANCE_LIMIT: usize = 15;

fn date_context(date_from: Option<&str>, date_to: Option<&str>) -> String {
	match (date_from, date_to) {
		(Some(from), Some(to)) => format!("Focus on news published between {from} and {to}."),
		(Some(from), None) => format!("Focus on news published after {from}."),
		(None, Some(to)) => format!("Focus on news published before {to}."),
		(None, None) => String::new(),
	}
}

/// Research prompt for AI-only search.
pub fn research_prompt(
	query: &str,
	date_from: Option<&str>,
	date_to: Option<&str>,
	deep_research: bool,
	today: NaiveDate,
) -> String {
	let depth = if deep_research {
		"Provide comprehensive coverage with multiple perspectives."
	} else {
		""
	};

	format!(
		r#"You are a news research assistant. Today is {today}.

Search for 20+ news articles about: "{query}"

{context}
{depth}

For EACH article provide:
- title: Realistic headline
- publisher: Real news org (BBC, Reuters, CNN, NYT, AP, Bloomberg, etc.)
- publishedDate: Recent realistic date (e.g., "Jan 28, 2025")
- publishedTime: Time (e.g., "2:30 PM")
- url: Realistic URL for that publisher
- summary: 2-3 sentence summary
- relevanceScore: 60-98

Return ONLY valid JSON:
{{
  "articles": [...],
  "searchSummary": "Overview of coverage"
}}

Provide at least 15-20 articles from diverse sources."#,
		today = today.format("%A, %B %-d, %Y"),
		context = date_context(date_from, date_to),
	)
}

/// Prompt asking for better summaries of the first [`ENHANCE_LIMIT`] articles.
pub fn enhancement_prompt(query: &str, articles: &[Article]) -> String {
	let listing = articles
		.iter()
		.take(ENHANCE_LIMIT)
		.enumerate()
		.map(|(i, a)| format!("{}. \"{}\" - {}", i + 1, a.title, a.publisher))
		.collect::<Vec<_>>()
		.join("\n");

	format!(
		r#"Analyze these news articles about "{query}" and provide enhanced summaries.

Articles:
{listing}

Return JSON array with enhanced 2-3 sentence summaries for each:
{{
  "summaries": ["summary1", "summary2", ...],
  "overallAnalysis": "Brief analysis of the news coverage"
}}"#
	)
}
