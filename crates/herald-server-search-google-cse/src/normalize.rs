// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Turns Google CSE items into articles.
//!
//! Web results carry no first-class publisher or date, so both are recovered
//! from the page's structured data and, failing that, from the snippet.

use std::sync::LazyLock;

use chrono::DateTime;
use herald_common_core::{display_date, parse_date, Article, ArticleSource, UNKNOWN_PUBLISHER};
use regex::Regex;
use url::Url;

use crate::types::GoogleCseItem;

/// Metatag keys that carry a publication date, in preference order.
const DATE_METATAGS: &[&str] = &[
	"article:published_time",
	"og:article:published_time",
	"datepublished",
	"pubdate",
	"publishdate",
	"date",
	"dc.date",
];

static SNIPPET_DATE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(
		r"\b(?:Jan|Feb|Mar|Apr|May|Jun|Jul|Aug|Sep|Oct|Nov|Dec)[a-z]*\.? \d{1,2}, \d{4}\b|\b\d{4}-\d{2}-\d{2}\b",
	)
	.unwrap()
});

/// Normalizes one CSE item found at zero-based absolute `position`.
pub fn normalize_item(item: GoogleCseItem, position: usize) -> Article {
	let publisher = publisher_of(&item);
	let (published_date, published_time) = published_of(&item);

	Article {
		title: item.title,
		publisher,
		published_date,
		published_time,
		url: item.link,
		summary: item.snippet.unwrap_or_default(),
		image: None,
		relevance_score: Article::position_score(position),
		source: Some(ArticleSource::Web),
	}
}

/// `organization[0].name`, then `og:site_name`, then the display host.
fn publisher_of(item: &GoogleCseItem) -> String {
	let pagemap = item.pagemap.as_ref();

	let organization = pagemap
		.and_then(|p| p.organization.first())
		.and_then(|o| o.name.as_deref())
		.map(str::trim)
		.filter(|n| !n.is_empty());
	if let Some(name) = organization {
		return name.to_string();
	}

	let site_name = pagemap
		.and_then(|p| p.metatags.first())
		.and_then(|tags| metatag(tags, "og:site_name"))
		.filter(|n| !n.is_empty());
	if let Some(name) = site_name {
		return name;
	}

	item.display_link
		.as_deref()
		.and_then(clean_host)
		.or_else(|| clean_host(&item.link))
		.unwrap_or_else(|| UNKNOWN_PUBLISHER.to_string())
}

/// Host of `link` (a bare host or full URL) without a leading `www.`.
fn clean_host(link: &str) -> Option<String> {
	let link = link.trim();
	if link.is_empty() {
		return None;
	}
	let parsed = if link.contains("://") {
		Url::parse(link)
	} else {
		Url::parse(&format!("https://{link}"))
	}
	.ok()?;
	let host = parsed.host_str()?;
	Some(host.strip_prefix("www.").unwrap_or(host).to_string())
}

fn metatag(tags: &std::collections::HashMap<String, serde_json::Value>, key: &str) -> Option<String> {
	tags.iter()
		.find(|(k, _)| k.eq_ignore_ascii_case(key))
		.and_then(|(_, v)| v.as_str())
		.map(|v| v.trim().to_string())
}

fn published_of(item: &GoogleCseItem) -> (Option<String>, Option<String>) {
	let tagged = item
		.pagemap
		.as_ref()
		.and_then(|p| p.metatags.first())
		.and_then(|tags| DATE_METATAGS.iter().find_map(|key| metatag(tags, key)))
		.filter(|raw| !raw.is_empty());

	if let Some(raw) = tagged {
		if let Some(date) = parse_date(&raw) {
			let time = DateTime::parse_from_rfc3339(&raw)
				.ok()
				.map(|dt| dt.format("%I:%M %p").to_string());
			return (Some(display_date(date)), time);
		}
	}

	let from_snippet = item
		.snippet
		.as_deref()
		.and_then(|s| SNIPPET_DATE_REGEX.find(s))
		.and_then(|m| parse_date(&snippet_date_text(m.as_str())))
		.map(display_date);
	(from_snippet, None)
}

/// `Sept. 5, 2025` becomes `Sep 5, 2025`, which chrono's `%b` understands.
fn snippet_date_text(raw: &str) -> String {
	raw.replace('.', "").replace("Sept ", "Sep ")
}
