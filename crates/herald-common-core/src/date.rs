// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Best-effort date parsing and the inclusive date-range filter.
//!
//! Providers report publication dates in whatever shape they like, so the
//! filter fails open: an article whose date is missing or unparseable is
//! kept.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use crate::article::Article;

const DATE_FORMATS: &[&str] = &[
	"%Y-%m-%d",
	"%b %d, %Y",
	"%B %d, %Y",
	"%d %b %Y",
	"%d %B %Y",
	"%m/%d/%Y",
];

const DATETIME_FORMATS: &[&str] = &[
	"%Y-%m-%dT%H:%M:%S",
	"%Y-%m-%dT%H:%M:%S%.f",
	"%Y-%m-%d %H:%M:%S",
];

/// Parses a calendar date from any of the supported display or wire formats.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
	let raw = raw.trim();
	if raw.is_empty() {
		return None;
	}

	if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
		return Some(dt.date_naive());
	}
	if let Ok(dt) = DateTime::parse_from_rfc2822(raw) {
		return Some(dt.date_naive());
	}
	for format in DATETIME_FORMATS {
		if let Ok(dt) = NaiveDateTime::parse_from_str(raw, format) {
			return Some(dt.date());
		}
	}
	for format in DATE_FORMATS {
		if let Ok(date) = NaiveDate::parse_from_str(raw, format) {
			return Some(date);
		}
	}
	None
}

/// Formats a publication timestamp as `("Jan 10, 2025", "02:30 PM")`.
pub fn display_date_time(at: DateTime<Utc>) -> (String, String) {
	(
		at.format("%b %-d, %Y").to_string(),
		at.format("%I:%M %p").to_string(),
	)
}

/// Formats a calendar date the way articles display it.
pub fn display_date(date: NaiveDate) -> String {
	date.format("%b %-d, %Y").to_string()
}

/// Inclusive calendar-date bounds. Either side may be open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRange {
	pub from: Option<NaiveDate>,
	pub to: Option<NaiveDate>,
}

impl DateRange {
	/// Builds a range from raw request strings; bounds that do not parse are ignored.
	pub fn from_bounds(from: Option<&str>, to: Option<&str>) -> Self {
		let range = Self {
			from: from.and_then(parse_date),
			to: to.and_then(parse_date),
		};
		if (from.is_some() && range.from.is_none()) || (to.is_some() && range.to.is_none()) {
			tracing::debug!(?from, ?to, "ignoring unparseable date bound");
		}
		range
	}

	pub fn is_unbounded(&self) -> bool {
		self.from.is_none() && self.to.is_none()
	}

	pub fn contains(&self, date: NaiveDate) -> bool {
		self.from.map_or(true, |from| date >= from) && self.to.map_or(true, |to| date <= to)
	}

	/// Keep decision for one article: unknown dates pass.
	pub fn admits(&self, article: &Article) -> bool {
		match article.published_date.as_deref().and_then(parse_date) {
			Some(date) => self.contains(date),
			None => true,
		}
	}
}

/// Drops articles whose parseable date falls outside the inclusive range.
pub fn filter_by_date(articles: Vec<Article>, from: Option<&str>, to: Option<&str>) -> Vec<Article> {
	let range = DateRange::from_bounds(from, to);
	if range.is_unbounded() {
		return articles;
	}
	let before = articles.len();
	let kept: Vec<Article> = articles.into_iter().filter(|a| range.admits(a)).collect();
	tracing::debug!(before, after = kept.len(), "applied date filter");
	kept
}

#[cfg(test)]
mod tests {
	use super::*;
	use chrono::TimeZone;
	use proptest::prelude::*;

	fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
		NaiveDate::from_ymd_opt(y, m, d).unwrap()
	}

	mod parsing {
		use super::*;

		#[test]
		fn accepts_supported_formats() {
			let expected = ymd(2025, 1, 10);
			for raw in [
				"2025-01-10",
				"2025-01-10T08:30:00Z",
				"2025-01-10T08:30:00+02:00",
				"2025-01-10T08:30:00",
				"Fri, 10 Jan 2025 08:30:00 +0000",
				"Jan 10, 2025",
				"January 10, 2025",
				"10 Jan 2025",
				"01/10/2025",
			] {
				assert_eq!(parse_date(raw), Some(expected), "format: {raw}");
			}
		}

		#[test]
		fn single_digit_day() {
			assert_eq!(parse_date("Jan 5, 2025"), Some(ymd(2025, 1, 5)));
		}

		#[test]
		fn rejects_garbage() {
			assert_eq!(parse_date(""), None);
			assert_eq!(parse_date("yesterday"), None);
			assert_eq!(parse_date("2025-13-45"), None);
		}

		#[test]
		fn display_formats() {
			let at = Utc.with_ymd_and_hms(2025, 1, 5, 14, 30, 0).unwrap();
			let (date, time) = display_date_time(at);
			assert_eq!(date, "Jan 5, 2025");
			assert_eq!(time, "02:30 PM");
			assert_eq!(parse_date(&date), Some(ymd(2025, 1, 5)));
		}
	}

	mod filtering {
		use super::*;

		fn dated(url: &str, date: &str) -> Article {
			Article::new(url, url).with_published_date(date)
		}

		#[test]
		fn keeps_only_articles_inside_the_range() {
			let articles = vec![
				dated("https://a.example/december", "2024-12-15"),
				dated("https://a.example/january", "2025-01-10"),
			];
			let kept = filter_by_date(articles, Some("2025-01-01"), Some("2025-01-31"));
			assert_eq!(kept.len(), 1);
			assert_eq!(kept[0].url, "https://a.example/january");
		}

		#[test]
		fn bounds_are_inclusive() {
			let articles = vec![
				dated("https://a.example/1", "Jan 1, 2025"),
				dated("https://a.example/2", "Jan 31, 2025"),
			];
			let kept = filter_by_date(articles, Some("2025-01-01"), Some("2025-01-31"));
			assert_eq!(kept.len(), 2);
		}

		#[test]
		fn unknown_dates_fail_open() {
			let articles = vec![
				Article::new("no date", "https://a.example/none"),
				dated("https://a.example/garbage", "last Tuesday"),
			];
			let kept = filter_by_date(articles, Some("2025-01-01"), Some("2025-01-31"));
			assert_eq!(kept.len(), 2);
		}

		#[test]
		fn unparseable_bounds_are_ignored() {
			let articles = vec![dated("https://a.example/old", "2020-01-01")];
			let kept = filter_by_date(articles, Some("not a date"), None);
			assert_eq!(kept.len(), 1);
		}

		#[test]
		fn single_sided_bounds() {
			let articles = vec![
				dated("https://a.example/old", "2024-06-01"),
				dated("https://a.example/new", "2025-06-01"),
			];
			let after = filter_by_date(articles.clone(), Some("2025-01-01"), None);
			assert_eq!(after.len(), 1);
			assert_eq!(after[0].url, "https://a.example/new");

			let before = filter_by_date(articles, None, Some("2025-01-01"));
			assert_eq!(before.len(), 1);
			assert_eq!(before[0].url, "https://a.example/old");
		}

		proptest! {
			/// Every survivor is undated or inside the range.
			#[test]
			fn survivors_respect_the_range(
				offsets in proptest::collection::vec(0i64..400, 0..30),
				from_offset in 0i64..200,
				span in 0i64..200,
			) {
				let base = ymd(2024, 6, 1);
				let from = base + chrono::Duration::days(from_offset);
				let to = from + chrono::Duration::days(span);
				let articles: Vec<Article> = offsets
					.iter()
					.enumerate()
					.map(|(i, off)| {
						let date = base + chrono::Duration::days(*off);
						dated(&format!("https://a.example/{i}"), &display_date(date))
					})
					.collect();

				let kept = filter_by_date(
					articles,
					Some(&from.to_string()),
					Some(&to.to_string()),
				);
				for article in kept {
					let date = parse_date(article.published_date.as_deref().unwrap()).unwrap();
					prop_assert!(date >= from && date <= to);
				}
			}
		}
	}
}
