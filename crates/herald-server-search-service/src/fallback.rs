// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Sequential fallback across candidates.

use std::time::Duration;

use herald_common_core::SearchError;
use serde::de::DeserializeOwned;
use tracing::{info, instrument, warn};

use crate::attempt::{attempt, Completion};
use crate::provider::Candidate;

#[derive(Debug, Clone, Copy)]
pub struct SequentialOptions {
	/// Bound on each individual attempt.
	pub attempt_timeout: Duration,
	/// Pause between a failed attempt and the next one.
	pub delay: Duration,
}

impl Default for SequentialOptions {
	fn default() -> Self {
		Self {
			attempt_timeout: Duration::from_secs(30),
			delay: Duration::ZERO,
		}
	}
}

/// Tries `candidates` strictly in order and returns the first parseable answer.
///
/// Every failure (error status, empty content, timeout, unparseable JSON)
/// moves on to the next candidate. When all fail the result is
/// [`SearchError::RateLimited`] if any attempt was rate limited, otherwise
/// [`SearchError::AllProvidersFailed`].
#[instrument(skip_all, fields(candidates = candidates.len()))]
pub async fn sequential<T: DeserializeOwned>(
	candidates: &[Candidate],
	prompt: &str,
	options: SequentialOptions,
) -> Result<Completion<T>, SearchError> {
	let mut rate_limited: Option<(String, Option<u64>)> = None;

	for (index, candidate) in candidates.iter().enumerate() {
		if index > 0 && !options.delay.is_zero() {
			tokio::time::sleep(options.delay).await;
		}

		match attempt::<T>(candidate, prompt, options.attempt_timeout).await {
			Ok(completion) => {
				info!(
					provider = %candidate.kind,
					model = %candidate.model,
					attempt = index + 1,
					"sequential fallback succeeded"
				);
				return Ok(completion);
			}
			Err(e) => {
				warn!(
					provider = %candidate.kind,
					model = %candidate.model,
					error = %e,
					"candidate failed, trying next"
				);
				if e.is_rate_limited() && rate_limited.is_none() {
					rate_limited = Some((candidate.kind.name().to_string(), e.retry_after_secs()));
				}
			}
		}
	}

	match rate_limited {
		Some((provider, retry_after_secs)) => Err(SearchError::RateLimited {
			provider,
			retry_after_secs,
		}),
		None => Err(SearchError::AllProvidersFailed {
			attempts: candidates.len(),
		}),
	}
}
