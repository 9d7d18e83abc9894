// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Concurrent race across providers.

use std::time::Duration;

use futures::stream::{FuturesUnordered, StreamExt};
use serde::de::DeserializeOwned;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

use crate::attempt::{attempt, AttemptError, Completion};
use crate::provider::Candidate;

/// Issues one call per entrant and returns the first answer that parses.
///
/// The winner cancels a child of `parent` shared by every entrant, and the
/// remaining in-flight calls are dropped. Cancelling `parent` aborts the
/// whole race. Returns `None` when no entrant succeeds.
#[instrument(skip_all, fields(entrants = entrants.len(), timeout_ms = timeout.as_millis() as u64))]
pub async fn race<T: DeserializeOwned>(
	entrants: &[Candidate],
	prompt: &str,
	timeout: Duration,
	parent: &CancellationToken,
) -> Option<Completion<T>> {
	if entrants.is_empty() {
		return None;
	}

	let token = parent.child_token();
	let mut pending: FuturesUnordered<_> = entrants
		.iter()
		.map(|entrant| {
			let token = token.clone();
			async move {
				let result = tokio::select! {
					biased;
					_ = token.cancelled() => Err(None),
					result = attempt::<T>(entrant, prompt, timeout) => result.map_err(Some),
				};
				(entrant, result)
			}
		})
		.collect();

	while let Some((entrant, result)) = pending.next().await {
		match result {
			Ok(completion) => {
				token.cancel();
				info!(
					provider = %entrant.kind,
					model = %entrant.model,
					"race won"
				);
				return Some(completion);
			}
			Err(Some(e)) => log_loss(entrant, &e),
			Err(None) => debug!(provider = %entrant.kind, "race entrant cancelled"),
		}
	}

	warn!("no provider succeeded");
	None
}

fn log_loss(entrant: &Candidate, error: &AttemptError) {
	warn!(
		provider = %entrant.kind,
		model = %entrant.model,
		error = %error,
		"race entrant failed"
	);
}
