// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! A single bounded call to one candidate.

use std::time::Duration;

use herald_common_core::{extract_json, GroundingSource, LlmError, LlmRequest, ParseError};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, instrument};

use crate::provider::{Candidate, ProviderKind};

/// A parsed answer and where it came from.
#[derive(Debug, Clone)]
pub struct Completion<T> {
	pub provider: ProviderKind,
	pub model: String,
	pub value: T,
	pub grounding: Vec<GroundingSource>,
}

/// Why one candidate did not produce a usable answer.
#[derive(Debug, Error)]
pub enum AttemptError {
	#[error(transparent)]
	Llm(#[from] LlmError),

	#[error(transparent)]
	Parse(#[from] ParseError),

	#[error("timed out after {0:?}")]
	Timeout(Duration),
}

impl AttemptError {
	pub fn is_rate_limited(&self) -> bool {
		matches!(self, AttemptError::Llm(e) if e.is_rate_limited())
	}

	pub fn retry_after_secs(&self) -> Option<u64> {
		match self {
			AttemptError::Llm(e) => e.retry_after_secs(),
			_ => None,
		}
	}
}

/// Sends `prompt` to `candidate` and parses the reply into `T`.
#[instrument(skip(candidate, prompt), fields(provider = %candidate.kind, model = %candidate.model))]
pub async fn attempt<T: DeserializeOwned>(
	candidate: &Candidate,
	prompt: &str,
	timeout: Duration,
) -> Result<Completion<T>, AttemptError> {
	let request = LlmRequest::prompt(candidate.model.clone(), prompt);

	let response = tokio::time::timeout(timeout, candidate.client.complete(request))
		.await
		.map_err(|_| AttemptError::Timeout(timeout))??;

	if response.is_empty() {
		return Err(LlmError::InvalidResponse("No content in response".to_string()).into());
	}

	let value = extract_json::<T>(&response.content)?;
	debug!(content_len = response.content.len(), "candidate produced a parseable answer");

	Ok(Completion {
		provider: candidate.kind,
		model: candidate.model.clone(),
		value,
		grounding: response.grounding,
	})
}
