// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Scripted collaborators for orchestration tests.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use herald_common_core::{Article, LlmClient, LlmError, LlmRequest, LlmResponse, SearchError};

use crate::compose::NewsSource;
use crate::provider::{Candidate, ProviderKind};

/// An [`LlmClient`] that answers after `delay` with a fixed result.
pub struct FakeLlm {
	reply: Result<String, LlmError>,
	delay: Duration,
	calls: AtomicUsize,
	finished: AtomicBool,
	models: Mutex<Vec<String>>,
}

impl FakeLlm {
	pub fn ok(content: impl Into<String>) -> Arc<Self> {
		Self::build(Ok(content.into()), Duration::ZERO)
	}

	pub fn err(error: LlmError) -> Arc<Self> {
		Self::build(Err(error), Duration::ZERO)
	}

	pub fn delayed(content: impl Into<String>, delay: Duration) -> Arc<Self> {
		Self::build(Ok(content.into()), delay)
	}

	fn build(reply: Result<String, LlmError>, delay: Duration) -> Arc<Self> {
		Arc::new(Self {
			reply,
			delay,
			calls: AtomicUsize::new(0),
			finished: AtomicBool::new(false),
			models: Mutex::new(Vec::new()),
		})
	}

	pub fn calls(&self) -> usize {
		self.calls.load(Ordering::SeqCst)
	}

	/// True once a call ran to completion rather than being dropped.
	pub fn finished(&self) -> bool {
		self.finished.load(Ordering::SeqCst)
	}

	pub fn models(&self) -> Vec<String> {
		self.models.lock().unwrap().clone()
	}
}

#[async_trait]
impl LlmClient for FakeLlm {
	async fn complete(&self, request: LlmRequest) -> Result<LlmResponse, LlmError> {
		self.calls.fetch_add(1, Ordering::SeqCst);
		self.models.lock().unwrap().push(request.model.clone());
		if !self.delay.is_zero() {
			tokio::time::sleep(self.delay).await;
		}
		self.finished.store(true, Ordering::SeqCst);
		self.reply
			.clone()
			.map(|content| LlmResponse::new(request.model, content))
	}
}

pub fn candidate(kind: ProviderKind, model: &str, client: Arc<FakeLlm>) -> Candidate {
	Candidate {
		kind,
		model: model.to_string(),
		client,
	}
}

/// A [`NewsSource`] keyed by query text; unknown queries fail.
pub struct FakeNews {
	pages: Vec<(String, Vec<Article>)>,
	calls: Mutex<Vec<String>>,
}

impl FakeNews {
	pub fn new(pages: Vec<(&str, Vec<Article>)>) -> Arc<Self> {
		Arc::new(Self {
			pages: pages
				.into_iter()
				.map(|(q, articles)| (q.to_string(), articles))
				.collect(),
			calls: Mutex::new(Vec::new()),
		})
	}

	pub fn calls(&self) -> Vec<String> {
		self.calls.lock().unwrap().clone()
	}
}

#[async_trait]
impl NewsSource for FakeNews {
	fn name(&self) -> &'static str {
		"gnews"
	}

	async fn fetch(
		&self,
		query: &str,
		_date_from: Option<&str>,
		_date_to: Option<&str>,
	) -> Result<Vec<Article>, SearchError> {
		self.calls.lock().unwrap().push(query.to_string());
		self.pages
			.iter()
			.find(|(q, _)| q == query)
			.map(|(_, articles)| articles.clone())
			.ok_or_else(|| SearchError::upstream("gnews", format!("no page for {query}")))
	}
}
