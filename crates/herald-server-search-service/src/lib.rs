// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Search orchestration for Herald.
//!
//! Combines a direct news API with a set of AI providers:
//!
//! - [`provider`]: the closed set of AI providers and the configured registry
//! - [`prober`]: which credentials are present
//! - [`fallback`]: try candidates one after another
//! - [`race`]: try providers concurrently, first parseable answer wins
//! - [`compose`]: fan a query out into variants against the news API
//! - [`enhance`]: AI summaries for news results
//! - [`service`]: the end-to-end pipeline

pub mod attempt;
pub mod compose;
pub mod enhance;
pub mod fallback;
pub mod prober;
pub mod prompts;
pub mod provider;
pub mod race;
pub mod service;

#[cfg(test)]
mod testing;

pub use attempt::{AttemptError, Completion};
pub use compose::NewsSource;
pub use fallback::SequentialOptions;
pub use provider::{Candidate, ProviderKind, ProviderRegistry, RegisteredProvider};
pub use service::{ProviderStatus, SearchService};
