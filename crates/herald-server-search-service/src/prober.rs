// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Credential probing.
//!
//! Works only on the configuration resolved at start-up; nothing here reads
//! the environment or touches the network.

use std::collections::BTreeMap;

use herald_common_core::SearchError;
use herald_server_config::LlmConfig;

use crate::provider::ProviderKind;

pub const NOTHING_CONFIGURED: &str = "No API keys configured";

/// Providers whose credential is present, in priority order.
pub fn available_providers(config: &LlmConfig) -> Vec<ProviderKind> {
	ProviderKind::ALL
		.into_iter()
		.filter(|kind| kind.api_key(config).is_some())
		.collect()
}

/// Where to obtain each credential that unlocks a free tier.
pub fn setup_guidance() -> BTreeMap<String, String> {
	BTreeMap::from([
		(
			"gnews".to_string(),
			"Get free key (100 req/day) at https://gnews.io".to_string(),
		),
		(
			ProviderKind::Groq.name().to_string(),
			format!("Get free key at {}", ProviderKind::Groq.setup_url()),
		),
		(
			ProviderKind::OpenRouter.name().to_string(),
			format!("Free models at {}", ProviderKind::OpenRouter.setup_url()),
		),
		(
			ProviderKind::Gemini.name().to_string(),
			format!("Get free key at {}", ProviderKind::Gemini.setup_url()),
		),
	])
}

/// Fails with setup guidance when neither a news key nor any AI provider is
/// available.
pub fn ensure_configured(providers: &[ProviderKind], news_configured: bool) -> Result<(), SearchError> {
	if providers.is_empty() && !news_configured {
		return Err(SearchError::Configuration {
			message: NOTHING_CONFIGURED.to_string(),
			setup: setup_guidance(),
		});
	}
	Ok(())
}
