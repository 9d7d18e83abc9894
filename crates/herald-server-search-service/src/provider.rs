// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! AI provider registry.

use std::sync::Arc;

use herald_common_config::SecretString;
use herald_common_core::{LlmClient, LlmError};
use herald_server_config::LlmConfig;
use herald_server_llm_gemini::{GeminiClient, GeminiConfig};
use herald_server_llm_openai::{OpenAiClient, OpenAiConfig};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// The AI providers Herald knows how to call.
///
/// Declaration order is priority order: sequential fallback walks providers
/// in this order and races are issued in it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
	Gemini,
	Groq,
	OpenAi,
	Together,
	OpenRouter,
}

impl ProviderKind {
	pub const ALL: [ProviderKind; 5] = [
		ProviderKind::Gemini,
		ProviderKind::Groq,
		ProviderKind::OpenAi,
		ProviderKind::Together,
		ProviderKind::OpenRouter,
	];

	pub fn name(self) -> &'static str {
		match self {
			ProviderKind::Gemini => "gemini",
			ProviderKind::Groq => "groq",
			ProviderKind::OpenAi => "openai",
			ProviderKind::Together => "together",
			ProviderKind::OpenRouter => "openrouter",
		}
	}

	/// Base URL for Gemini, full chat-completions URL for the rest.
	pub fn endpoint(self) -> &'static str {
		match self {
			ProviderKind::Gemini => "https://generativelanguage.googleapis.com/v1beta",
			ProviderKind::Groq => "https://api.groq.com/openai/v1/chat/completions",
			ProviderKind::OpenAi => "https://api.openai.com/v1/chat/completions",
			ProviderKind::Together => "https://api.together.xyz/v1/chat/completions",
			ProviderKind::OpenRouter => "https://openrouter.ai/api/v1/chat/completions",
		}
	}

	/// Candidate models, best first.
	pub fn models(self) -> &'static [&'static str] {
		match self {
			ProviderKind::Gemini => &["gemini-2.0-flash", "gemini-1.5-flash"],
			ProviderKind::Groq => &["llama-3.3-70b-versatile", "mixtral-8x7b-32768"],
			ProviderKind::OpenAi => &["gpt-4o-mini", "gpt-3.5-turbo"],
			ProviderKind::Together => &["meta-llama/Llama-3.3-70B-Instruct-Turbo"],
			ProviderKind::OpenRouter => &[
				"meta-llama/llama-3.3-70b-instruct:free",
				"google/gemini-2.0-flash-exp:free",
			],
		}
	}

	pub fn credential_env(self) -> &'static str {
		match self {
			ProviderKind::Gemini => "GEMINI_API_KEY",
			ProviderKind::Groq => "GROQ_API_KEY",
			ProviderKind::OpenAi => "OPENAI_API_KEY",
			ProviderKind::Together => "TOGETHER_API_KEY",
			ProviderKind::OpenRouter => "OPENROUTER_API_KEY",
		}
	}

	pub fn setup_url(self) -> &'static str {
		match self {
			ProviderKind::Gemini => "https://aistudio.google.com/app/apikey",
			ProviderKind::Groq => "https://console.groq.com/keys",
			ProviderKind::OpenAi => "https://platform.openai.com/api-keys",
			ProviderKind::Together => "https://api.together.xyz/settings/api-keys",
			ProviderKind::OpenRouter => "https://openrouter.ai/keys",
		}
	}

	pub fn api_key(self, config: &LlmConfig) -> Option<&SecretString> {
		match self {
			ProviderKind::Gemini => config.gemini_api_key.as_ref(),
			ProviderKind::Groq => config.groq_api_key.as_ref(),
			ProviderKind::OpenAi => config.openai_api_key.as_ref(),
			ProviderKind::Together => config.together_api_key.as_ref(),
			ProviderKind::OpenRouter => config.openrouter_api_key.as_ref(),
		}
	}

	fn build_client(self, api_key: SecretString, site_url: &str) -> Result<Arc<dyn LlmClient>, LlmError> {
		let default_model = self.models()[0];
		match self {
			ProviderKind::Gemini => {
				let config = GeminiConfig::new(api_key)
					.with_base_url(self.endpoint())
					.with_model(default_model);
				Ok(Arc::new(GeminiClient::new(config)?))
			}
			ProviderKind::OpenRouter => {
				let config = OpenAiConfig::new(api_key)
					.with_endpoint(self.endpoint())
					.with_model(default_model)
					.with_header("HTTP-Referer", site_url);
				Ok(Arc::new(OpenAiClient::new(config)?))
			}
			ProviderKind::Groq | ProviderKind::OpenAi | ProviderKind::Together => {
				let config = OpenAiConfig::new(api_key)
					.with_endpoint(self.endpoint())
					.with_model(default_model);
				Ok(Arc::new(OpenAiClient::new(config)?))
			}
		}
	}
}

impl std::fmt::Display for ProviderKind {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.name())
	}
}

/// One `(provider, model)` pair to try.
#[derive(Clone)]
pub struct Candidate {
	pub kind: ProviderKind,
	pub model: String,
	pub client: Arc<dyn LlmClient>,
}

impl std::fmt::Debug for Candidate {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Candidate")
			.field("kind", &self.kind)
			.field("model", &self.model)
			.finish()
	}
}

/// A configured provider and its client.
#[derive(Clone)]
pub struct RegisteredProvider {
	pub kind: ProviderKind,
	pub client: Arc<dyn LlmClient>,
}

/// The providers with credentials, in priority order.
#[derive(Clone, Default)]
pub struct ProviderRegistry {
	providers: Vec<RegisteredProvider>,
}

impl std::fmt::Debug for ProviderRegistry {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_list()
			.entries(self.providers.iter().map(|p| p.kind))
			.finish()
	}
}

impl ProviderRegistry {
	/// Builds one client for every provider with a credential.
	pub fn from_config(config: &LlmConfig) -> Result<Self, LlmError> {
		let mut providers = Vec::new();
		for kind in crate::prober::available_providers(config) {
			let Some(api_key) = kind.api_key(config) else {
				continue;
			};
			let client = kind.build_client(api_key.clone(), &config.site_url)?;
			debug!(provider = %kind, "registered AI provider");
			providers.push(RegisteredProvider { kind, client });
		}
		info!(
			providers = ?providers.iter().map(|p| p.kind.name()).collect::<Vec<_>>(),
			"AI provider registry ready"
		);
		Ok(Self::new(providers))
	}

	/// Registry over pre-built clients; sorted into priority order.
	pub fn new(mut providers: Vec<RegisteredProvider>) -> Self {
		providers.sort_by_key(|p| p.kind);
		Self { providers }
	}

	pub fn is_empty(&self) -> bool {
		self.providers.is_empty()
	}

	pub fn kinds(&self) -> Vec<ProviderKind> {
		self.providers.iter().map(|p| p.kind).collect()
	}

	/// First model of every provider, for racing.
	pub fn race_entrants(&self) -> Vec<Candidate> {
		self.providers
			.iter()
			.map(|p| Candidate {
				kind: p.kind,
				model: p.kind.models()[0].to_string(),
				client: p.client.clone(),
			})
			.collect()
	}

	/// Every model of every provider, in priority order, for sequential fallback.
	pub fn sequential_candidates(&self) -> Vec<Candidate> {
		self.providers
			.iter()
			.flat_map(|p| {
				p.kind.models().iter().map(move |model| Candidate {
					kind: p.kind,
					model: model.to_string(),
					client: p.client.clone(),
				})
			})
			.collect()
	}
}
