// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration sources: built-in defaults, TOML files and environment variables.

use std::path::PathBuf;

use herald_common_config::{load_secret_env, SecretString};
use tracing::{debug, trace};

use crate::error::ConfigError;
use crate::layer::ServerConfigLayer;
use crate::sections::{
	GnewsConfigLayer, GoogleCseConfigLayer, HttpConfigLayer, LlmConfigLayer, LoggingConfigLayer,
	OrchestrationConfigLayer, SearchConfigLayer, SearchStrategy,
};

/// Default location of the server configuration file.
pub const SYSTEM_CONFIG_PATH: &str = "/etc/herald/server.toml";

/// Source precedence levels (higher = overrides lower).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
	Defaults = 10,
	ConfigFile = 20,
	Environment = 50,
}

/// Trait for configuration sources.
pub trait ConfigSource: Send + Sync {
	fn name(&self) -> &'static str;
	fn precedence(&self) -> Precedence;
	fn load(&self) -> Result<ServerConfigLayer, ConfigError>;
}

/// Built-in defaults source. Defaults live in each section's `finalize`,
/// so this contributes an empty layer.
pub struct DefaultsSource;

impl ConfigSource for DefaultsSource {
	fn name(&self) -> &'static str {
		"defaults"
	}

	fn precedence(&self) -> Precedence {
		Precedence::Defaults
	}

	fn load(&self) -> Result<ServerConfigLayer, ConfigError> {
		debug!("loading defaults");
		Ok(ServerConfigLayer::default())
	}
}

/// TOML file configuration source. A missing file is not an error.
pub struct TomlSource {
	path: PathBuf,
}

impl TomlSource {
	pub fn new(path: impl Into<PathBuf>) -> Self {
		Self { path: path.into() }
	}

	pub fn system() -> Self {
		Self::new(SYSTEM_CONFIG_PATH)
	}
}

impl ConfigSource for TomlSource {
	fn name(&self) -> &'static str {
		"toml-config"
	}

	fn precedence(&self) -> Precedence {
		Precedence::ConfigFile
	}

	fn load(&self) -> Result<ServerConfigLayer, ConfigError> {
		if !self.path.exists() {
			debug!(path = %self.path.display(), "config file not found, skipping");
			return Ok(ServerConfigLayer::default());
		}

		debug!(path = %self.path.display(), "loading config file");
		let content = std::fs::read_to_string(&self.path).map_err(|e| ConfigError::FileRead {
			path: self.path.clone(),
			source: e,
		})?;

		let layer: ServerConfigLayer =
			toml::from_str(&content).map_err(|e| ConfigError::TomlParse {
				path: self.path.clone(),
				source: e,
			})?;

		trace!("parsed config layer from TOML");
		Ok(layer)
	}
}

/// Environment variable source.
///
/// Server settings use `HERALD_SERVER_*` / `HERALD_*`; provider credentials
/// keep the names their vendors document (`GNEWS_API_KEY`, `GROQ_API_KEY`, ...)
/// and accept the `*_FILE` indirection.
pub struct EnvSource;

impl ConfigSource for EnvSource {
	fn name(&self) -> &'static str {
		"environment"
	}

	fn precedence(&self) -> Precedence {
		Precedence::Environment
	}

	fn load(&self) -> Result<ServerConfigLayer, ConfigError> {
		debug!("loading environment variables");
		Ok(ServerConfigLayer {
			http: Some(load_http_from_env()?),
			logging: Some(load_logging_from_env()),
			search: Some(load_search_from_env()?),
			llm: Some(load_llm_from_env()?),
			orchestration: Some(load_orchestration_from_env()?),
		})
	}
}

fn env_var(name: &str) -> Option<String> {
	std::env::var(name).ok().filter(|s| !s.is_empty())
}

fn parse_env<T: std::str::FromStr>(name: &str, kind: &str) -> Result<Option<T>, ConfigError> {
	match env_var(name) {
		Some(v) => v
			.trim()
			.parse()
			.map(Some)
			.map_err(|_| ConfigError::InvalidValue {
				key: name.to_string(),
				message: format!("invalid {kind} value '{v}'"),
			}),
		None => Ok(None),
	}
}

fn secret(name: &str) -> Result<Option<SecretString>, ConfigError> {
	load_secret_env(name).map_err(|e| ConfigError::Secret(e.to_string()))
}

fn load_http_from_env() -> Result<HttpConfigLayer, ConfigError> {
	Ok(HttpConfigLayer {
		host: env_var("HERALD_SERVER_HOST"),
		port: parse_env("HERALD_SERVER_PORT", "u16")?,
	})
}

fn load_logging_from_env() -> LoggingConfigLayer {
	LoggingConfigLayer {
		level: env_var("HERALD_SERVER_LOG_LEVEL"),
	}
}

fn load_search_from_env() -> Result<SearchConfigLayer, ConfigError> {
	let gnews = secret("GNEWS_API_KEY")?.map(|api_key| GnewsConfigLayer {
		api_key: Some(api_key),
	});

	let google_cse = if env_var("GOOGLE_API_KEY").is_some()
		|| env_var("GOOGLE_API_KEY_FILE").is_some()
		|| env_var("GOOGLE_CSE_ID").is_some()
	{
		Some(GoogleCseConfigLayer {
			api_key: secret("GOOGLE_API_KEY")?,
			search_engine_id: env_var("GOOGLE_CSE_ID"),
		})
	} else {
		None
	};

	Ok(SearchConfigLayer { gnews, google_cse })
}

fn load_llm_from_env() -> Result<LlmConfigLayer, ConfigError> {
	Ok(LlmConfigLayer {
		gemini_api_key: secret("GEMINI_API_KEY")?,
		groq_api_key: secret("GROQ_API_KEY")?,
		openai_api_key: secret("OPENAI_API_KEY")?,
		together_api_key: secret("TOGETHER_API_KEY")?,
		openrouter_api_key: secret("OPENROUTER_API_KEY")?,
		site_url: env_var("SITE_URL"),
	})
}

fn load_orchestration_from_env() -> Result<OrchestrationConfigLayer, ConfigError> {
	let strategy = match env_var("HERALD_SEARCH_STRATEGY") {
		Some(v) => Some(v.parse::<SearchStrategy>().map_err(|_| ConfigError::InvalidValue {
			key: "HERALD_SEARCH_STRATEGY".to_string(),
			message: format!("unknown strategy '{v}', expected 'race' or 'sequential'"),
		})?),
		None => None,
	};

	Ok(OrchestrationConfigLayer {
		strategy,
		race_timeout_secs: parse_env("HERALD_RACE_TIMEOUT_SECS", "u64")?,
		enhance_timeout_secs: parse_env("HERALD_ENHANCE_TIMEOUT_SECS", "u64")?,
		attempt_timeout_secs: parse_env("HERALD_ATTEMPT_TIMEOUT_SECS", "u64")?,
		variant_timeout_secs: parse_env("HERALD_VARIANT_TIMEOUT_SECS", "u64")?,
		fallback_delay_ms: parse_env("HERALD_FALLBACK_DELAY_MS", "u64")?,
	})
}
