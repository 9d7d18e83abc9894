// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Timeouts and strategy for multi-provider orchestration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// How AI-only searches pick among available providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchStrategy {
	/// Query every provider concurrently; first parseable answer wins.
	#[default]
	Race,
	/// Walk providers and their models in priority order.
	Sequential,
}

impl std::fmt::Display for SearchStrategy {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			SearchStrategy::Race => write!(f, "race"),
			SearchStrategy::Sequential => write!(f, "sequential"),
		}
	}
}

impl std::str::FromStr for SearchStrategy {
	type Err = ConfigError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.trim().to_lowercase().as_str() {
			"race" => Ok(SearchStrategy::Race),
			"sequential" => Ok(SearchStrategy::Sequential),
			_ => Err(ConfigError::InvalidValue {
				key: "strategy".to_string(),
				message: format!("unknown strategy '{s}', expected 'race' or 'sequential'"),
			}),
		}
	}
}

pub const DEFAULT_RACE_TIMEOUT_SECS: u64 = 15;
pub const DEFAULT_ENHANCE_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_ATTEMPT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_VARIANT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrchestrationConfigLayer {
	pub strategy: Option<SearchStrategy>,
	pub race_timeout_secs: Option<u64>,
	pub enhance_timeout_secs: Option<u64>,
	pub attempt_timeout_secs: Option<u64>,
	pub variant_timeout_secs: Option<u64>,
	pub fallback_delay_ms: Option<u64>,
}

impl OrchestrationConfigLayer {
	pub fn merge(&mut self, other: Self) {
		if other.strategy.is_some() {
			self.strategy = other.strategy;
		}
		if other.race_timeout_secs.is_some() {
			self.race_timeout_secs = other.race_timeout_secs;
		}
		if other.enhance_timeout_secs.is_some() {
			self.enhance_timeout_secs = other.enhance_timeout_secs;
		}
		if other.attempt_timeout_secs.is_some() {
			self.attempt_timeout_secs = other.attempt_timeout_secs;
		}
		if other.variant_timeout_secs.is_some() {
			self.variant_timeout_secs = other.variant_timeout_secs;
		}
		if other.fallback_delay_ms.is_some() {
			self.fallback_delay_ms = other.fallback_delay_ms;
		}
	}

	pub fn finalize(self) -> OrchestrationConfig {
		OrchestrationConfig {
			strategy: self.strategy.unwrap_or_default(),
			race_timeout_secs: self.race_timeout_secs.unwrap_or(DEFAULT_RACE_TIMEOUT_SECS),
			enhance_timeout_secs: self
				.enhance_timeout_secs
				.unwrap_or(DEFAULT_ENHANCE_TIMEOUT_SECS),
			attempt_timeout_secs: self
				.attempt_timeout_secs
				.unwrap_or(DEFAULT_ATTEMPT_TIMEOUT_SECS),
			variant_timeout_secs: self
				.variant_timeout_secs
				.unwrap_or(DEFAULT_VARIANT_TIMEOUT_SECS),
			fallback_delay_ms: self.fallback_delay_ms.unwrap_or(0),
		}
	}
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrchestrationConfig {
	pub strategy: SearchStrategy,
	pub race_timeout_secs: u64,
	pub enhance_timeout_secs: u64,
	pub attempt_timeout_secs: u64,
	pub variant_timeout_secs: u64,
	pub fallback_delay_ms: u64,
}

impl Default for OrchestrationConfig {
	fn default() -> Self {
		OrchestrationConfigLayer::default().finalize()
	}
}

impl OrchestrationConfig {
	pub fn race_timeout(&self) -> Duration {
		Duration::from_secs(self.race_timeout_secs)
	}

	pub fn enhance_timeout(&self) -> Duration {
		Duration::from_secs(self.enhance_timeout_secs)
	}

	pub fn attempt_timeout(&self) -> Duration {
		Duration::from_secs(self.attempt_timeout_secs)
	}

	pub fn variant_timeout(&self) -> Duration {
		Duration::from_secs(self.variant_timeout_secs)
	}

	pub fn fallback_delay(&self) -> Duration {
		Duration::from_millis(self.fallback_delay_ms)
	}

	/// Zero timeouts would fail every call immediately.
	pub fn validate(&self) -> Result<(), ConfigError> {
		let timeouts = [
			("race_timeout_secs", self.race_timeout_secs),
			("enhance_timeout_secs", self.enhance_timeout_secs),
			("attempt_timeout_secs", self.attempt_timeout_secs),
			("variant_timeout_secs", self.variant_timeout_secs),
		];
		for (key, value) in timeouts {
			if value == 0 {
				return Err(ConfigError::Validation(format!(
					"{key} must be greater than zero"
				)));
			}
		}
		Ok(())
	}
}
