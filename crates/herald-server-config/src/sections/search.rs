// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! News and web search provider configuration section.

use herald_common_config::SecretString;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchConfigLayer {
	#[serde(default)]
	pub gnews: Option<GnewsConfigLayer>,
	#[serde(default)]
	pub google_cse: Option<GoogleCseConfigLayer>,
}

impl SearchConfigLayer {
	pub fn merge(&mut self, other: Self) {
		if let Some(other_gnews) = other.gnews {
			self.gnews
				.get_or_insert_with(Default::default)
				.merge(other_gnews);
		}
		if let Some(other_google) = other.google_cse {
			self.google_cse
				.get_or_insert_with(Default::default)
				.merge(other_google);
		}
	}

	pub fn finalize(self) -> SearchConfig {
		SearchConfig {
			gnews: self.gnews.map(|g| g.finalize()).unwrap_or_default(),
			google_cse: self.google_cse.map(|g| g.finalize()).unwrap_or_default(),
		}
	}
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GnewsConfigLayer {
	pub api_key: Option<SecretString>,
}

impl GnewsConfigLayer {
	pub fn merge(&mut self, other: Self) {
		if other.api_key.is_some() {
			self.api_key = other.api_key;
		}
	}

	pub fn finalize(self) -> GnewsConfig {
		GnewsConfig {
			api_key: self.api_key.filter(|k| !k.is_blank()),
		}
	}
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GoogleCseConfigLayer {
	pub api_key: Option<SecretString>,
	pub search_engine_id: Option<String>,
}

impl GoogleCseConfigLayer {
	pub fn merge(&mut self, other: Self) {
		if other.api_key.is_some() {
			self.api_key = other.api_key;
		}
		if other.search_engine_id.is_some() {
			self.search_engine_id = other.search_engine_id;
		}
	}

	pub fn finalize(self) -> GoogleCseConfig {
		GoogleCseConfig {
			api_key: self.api_key.filter(|k| !k.is_blank()),
			search_engine_id: self.search_engine_id.filter(|id| !id.trim().is_empty()),
		}
	}
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchConfig {
	#[serde(default)]
	pub gnews: GnewsConfig,
	#[serde(default)]
	pub google_cse: GoogleCseConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GnewsConfig {
	pub api_key: Option<SecretString>,
}

impl GnewsConfig {
	pub fn is_configured(&self) -> bool {
		self.api_key.is_some()
	}
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GoogleCseConfig {
	pub api_key: Option<SecretString>,
	pub search_engine_id: Option<String>,
}

impl GoogleCseConfig {
	pub fn is_configured(&self) -> bool {
		self.api_key.is_some() && self.search_engine_id.is_some()
	}
}
