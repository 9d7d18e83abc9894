// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Partial configuration produced by a single source.

use serde::{Deserialize, Serialize};

use crate::sections::{
	HttpConfigLayer, LlmConfigLayer, LoggingConfigLayer, OrchestrationConfigLayer, SearchConfigLayer,
};

/// One source's view of the configuration. Every section is optional so
/// that a TOML file may mention only what it overrides.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServerConfigLayer {
	#[serde(default)]
	pub http: Option<HttpConfigLayer>,
	#[serde(default)]
	pub logging: Option<LoggingConfigLayer>,
	#[serde(default)]
	pub search: Option<SearchConfigLayer>,
	#[serde(default)]
	pub llm: Option<LlmConfigLayer>,
	#[serde(default)]
	pub orchestration: Option<OrchestrationConfigLayer>,
}

impl ServerConfigLayer {
	/// Overlays `other` on top of `self`; values present in `other` win.
	pub fn merge(&mut self, other: ServerConfigLayer) {
		if let Some(http) = other.http {
			self.http.get_or_insert_with(Default::default).merge(http);
		}
		if let Some(logging) = other.logging {
			self.logging.get_or_insert_with(Default::default).merge(logging);
		}
		if let Some(search) = other.search {
			self.search.get_or_insert_with(Default::default).merge(search);
		}
		if let Some(llm) = other.llm {
			self.llm.get_or_insert_with(Default::default).merge(llm);
		}
		if let Some(orchestration) = other.orchestration {
			self.orchestration
				.get_or_insert_with(Default::default)
				.merge(orchestration);
		}
	}
}
