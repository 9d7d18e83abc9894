// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration sections.

pub mod http;
pub mod llm;
pub mod logging;
pub mod orchestration;
pub mod search;

pub use http::{HttpConfig, HttpConfigLayer};
pub use llm::{LlmConfig, LlmConfigLayer, DEFAULT_SITE_URL};
pub use logging::{LoggingConfig, LoggingConfigLayer};
pub use orchestration::{OrchestrationConfig, OrchestrationConfigLayer, SearchStrategy};
pub use search::{
	GnewsConfig, GnewsConfigLayer, GoogleCseConfig, GoogleCseConfigLayer, SearchConfig,
	SearchConfigLayer,
};
