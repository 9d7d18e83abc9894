// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

use std::sync::Arc;

use axum::{
	routing::{get, post},
	Router,
};
use herald_server_search_service::SearchService;

use crate::routes;

/// Shared state for every handler.
#[derive(Clone)]
pub struct AppState {
	pub service: Arc<SearchService>,
}

impl AppState {
	pub fn new(service: SearchService) -> Self {
		Self {
			service: Arc::new(service),
		}
	}
}

/// Builds the application router. Tracing and CORS layers are added by the
/// binary.
pub fn create_router(state: AppState) -> Router {
	Router::new()
		.route("/health", get(routes::health::health_check))
		.route(
			"/api/search",
			post(routes::search::news_search).get(routes::search::web_search),
		)
		.with_state(state)
}
