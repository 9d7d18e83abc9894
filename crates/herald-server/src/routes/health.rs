// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Health HTTP handler.

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use herald_server_search_service::ProviderStatus;
use serde::Serialize;

use crate::api::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
	pub status: &'static str,
	pub version: &'static str,
	pub providers: ProviderStatus,
}

/// GET /health - reports which collaborators are configured.
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
	let response = HealthResponse {
		status: "ok",
		version: env!("CARGO_PKG_VERSION"),
		providers: state.service.status(),
	};
	(StatusCode::OK, Json(response))
}
