// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Search HTTP handlers.

use axum::{
	extract::{
		rejection::{JsonRejection, QueryRejection},
		Query, State,
	},
	Json,
};
use herald_common_core::{SearchError, SearchRequest, SearchResponse, WebSearchRequest, WebSearchResponse};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::{api::AppState, error::ServerError};

/// POST /api/search - news articles for a query.
///
/// A body without a JSON content type counts as a missing query; malformed
/// JSON is reported as such.
/// Dropping the request (client disconnect) cancels in-flight AI calls.
pub async fn news_search(
	State(state): State<AppState>,
	body: Result<Json<SearchRequest>, JsonRejection>,
) -> Result<Json<SearchResponse>, ServerError> {
	let request = match body {
		Ok(Json(request)) => request,
		Err(rejection) => {
			debug!(rejection = %rejection.body_text(), "Unreadable search body");
			return Err(ServerError::news(SearchError::validation(
				rejection_message(&rejection),
			)));
		}
	};

	let cancel = CancellationToken::new();
	let _guard = cancel.clone().drop_guard();

	let response = state
		.service
		.search_with_cancel(&request, &cancel)
		.await
		.map_err(ServerError::news)?;

	info!(
		results = response.total_results,
		provider = ?response.provider,
		search_time = %response.search_time,
		"News search completed"
	);
	Ok(Json(response))
}

fn rejection_message(rejection: &JsonRejection) -> String {
	match rejection {
		JsonRejection::JsonDataError(_) | JsonRejection::JsonSyntaxError(_) => {
			format!("Invalid request body: {}", rejection.body_text())
		}
		_ => "Query is required".to_string(),
	}
}

/// GET /api/search - one page of Google Custom Search results.
pub async fn web_search(
	State(state): State<AppState>,
	params: Result<Query<WebSearchRequest>, QueryRejection>,
) -> Result<Json<WebSearchResponse>, ServerError> {
	let Query(request) = params.map_err(|rejection| {
		ServerError::web(SearchError::validation(rejection.body_text()))
	})?;

	let response = state
		.service
		.web_search(&request)
		.await
		.map_err(ServerError::web)?;

	info!(
		results = response.articles.len(),
		next_page = ?response.next_page,
		"Web search completed"
	);
	Ok(Json(response))
}
