// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Herald news search server.
//!
//! Serves `POST /api/search` (news articles gathered from GNews and AI
//! providers), `GET /api/search` (Google Custom Search pages) and `/health`.

pub mod api;
pub mod error;
pub mod routes;

pub use api::{create_router, AppState};
pub use error::ServerError;
