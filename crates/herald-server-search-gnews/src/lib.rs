// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! GNews v4 search API client for Herald.
//!
//! GNews returns real, linkable news articles. This crate wraps the
//! `/api/v4/search` endpoint and maps its payload onto the shared
//! [`Article`](herald_common_core::Article) record.

pub mod client;
pub mod error;
pub mod types;

pub use client::GnewsClient;
pub use error::GnewsError;
pub use types::{GnewsRequest, GnewsResponse, MAX_PER_REQUEST};
