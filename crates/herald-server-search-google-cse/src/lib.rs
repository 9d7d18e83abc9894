// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Google Custom Search Engine client for Herald.
//!
//! This crate provides a typed Rust client for the Google CSE API and the
//! normalizer that turns CSE items into [`Article`](herald_common_core::Article)s.

pub mod client;
pub mod error;
pub mod normalize;
pub mod types;

pub use client::CseClient;
pub use error::CseError;
pub use types::{CseRequest, CseResponse, MAX_PER_REQUEST};
