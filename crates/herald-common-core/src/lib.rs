// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

pub mod article;
pub mod date;
pub mod error;
pub mod extract;
pub mod llm;
pub mod rank;
pub mod search;

pub use article::*;
pub use date::*;
pub use error::*;
pub use extract::*;
pub use llm::*;
pub use rank::*;
pub use search::*;
