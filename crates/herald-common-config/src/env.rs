// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Environment helpers for secrets.
//!
//! A secret named `FOO` can be supplied either directly as `FOO=value` or
//! indirectly as `FOO_FILE=/path/to/file`, which is the convention used by
//! container secret mounts. Setting both is an error.

use std::path::PathBuf;

use herald_common_secret::{Secret, SecretString};
use thiserror::Error;

/// Errors raised while loading a secret from the environment.
#[derive(Debug, Error)]
pub enum SecretEnvError {
	#[error("both {name} and {name}_FILE are set; use only one")]
	Conflict { name: String },

	#[error("failed to read {name}_FILE at {path}: {source}")]
	FileRead {
		name: String,
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},
}

/// Error for a secret that must be present.
#[derive(Debug, Error)]
pub enum RequiredSecretError {
	#[error("required secret {0} is not set (set {0} or {0}_FILE)")]
	Missing(String),

	#[error(transparent)]
	Env(#[from] SecretEnvError),
}

/// Loads an optional secret from `name` or `name_FILE`.
///
/// Empty values are treated as unset. File contents are trimmed of
/// surrounding whitespace.
pub fn load_secret_env(name: &str) -> Result<Option<SecretString>, SecretEnvError> {
	resolve_secret(name, |key| std::env::var(key).ok())
}

/// Loads a secret that must be present.
pub fn require_secret_env(name: &str) -> Result<SecretString, RequiredSecretError> {
	load_secret_env(name)?.ok_or_else(|| RequiredSecretError::Missing(name.to_string()))
}

fn resolve_secret<F>(name: &str, lookup: F) -> Result<Option<SecretString>, SecretEnvError>
where
	F: Fn(&str) -> Option<String>,
{
	let direct = lookup(name).filter(|v| !v.trim().is_empty());
	let file_key = format!("{name}_FILE");
	let file = lookup(&file_key).filter(|v| !v.trim().is_empty());

	match (direct, file) {
		(Some(_), Some(_)) => Err(SecretEnvError::Conflict {
			name: name.to_string(),
		}),
		(Some(value), None) => Ok(Some(Secret::new(value))),
		(None, Some(path)) => {
			let path = PathBuf::from(path);
			let contents = std::fs::read_to_string(&path).map_err(|source| SecretEnvError::FileRead {
				name: name.to_string(),
				path: path.clone(),
				source,
			})?;
			let trimmed = contents.trim();
			if trimmed.is_empty() {
				Ok(None)
			} else {
				Ok(Some(Secret::new(trimmed.to_string())))
			}
		}
		(None, None) => Ok(None),
	}
}
