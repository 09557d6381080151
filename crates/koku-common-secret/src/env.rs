// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Secret loading with the `VAR` / `VAR_FILE` convention used by container
//! secret mounts.

use std::path::PathBuf;
use std::{env, fs};

use thiserror::Error;

use crate::SecretString;

#[derive(Debug, Error)]
pub enum SecretEnvError {
	#[error("failed to read secret file at {path}: {source}")]
	Io {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("secret file path in {var} is empty")]
	EmptyPath { var: String },
}

/// Load a secret from `{var}_FILE` if set, otherwise from `{var}`.
///
/// A single trailing newline in the file is stripped. Returns `Ok(None)` when
/// neither variable is present.
pub fn load_secret_env(var: &str) -> Result<Option<SecretString>, SecretEnvError> {
	let file_var = format!("{var}_FILE");

	if let Ok(path_str) = env::var(&file_var) {
		if path_str.is_empty() {
			return Err(SecretEnvError::EmptyPath { var: file_var });
		}

		let path = PathBuf::from(path_str);
		let content = fs::read_to_string(&path).map_err(|source| SecretEnvError::Io {
			path: path.clone(),
			source,
		})?;

		let value = content.strip_suffix('\n').unwrap_or(&content).to_string();
		return Ok(Some(SecretString::new(value)));
	}

	Ok(env::var(var).ok().map(SecretString::new))
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::io::Write;
	use tempfile::NamedTempFile;

	#[test]
	fn missing_vars_yield_none() {
		let var = "KOKU_TEST_SECRET_UNSET_3141";
		env::remove_var(var);
		env::remove_var(format!("{var}_FILE"));

		assert!(load_secret_env(var).unwrap().is_none());
	}

	#[test]
	fn file_variant_wins_and_strips_newline() {
		let var = "KOKU_TEST_SECRET_FILE_2718";
		let mut file = NamedTempFile::new().unwrap();
		writeln!(file, "from-file").unwrap();

		env::set_var(var, "from-env");
		env::set_var(format!("{var}_FILE"), file.path());

		let secret = load_secret_env(var).unwrap().unwrap();
		assert_eq!(secret.expose(), "from-file");

		env::remove_var(var);
		env::remove_var(format!("{var}_FILE"));
	}

	#[test]
	fn empty_file_path_is_rejected() {
		let var = "KOKU_TEST_SECRET_EMPTY_1618";
		env::set_var(format!("{var}_FILE"), "");

		assert!(matches!(
			load_secret_env(var),
			Err(SecretEnvError::EmptyPath { .. })
		));

		env::remove_var(format!("{var}_FILE"));
	}
}
