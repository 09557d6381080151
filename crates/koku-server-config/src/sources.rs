// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration sources: environment variables and TOML files.

use std::path::PathBuf;

use koku_common_secret::load_secret_env;
use tracing::{debug, trace};

use crate::error::ConfigError;
use crate::layer::ServerConfigLayer;
use crate::sections::{
	AuthConfigLayer, DatabaseConfigLayer, HttpConfigLayer, LogFormat, LoggingConfigLayer,
	PreferencesConfigLayer, SmtpConfigLayer,
};

pub const SYSTEM_CONFIG_PATH: &str = "/etc/koku/server.toml";

/// Source precedence levels (higher = overrides lower).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
	Defaults = 10,
	ConfigFile = 20,
	Environment = 50,
}

pub trait ConfigSource: Send + Sync {
	fn name(&self) -> &'static str;
	fn precedence(&self) -> Precedence;
	fn load(&self) -> Result<ServerConfigLayer, ConfigError>;
}

/// Built-in defaults source.
pub struct DefaultsSource;

impl ConfigSource for DefaultsSource {
	fn name(&self) -> &'static str {
		"defaults"
	}

	fn precedence(&self) -> Precedence {
		Precedence::Defaults
	}

	fn load(&self) -> Result<ServerConfigLayer, ConfigError> {
		debug!("loading defaults");
		Ok(ServerConfigLayer::default())
	}
}

/// TOML file configuration source. A missing file yields an empty layer.
pub struct TomlSource {
	path: PathBuf,
}

impl TomlSource {
	pub fn new(path: impl Into<PathBuf>) -> Self {
		Self { path: path.into() }
	}

	pub fn system() -> Self {
		Self::new(SYSTEM_CONFIG_PATH)
	}

	/// `KOKU_SERVER_CONFIG` if set, the system path otherwise.
	pub fn from_env_or_system() -> Self {
		match env_var("KOKU_SERVER_CONFIG") {
			Some(path) => Self::new(path),
			None => Self::system(),
		}
	}
}

impl ConfigSource for TomlSource {
	fn name(&self) -> &'static str {
		"toml-config"
	}

	fn precedence(&self) -> Precedence {
		Precedence::ConfigFile
	}

	fn load(&self) -> Result<ServerConfigLayer, ConfigError> {
		if !self.path.exists() {
			debug!(path = %self.path.display(), "config file not found, skipping");
			return Ok(ServerConfigLayer::default());
		}

		debug!(path = %self.path.display(), "loading config file");
		let content = std::fs::read_to_string(&self.path).map_err(|e| ConfigError::FileRead {
			path: self.path.clone(),
			source: e,
		})?;

		let layer: ServerConfigLayer =
			toml::from_str(&content).map_err(|e| ConfigError::TomlParse {
				path: self.path.clone(),
				source: e,
			})?;

		trace!("parsed config layer from TOML");
		Ok(layer)
	}
}

/// Environment variable source.
///
/// Server settings use `KOKU_SERVER_<FIELD>`; seeded preference defaults use
/// `KOKU_DEFAULT_<KIND>`.
pub struct EnvSource;

impl ConfigSource for EnvSource {
	fn name(&self) -> &'static str {
		"environment"
	}

	fn precedence(&self) -> Precedence {
		Precedence::Environment
	}

	fn load(&self) -> Result<ServerConfigLayer, ConfigError> {
		debug!("loading environment variables");
		Ok(ServerConfigLayer {
			http: Some(load_http_from_env()?),
			database: Some(load_database_from_env()),
			smtp: Some(load_smtp_from_env()?),
			logging: Some(load_logging_from_env()?),
			preferences: Some(load_preferences_from_env()),
			auth: Some(load_auth_from_env()?),
		})
	}
}

fn env_var(name: &str) -> Option<String> {
	std::env::var(name).ok().filter(|s| !s.is_empty())
}

fn env_bool(name: &str) -> Option<bool> {
	env_var(name).map(|v| v.eq_ignore_ascii_case("true") || v == "1")
}

fn env_u16(name: &str) -> Result<Option<u16>, ConfigError> {
	match env_var(name) {
		Some(v) => v.parse().map(Some).map_err(|_| ConfigError::InvalidValue {
			key: name.to_string(),
			message: format!("invalid u16 value '{v}'"),
		}),
		None => Ok(None),
	}
}

fn env_i64(name: &str) -> Result<Option<i64>, ConfigError> {
	match env_var(name) {
		Some(v) => v.parse().map(Some).map_err(|_| ConfigError::InvalidValue {
			key: name.to_string(),
			message: format!("invalid integer value '{v}'"),
		}),
		None => Ok(None),
	}
}

fn load_http_from_env() -> Result<HttpConfigLayer, ConfigError> {
	Ok(HttpConfigLayer {
		host: env_var("KOKU_SERVER_HOST"),
		port: env_u16("KOKU_SERVER_PORT")?,
		base_url: env_var("KOKU_SERVER_BASE_URL"),
	})
}

fn load_database_from_env() -> DatabaseConfigLayer {
	DatabaseConfigLayer {
		url: env_var("KOKU_SERVER_DATABASE_URL"),
	}
}

fn load_smtp_from_env() -> Result<SmtpConfigLayer, ConfigError> {
	let password = load_secret_env("KOKU_SERVER_SMTP_PASSWORD")
		.map_err(|e| ConfigError::Secret(e.to_string()))?;

	Ok(SmtpConfigLayer {
		host: env_var("KOKU_SERVER_SMTP_HOST"),
		port: env_u16("KOKU_SERVER_SMTP_PORT")?,
		username: env_var("KOKU_SERVER_SMTP_USERNAME"),
		password,
		from_address: env_var("KOKU_SERVER_SMTP_FROM"),
		from_name: env_var("KOKU_SERVER_SMTP_FROM_NAME"),
		use_tls: env_bool("KOKU_SERVER_SMTP_TLS"),
	})
}

fn load_logging_from_env() -> Result<LoggingConfigLayer, ConfigError> {
	let format = match env_var("KOKU_SERVER_LOG_FORMAT") {
		Some(v) => Some(v.parse::<LogFormat>().map_err(|message| {
			ConfigError::InvalidValue {
				key: "KOKU_SERVER_LOG_FORMAT".to_string(),
				message,
			}
		})?),
		None => None,
	};

	Ok(LoggingConfigLayer {
		level: env_var("KOKU_SERVER_LOG_LEVEL"),
		format,
	})
}

fn load_preferences_from_env() -> PreferencesConfigLayer {
	PreferencesConfigLayer {
		currency: env_var("KOKU_DEFAULT_CURRENCY"),
		timezone: env_var("KOKU_DEFAULT_TIMEZONE"),
		locale: env_var("KOKU_DEFAULT_LOCALE"),
	}
}

fn load_auth_from_env() -> Result<AuthConfigLayer, ConfigError> {
	Ok(AuthConfigLayer {
		reset_token_ttl_hours: env_i64("KOKU_SERVER_RESET_TOKEN_TTL_HOURS")?,
	})
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::io::Write;
	use tempfile::NamedTempFile;

	#[test]
	fn precedence_orders_env_last() {
		assert!(Precedence::Defaults < Precedence::ConfigFile);
		assert!(Precedence::ConfigFile < Precedence::Environment);
	}

	#[test]
	fn missing_toml_file_is_skipped() {
		let source = TomlSource::new("/nonexistent/koku/server.toml");
		let layer = source.load().unwrap();
		assert!(layer.http.is_none());
	}

	#[test]
	fn invalid_toml_is_an_error() {
		let mut file = NamedTempFile::new().unwrap();
		writeln!(file, "[http\nport = ").unwrap();

		let err = TomlSource::new(file.path()).load().unwrap_err();
		assert!(matches!(err, ConfigError::TomlParse { .. }));
	}

	#[test]
	fn toml_file_is_parsed() {
		let mut file = NamedTempFile::new().unwrap();
		writeln!(
			file,
			"[smtp]\nhost = \"mail.example.com\"\nfrom_address = \"koku@example.com\""
		)
		.unwrap();

		let layer = TomlSource::new(file.path()).load().unwrap();
		let smtp = layer.smtp.unwrap();
		assert_eq!(smtp.host.as_deref(), Some("mail.example.com"));
		assert_eq!(smtp.from_address.as_deref(), Some("koku@example.com"));
	}

	#[test]
	fn env_helpers_ignore_empty_values() {
		std::env::set_var("KOKU_TEST_EMPTY_VAR_8812", "");
		assert_eq!(env_var("KOKU_TEST_EMPTY_VAR_8812"), None);
		std::env::remove_var("KOKU_TEST_EMPTY_VAR_8812");
	}

	#[test]
	fn env_bool_accepts_true_and_one() {
		std::env::set_var("KOKU_TEST_BOOL_VAR_8813", "TRUE");
		assert_eq!(env_bool("KOKU_TEST_BOOL_VAR_8813"), Some(true));
		std::env::set_var("KOKU_TEST_BOOL_VAR_8813", "1");
		assert_eq!(env_bool("KOKU_TEST_BOOL_VAR_8813"), Some(true));
		std::env::set_var("KOKU_TEST_BOOL_VAR_8813", "no");
		assert_eq!(env_bool("KOKU_TEST_BOOL_VAR_8813"), Some(false));
		std::env::remove_var("KOKU_TEST_BOOL_VAR_8813");
	}

	#[test]
	fn env_u16_rejects_garbage() {
		std::env::set_var("KOKU_TEST_PORT_VAR_8814", "eighty");
		let err = env_u16("KOKU_TEST_PORT_VAR_8814").unwrap_err();
		assert!(matches!(err, ConfigError::InvalidValue { ref key, .. } if key == "KOKU_TEST_PORT_VAR_8814"));
		std::env::remove_var("KOKU_TEST_PORT_VAR_8814");
	}
}
