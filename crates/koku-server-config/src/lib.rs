// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Koku server configuration.
//!
//! Configuration is merged from built-in defaults, an optional TOML file and
//! environment variables, in that order.

pub mod error;
pub mod layer;
pub mod sections;
pub mod sources;

use tracing::{debug, info};

pub use error::ConfigError;
pub use layer::ServerConfigLayer;
pub use sections::{
	AuthConfig, DatabaseConfig, HttpConfig, LogFormat, LoggingConfig, PreferencesConfig,
	SmtpConfig,
};
pub use sources::{ConfigSource, DefaultsSource, EnvSource, Precedence, TomlSource};

/// Fully resolved server configuration.
#[derive(Debug, Clone, Default)]
pub struct ServerConfig {
	pub http: HttpConfig,
	pub database: DatabaseConfig,
	pub smtp: Option<SmtpConfig>,
	pub logging: LoggingConfig,
	pub preferences: PreferencesConfig,
	pub auth: AuthConfig,
}

impl ServerConfig {
	pub fn socket_addr(&self) -> String {
		format!("{}:{}", self.http.host, self.http.port)
	}
}

/// Load configuration from all sources with standard precedence.
///
/// Precedence (highest to lowest):
/// 1. Environment variables (`KOKU_SERVER_*`, `KOKU_DEFAULT_*`)
/// 2. Config file (`KOKU_SERVER_CONFIG`, or `/etc/koku/server.toml`)
/// 3. Built-in defaults
pub fn load_config() -> Result<ServerConfig, ConfigError> {
	load_from_sources(vec![
		Box::new(DefaultsSource),
		Box::new(TomlSource::from_env_or_system()),
		Box::new(EnvSource),
	])
}

/// Load configuration with a custom config file path.
pub fn load_config_with_file(
	config_path: impl Into<std::path::PathBuf>,
) -> Result<ServerConfig, ConfigError> {
	load_from_sources(vec![
		Box::new(DefaultsSource),
		Box::new(TomlSource::new(config_path)),
		Box::new(EnvSource),
	])
}

fn load_from_sources(mut sources: Vec<Box<dyn ConfigSource>>) -> Result<ServerConfig, ConfigError> {
	sources.sort_by_key(|s| s.precedence());

	let mut merged = ServerConfigLayer::default();
	for source in sources {
		debug!(source = source.name(), "loading configuration source");
		let layer = source.load()?;
		merged.merge(layer);
	}

	finalize(merged)
}

/// Finalize configuration layer into resolved config.
pub fn finalize(layer: ServerConfigLayer) -> Result<ServerConfig, ConfigError> {
	let http = layer.http.unwrap_or_default().finalize();
	let database = layer.database.unwrap_or_default().finalize();
	let logging = layer.logging.unwrap_or_default().finalize();
	let preferences = layer.preferences.unwrap_or_default().finalize();
	let auth = layer.auth.unwrap_or_default().finalize();
	let smtp = match layer.smtp {
		Some(smtp) => smtp.build()?,
		None => None,
	};

	validate_config(&preferences, &auth)?;

	info!(
		host = %http.host,
		port = http.port,
		database = %database.url,
		smtp_configured = smtp.is_some(),
		default_currency = %preferences.defaults.currency,
		default_timezone = %preferences.defaults.timezone,
		default_locale = %preferences.defaults.locale,
		"Server configuration loaded"
	);

	Ok(ServerConfig {
		http,
		database,
		smtp,
		logging,
		preferences,
		auth,
	})
}

fn validate_config(preferences: &PreferencesConfig, auth: &AuthConfig) -> Result<(), ConfigError> {
	preferences
		.defaults
		.validate()
		.map_err(|e| ConfigError::Validation(format!("default preferences: {e}")))?;

	if auth.reset_token_ttl_hours <= 0 {
		return Err(ConfigError::InvalidValue {
			key: "auth.reset_token_ttl_hours".to_string(),
			message: format!("must be positive, got {}", auth.reset_token_ttl_hours),
		});
	}

	Ok(())
}
