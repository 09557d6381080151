// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! SMTP configuration section.

use koku_common_secret::SecretString;
use serde::Deserialize;

use crate::error::ConfigError;

pub const DEFAULT_SMTP_PORT: u16 = 587;
pub const DEFAULT_FROM_NAME: &str = "Koku";

/// Resolved outbound mail settings. Only present when a host is configured.
#[derive(Debug, Clone)]
pub struct SmtpConfig {
	pub host: String,
	pub port: u16,
	pub username: Option<String>,
	pub password: Option<SecretString>,
	pub from_address: String,
	pub from_name: String,
	pub use_tls: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SmtpConfigLayer {
	pub host: Option<String>,
	pub port: Option<u16>,
	pub username: Option<String>,
	#[serde(skip_serializing)]
	pub password: Option<SecretString>,
	pub from_address: Option<String>,
	pub from_name: Option<String>,
	pub use_tls: Option<bool>,
}

impl SmtpConfigLayer {
	pub fn merge(&mut self, other: SmtpConfigLayer) {
		if other.host.is_some() {
			self.host = other.host;
		}
		if other.port.is_some() {
			self.port = other.port;
		}
		if other.username.is_some() {
			self.username = other.username;
		}
		if other.password.is_some() {
			self.password = other.password;
		}
		if other.from_address.is_some() {
			self.from_address = other.from_address;
		}
		if other.from_name.is_some() {
			self.from_name = other.from_name;
		}
		if other.use_tls.is_some() {
			self.use_tls = other.use_tls;
		}
	}

	pub fn is_configured(&self) -> bool {
		self.host.as_deref().is_some_and(|host| !host.trim().is_empty())
	}

	/// Returns `Ok(None)` when no host is set. A host without a sender
	/// address is an error.
	pub fn build(self) -> Result<Option<SmtpConfig>, ConfigError> {
		if !self.is_configured() {
			return Ok(None);
		}
		let host = self.host.unwrap_or_default();

		let from_address = self
			.from_address
			.filter(|address| !address.trim().is_empty())
			.ok_or_else(|| ConfigError::InvalidValue {
				key: "smtp.from_address".to_string(),
				message: "required when smtp.host is set".to_string(),
			})?;

		Ok(Some(SmtpConfig {
			host,
			port: self.port.unwrap_or(DEFAULT_SMTP_PORT),
			username: self.username,
			password: self.password,
			from_address,
			from_name: self
				.from_name
				.unwrap_or_else(|| DEFAULT_FROM_NAME.to_string()),
			use_tls: self.use_tls.unwrap_or(true),
		}))
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn missing_host_means_disabled() {
		assert!(SmtpConfigLayer::default().build().unwrap().is_none());

		let blank = SmtpConfigLayer {
			host: Some("  ".to_string()),
			from_address: Some("noreply@example.com".to_string()),
			..Default::default()
		};
		assert!(blank.build().unwrap().is_none());
	}

	#[test]
	fn host_requires_from_address() {
		let layer = SmtpConfigLayer {
			host: Some("smtp.example.com".to_string()),
			..Default::default()
		};
		let err = layer.build().unwrap_err();
		assert!(matches!(err, ConfigError::InvalidValue { ref key, .. } if key == "smtp.from_address"));
	}

	#[test]
	fn fills_defaults() {
		let layer = SmtpConfigLayer {
			host: Some("smtp.example.com".to_string()),
			from_address: Some("noreply@example.com".to_string()),
			password: Some(SecretString::new("hunter2".to_string())),
			..Default::default()
		};
		let config = layer.build().unwrap().unwrap();
		assert_eq!(config.port, 587);
		assert_eq!(config.from_name, "Koku");
		assert!(config.use_tls);
		assert_eq!(config.password.unwrap().expose(), "hunter2");
	}
}
