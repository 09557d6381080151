// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration layer for merging from multiple sources.

use serde::Deserialize;

use crate::sections::{
	AuthConfigLayer, DatabaseConfigLayer, HttpConfigLayer, LoggingConfigLayer,
	PreferencesConfigLayer, SmtpConfigLayer,
};

/// Server configuration layer - all fields are Option for merging.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ServerConfigLayer {
	#[serde(default)]
	pub http: Option<HttpConfigLayer>,
	#[serde(default)]
	pub database: Option<DatabaseConfigLayer>,
	#[serde(default)]
	pub smtp: Option<SmtpConfigLayer>,
	#[serde(default)]
	pub logging: Option<LoggingConfigLayer>,
	#[serde(default)]
	pub preferences: Option<PreferencesConfigLayer>,
	#[serde(default)]
	pub auth: Option<AuthConfigLayer>,
}

impl ServerConfigLayer {
	/// Merge another layer into this one. Other layer takes precedence.
	pub fn merge(&mut self, other: ServerConfigLayer) {
		merge_option(&mut self.http, other.http, HttpConfigLayer::merge);
		merge_option(
			&mut self.database,
			other.database,
			DatabaseConfigLayer::merge,
		);
		merge_option(&mut self.smtp, other.smtp, SmtpConfigLayer::merge);
		merge_option(&mut self.logging, other.logging, LoggingConfigLayer::merge);
		merge_option(
			&mut self.preferences,
			other.preferences,
			PreferencesConfigLayer::merge,
		);
		merge_option(&mut self.auth, other.auth, AuthConfigLayer::merge);
	}
}

fn merge_option<T, F>(target: &mut Option<T>, source: Option<T>, merge_fn: F)
where
	F: FnOnce(&mut T, T),
{
	match (target.as_mut(), source) {
		(Some(t), Some(s)) => merge_fn(t, s),
		(None, Some(s)) => *target = Some(s),
		_ => {}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn empty_other_keeps_base() {
		let mut base = ServerConfigLayer {
			http: Some(HttpConfigLayer {
				port: Some(9000),
				..Default::default()
			}),
			..Default::default()
		};
		base.merge(ServerConfigLayer::default());
		assert_eq!(base.http.as_ref().unwrap().port, Some(9000));
	}

	#[test]
	fn other_overwrites_field_by_field() {
		let mut base = ServerConfigLayer {
			http: Some(HttpConfigLayer {
				port: Some(9000),
				host: Some("127.0.0.1".to_string()),
				..Default::default()
			}),
			..Default::default()
		};
		let other = ServerConfigLayer {
			http: Some(HttpConfigLayer {
				port: Some(8080),
				..Default::default()
			}),
			preferences: Some(PreferencesConfigLayer {
				currency: Some("EUR".to_string()),
				..Default::default()
			}),
			..Default::default()
		};
		base.merge(other);

		let http = base.http.unwrap();
		assert_eq!(http.port, Some(8080));
		assert_eq!(http.host.as_deref(), Some("127.0.0.1"));
		assert_eq!(base.preferences.unwrap().currency.as_deref(), Some("EUR"));
	}

	#[test]
	fn parses_from_toml() {
		let layer: ServerConfigLayer = toml::from_str(
			r#"
			[http]
			port = 9090

			[preferences]
			timezone = "Europe/Paris"
			"#,
		)
		.unwrap();

		assert_eq!(layer.http.unwrap().port, Some(9090));
		assert_eq!(
			layer.preferences.unwrap().timezone.as_deref(),
			Some("Europe/Paris")
		);
		assert!(layer.smtp.is_none());
	}
}
