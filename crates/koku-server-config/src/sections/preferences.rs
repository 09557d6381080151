// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Defaults seeded into each new user's preferences.

use koku_server_iam::PreferenceDefaults;
use serde::Deserialize;

#[derive(Debug, Clone, Default)]
pub struct PreferencesConfig {
	pub defaults: PreferenceDefaults,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PreferencesConfigLayer {
	pub currency: Option<String>,
	pub timezone: Option<String>,
	pub locale: Option<String>,
}

impl PreferencesConfigLayer {
	pub fn merge(&mut self, other: PreferencesConfigLayer) {
		if other.currency.is_some() {
			self.currency = other.currency;
		}
		if other.timezone.is_some() {
			self.timezone = other.timezone;
		}
		if other.locale.is_some() {
			self.locale = other.locale;
		}
	}

	pub fn finalize(self) -> PreferencesConfig {
		let fallback = PreferenceDefaults::default();
		PreferencesConfig {
			defaults: PreferenceDefaults {
				currency: self.currency.unwrap_or(fallback.currency),
				timezone: self.timezone.unwrap_or(fallback.timezone),
				locale: self.locale.unwrap_or(fallback.locale),
			},
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn unset_fields_fall_back_individually() {
		let config = PreferencesConfigLayer {
			timezone: Some("Asia/Tokyo".to_string()),
			..Default::default()
		}
		.finalize();
		assert_eq!(config.defaults.currency, "USD");
		assert_eq!(config.defaults.timezone, "Asia/Tokyo");
		assert_eq!(config.defaults.locale, "en_US.UTF-8");
	}
}
