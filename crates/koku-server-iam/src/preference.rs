// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Per-user preferences.
//!
//! A preference is a named JSON object owned by one user. Three names are
//! special: a preference called `locale`, `currency` or `timezone` must carry
//! a value of the same key drawn from the matching [`catalog`](crate::catalog)
//! set. Any other name is stored without checking its contents.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

use crate::catalog;
use crate::types::{PreferenceId, UserId};

pub const PREFERENCE_NAME_MAX_LENGTH: usize = 255;
pub const PREFERENCE_DESCRIPTION_MAX_LENGTH: usize = 255;
pub const DEFAULT_PREFERENCE_DESCRIPTION: &str = "default preference";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserPreference {
	pub id: PreferenceId,
	pub user_id: UserId,
	pub name: String,
	pub description: Option<String>,
	pub preference: Value,
	pub created_at: DateTime<Utc>,
	pub updated_at: DateTime<Utc>,
}

impl UserPreference {
	pub fn new(
		user_id: UserId,
		name: impl Into<String>,
		description: Option<String>,
		preference: Value,
	) -> Self {
		let now = Utc::now();
		Self {
			id: PreferenceId::generate(),
			user_id,
			name: name.into(),
			description,
			preference,
			created_at: now,
			updated_at: now,
		}
	}
}

/// Preference names whose values are checked against a catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PreferenceKind {
	Locale,
	Currency,
	Timezone,
}

impl PreferenceKind {
	pub fn all() -> &'static [PreferenceKind] {
		&[
			PreferenceKind::Currency,
			PreferenceKind::Timezone,
			PreferenceKind::Locale,
		]
	}

	pub fn from_name(name: &str) -> Option<Self> {
		match name {
			"locale" => Some(Self::Locale),
			"currency" => Some(Self::Currency),
			"timezone" => Some(Self::Timezone),
			_ => None,
		}
	}

	pub fn as_str(&self) -> &'static str {
		match self {
			Self::Locale => "locale",
			Self::Currency => "currency",
			Self::Timezone => "timezone",
		}
	}

	pub fn is_valid(&self, value: &str) -> bool {
		match self {
			Self::Locale => catalog::is_valid_locale(value),
			Self::Currency => catalog::is_valid_currency(value),
			Self::Timezone => catalog::is_valid_timezone(value),
		}
	}
}

impl fmt::Display for PreferenceKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Check `preference` for a preference called `name`.
///
/// Names outside [`PreferenceKind`] always pass. For a known kind the value
/// at `preference[kind]` must be a string in the kind's catalog; otherwise the
/// error reads `Invalid currency: XYZ`, with `None` standing in for a missing
/// value.
pub fn validate_preference(name: &str, preference: &Value) -> Result<(), String> {
	let Some(kind) = PreferenceKind::from_name(name) else {
		return Ok(());
	};

	let value = preference.get(kind.as_str());
	if let Some(Value::String(candidate)) = value {
		if kind.is_valid(candidate) {
			return Ok(());
		}
	}

	let rendered = match value {
		None | Some(Value::Null) => "None".to_string(),
		Some(Value::String(s)) => s.clone(),
		Some(other) => other.to_string(),
	};
	Err(format!("Invalid {kind}: {rendered}"))
}

/// `{"<kind>": "<value>"}`, the stored shape of a kind's preference.
pub fn preference_value(kind: PreferenceKind, value: &str) -> Value {
	let mut object = Map::new();
	object.insert(kind.as_str().to_string(), Value::String(value.to_string()));
	Value::Object(object)
}

/// Values seeded into every new user's preferences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreferenceDefaults {
	pub currency: String,
	pub timezone: String,
	pub locale: String,
}

impl Default for PreferenceDefaults {
	fn default() -> Self {
		Self {
			currency: "USD".to_string(),
			timezone: "UTC".to_string(),
			locale: "en_US.UTF-8".to_string(),
		}
	}
}

impl PreferenceDefaults {
	pub fn value_for(&self, kind: PreferenceKind) -> &str {
		match kind {
			PreferenceKind::Currency => &self.currency,
			PreferenceKind::Timezone => &self.timezone,
			PreferenceKind::Locale => &self.locale,
		}
	}

	/// One preference per kind, named after the kind.
	pub fn build_for(&self, user_id: UserId) -> Vec<UserPreference> {
		PreferenceKind::all()
			.iter()
			.map(|kind| {
				UserPreference::new(
					user_id,
					kind.as_str(),
					Some(DEFAULT_PREFERENCE_DESCRIPTION.to_string()),
					preference_value(*kind, self.value_for(*kind)),
				)
			})
			.collect()
	}

	/// Confirm each default is itself a valid value for its kind.
	pub fn validate(&self) -> Result<(), String> {
		for kind in PreferenceKind::all() {
			let value = self.value_for(*kind);
			if !kind.is_valid(value) {
				return Err(format!("Invalid {kind}: {value}"));
			}
		}
		Ok(())
	}
}
