// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Customers (tenants) and their database schema names.
//!
//! Every customer owns a schema named after it. The name is derived once at
//! provisioning time by [`create_schema_name`] and is never recomputed, so
//! renaming a customer does not move its data.

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

use crate::types::{CustomerId, UserId};
use crate::validation::messages;

pub const CUSTOMER_NAME_MAX_LENGTH: usize = 255;

/// PostgreSQL truncates identifiers beyond 63 bytes.
pub const SCHEMA_NAME_MAX_LENGTH: usize = 63;

/// Schema shared by every tenant; never handed to a customer.
pub const PUBLIC_SCHEMA: &str = "public";

static NON_WORD_REGEX: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"[\W_]+").expect("valid schema name regex"));

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
	pub id: CustomerId,
	pub name: String,
	pub schema_name: String,
	pub owner_id: UserId,
	pub date_created: DateTime<Utc>,
}

impl Customer {
	/// A new customer whose schema name is derived from `name`.
	pub fn new(name: impl Into<String>, owner_id: UserId) -> Self {
		let name = name.into();
		Self {
			id: CustomerId::generate(),
			schema_name: create_schema_name(&name),
			name,
			owner_id,
			date_created: Utc::now(),
		}
	}
}

/// Strip every non-word character and underscore, then lowercase.
///
/// `"Acme Corp, Inc."` becomes `"acmecorpinc"`.
pub fn create_schema_name(name: &str) -> String {
	NON_WORD_REGEX.replace_all(name, "").to_lowercase()
}

/// Reject derived names that cannot back a tenant schema.
pub fn validate_schema_name(schema_name: &str) -> Result<(), String> {
	if schema_name.is_empty() {
		return Err("Customer name must contain at least one letter or digit.".to_string());
	}
	if schema_name.len() > SCHEMA_NAME_MAX_LENGTH {
		return Err(format!(
			"Derived schema name may not exceed {SCHEMA_NAME_MAX_LENGTH} characters."
		));
	}
	if schema_name == PUBLIC_SCHEMA {
		return Err(format!("Schema name '{PUBLIC_SCHEMA}' is reserved."));
	}
	Ok(())
}

pub fn validate_customer_name(name: &str) -> Result<(), String> {
	if name.trim().is_empty() {
		return Err(messages::BLANK.to_string());
	}
	if name.chars().count() > CUSTOMER_NAME_MAX_LENGTH {
		return Err(messages::max_length(CUSTOMER_NAME_MAX_LENGTH));
	}
	Ok(())
}
