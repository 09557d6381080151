// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! HTTP handlers, one module per resource.

pub mod admin;
pub mod customers;
pub mod health;
pub mod password;
pub mod preferences;
pub mod users;

use koku_server_iam::{CustomerId, PreferenceId, UserId};

use crate::error::ServerError;

// Malformed IDs in a path cannot name an existing resource, so they are
// reported as not found.

pub(crate) fn parse_user_id(raw: &str) -> Result<UserId, ServerError> {
	raw.parse()
		.map_err(|_| ServerError::NotFound("user not found".to_string()))
}

pub(crate) fn parse_customer_id(raw: &str) -> Result<CustomerId, ServerError> {
	raw.parse()
		.map_err(|_| ServerError::NotFound("customer not found".to_string()))
}

pub(crate) fn parse_preference_id(raw: &str) -> Result<PreferenceId, ServerError> {
	raw.parse()
		.map_err(|_| ServerError::NotFound("preference not found".to_string()))
}
