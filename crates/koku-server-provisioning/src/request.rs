// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Unvalidated inputs to the provisioning flows.
//!
//! A plain `Option` means the field may be omitted. `Option<Option<T>>`
//! distinguishes an omitted field (`None`) from an explicit null
//! (`Some(None)`), which some fields reject.

use koku_common_secret::SecretString;
use koku_server_iam::{Customer, User};
use serde_json::Value;

#[derive(Debug, Clone, Default)]
pub struct UserRegistration {
	pub username: Option<String>,
	pub email: Option<String>,
	pub password: Option<Option<SecretString>>,
}

#[derive(Debug, Clone, Default)]
pub struct CustomerRegistration {
	pub name: Option<String>,
	pub owner: Option<UserRegistration>,
}

#[derive(Debug, Clone, Default)]
pub struct PreferenceInput {
	/// `None` when omitted, `Some(None)` for an explicit null.
	pub name: Option<Option<String>>,
	pub description: Option<Option<String>>,
	pub preference: Option<Value>,
}

#[derive(Debug, Clone, Default)]
pub struct PasswordChange {
	pub token: Option<String>,
	pub password: Option<Option<SecretString>>,
}

/// A customer together with its owning user.
#[derive(Debug, Clone, PartialEq)]
pub struct CustomerWithOwner {
	pub customer: Customer,
	pub owner: User,
}
