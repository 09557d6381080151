// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Users and the username/email rules applied at registration.

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use validator::ValidateEmail;

use crate::types::UserId;
use crate::validation::messages;

pub const USERNAME_MAX_LENGTH: usize = 150;
pub const EMAIL_MAX_LENGTH: usize = 150;
pub const PASSWORD_MAX_LENGTH: usize = 128;

/// Letters, digits and `@ . + - _`, Unicode letters included.
static USERNAME_REGEX: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"^[\w.@+-]+$").expect("valid username regex"));

/// A registered user. The password hash is held by the database layer only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
	pub id: UserId,
	pub username: String,
	pub email: String,
	pub is_active: bool,
	pub date_joined: DateTime<Utc>,
}

impl User {
	/// Create an active user joined now. `email` is normalized first.
	pub fn new(username: impl Into<String>, email: &str) -> Self {
		Self {
			id: UserId::generate(),
			username: username.into(),
			email: normalize_email(email),
			is_active: true,
			date_joined: Utc::now(),
		}
	}
}

/// Lowercase the domain part of an address, leaving the local part intact.
pub fn normalize_email(email: &str) -> String {
	let email = email.trim();
	match email.rsplit_once('@') {
		Some((local, domain)) => format!("{local}@{}", domain.to_lowercase()),
		None => email.to_string(),
	}
}

/// Check a username; the error is the message to show for the field.
pub fn validate_username(username: &str) -> Result<(), String> {
	if username.trim().is_empty() {
		return Err(messages::BLANK.to_string());
	}
	if username.chars().count() > USERNAME_MAX_LENGTH {
		return Err(messages::max_length(USERNAME_MAX_LENGTH));
	}
	if !USERNAME_REGEX.is_match(username) {
		return Err(messages::INVALID_USERNAME.to_string());
	}
	Ok(())
}

pub fn validate_email(email: &str) -> Result<(), String> {
	if email.trim().is_empty() {
		return Err(messages::BLANK.to_string());
	}
	if email.chars().count() > EMAIL_MAX_LENGTH {
		return Err(messages::max_length(EMAIL_MAX_LENGTH));
	}
	if !email.validate_email() {
		return Err(messages::INVALID_EMAIL.to_string());
	}
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;
	use proptest::prelude::*;

	#[test]
	fn new_user_is_active_with_normalized_email() {
		let user = User::new("jsmith", "John.Smith@Example.COM");
		assert!(user.is_active);
		assert_eq!(user.email, "John.Smith@example.com");
	}

	#[test]
	fn username_rules() {
		assert!(validate_username("user.name+tag@corp-1_x").is_ok());
		assert!(validate_username("émilie").is_ok());
		assert_eq!(validate_username("").unwrap_err(), messages::BLANK);
		assert_eq!(
			validate_username("has space").unwrap_err(),
			messages::INVALID_USERNAME
		);
		assert_eq!(
			validate_username(&"a".repeat(151)).unwrap_err(),
			messages::max_length(150)
		);
		assert!(validate_username(&"a".repeat(150)).is_ok());
	}

	#[test]
	fn email_rules() {
		assert!(validate_email("test@example.com").is_ok());
		assert_eq!(validate_email("   ").unwrap_err(), messages::BLANK);
		assert_eq!(
			validate_email("not-an-email").unwrap_err(),
			messages::INVALID_EMAIL
		);
		assert_eq!(
			validate_email("a@").unwrap_err(),
			messages::INVALID_EMAIL
		);

		let long = format!("{}@example.com", "a".repeat(140));
		assert_eq!(validate_email(&long).unwrap_err(), messages::max_length(150));
	}

	#[test]
	fn normalize_email_without_at_is_untouched() {
		assert_eq!(normalize_email(" Plain "), "Plain");
	}

	proptest! {
		#[test]
		fn generated_usernames_are_accepted(name in "[a-zA-Z0-9.@+_-]{1,150}") {
			prop_assert!(validate_username(&name).is_ok());
		}

		#[test]
		fn normalize_email_is_idempotent(local in "[a-zA-Z0-9]{1,20}", domain in "[a-zA-Z]{1,20}\\.[a-zA-Z]{2,4}") {
			let once = normalize_email(&format!("{local}@{domain}"));
			prop_assert_eq!(normalize_email(&once), once.clone());
		}
	}
}
