// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Field-level validation errors.
//!
//! Errors are keyed by field path. Nested fields use dotted paths such as
//! `owner.email`, and serialize as nested objects so the response body reads
//! `{"owner": {"email": ["Enter a valid email address."]}}`. Errors that do
//! not belong to a single field go under [`NON_FIELD_ERRORS`].

use serde::{Serialize, Serializer};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;

pub const NON_FIELD_ERRORS: &str = "non_field_errors";

/// Canonical messages shared by every validator.
pub mod messages {
	pub const REQUIRED: &str = "This field is required.";
	pub const BLANK: &str = "This field may not be blank.";
	pub const NULL: &str = "This field may not be null.";
	pub const INVALID_EMAIL: &str = "Enter a valid email address.";
	pub const INVALID_UUID: &str = "Must be a valid UUID.";
	pub const UNIQUE: &str = "This field must be unique.";
	pub const USERNAME_TAKEN: &str = "A user with that username already exists.";
	pub const INVALID_USERNAME: &str = "Enter a valid username. This value may contain only letters, numbers, and @/./+/-/_ characters.";
	pub const INVALID_RESET_TOKEN: &str = "Invalid or expired reset token.";
	pub const NOT_AN_OBJECT: &str = "Expected a dictionary of items.";

	pub fn max_length(max: usize) -> String {
		format!("Ensure this field has no more than {max} characters.")
	}
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
	errors: BTreeMap<String, Vec<String>>,
}

impl ValidationErrors {
	pub fn new() -> Self {
		Self::default()
	}

	/// Build an error set holding a single message for `field`.
	pub fn single(field: impl Into<String>, message: impl Into<String>) -> Self {
		let mut errors = Self::new();
		errors.add(field, message);
		errors
	}

	pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
		self.errors.entry(field.into()).or_default().push(message.into());
	}

	pub fn add_non_field(&mut self, message: impl Into<String>) {
		self.add(NON_FIELD_ERRORS, message);
	}

	/// Merge `other` under `prefix`, so `email` becomes `owner.email`.
	pub fn merge_nested(&mut self, prefix: &str, other: ValidationErrors) {
		for (field, messages) in other.errors {
			let path = format!("{prefix}.{field}");
			self.errors.entry(path).or_default().extend(messages);
		}
	}

	pub fn get(&self, field: &str) -> Option<&[String]> {
		self.errors.get(field).map(Vec::as_slice)
	}

	pub fn is_empty(&self) -> bool {
		self.errors.is_empty()
	}

	pub fn to_json(&self) -> Value {
		let mut root = Map::new();
		for (path, messages) in &self.errors {
			insert_path(&mut root, path, messages);
		}
		Value::Object(root)
	}
}

fn insert_path(map: &mut Map<String, Value>, path: &str, messages: &[String]) {
	match path.split_once('.') {
		Some((head, rest)) => {
			let entry = map
				.entry(head.to_string())
				.or_insert_with(|| Value::Object(Map::new()));
			if !entry.is_object() {
				*entry = Value::Object(Map::new());
			}
			if let Value::Object(child) = entry {
				insert_path(child, rest, messages);
			}
		}
		None => {
			map.insert(path.to_string(), Value::from(messages.to_vec()));
		}
	}
}

impl Serialize for ValidationErrors {
	fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: Serializer,
	{
		self.to_json().serialize(serializer)
	}
}

impl fmt::Display for ValidationErrors {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let mut first = true;
		for (field, messages) in &self.errors {
			if !first {
				f.write_str("; ")?;
			}
			first = false;
			write!(f, "{field}: {}", messages.join(" "))?;
		}
		Ok(())
	}
}

impl std::error::Error for ValidationErrors {}
