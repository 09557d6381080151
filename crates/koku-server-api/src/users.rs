// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use koku_common_secret::SecretString;
use koku_server_iam::User;
use koku_server_provisioning::UserRegistration;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

/// Body of `POST /api/v1/users`, also nested as a customer's owner.
#[derive(Debug, Clone, Default, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct RegisterUserRequest {
	pub username: Option<String>,
	pub email: Option<String>,
	/// Write-only. A temporary password is generated when omitted.
	#[serde(default, deserialize_with = "crate::serde_util::double_option")]
	#[cfg_attr(feature = "openapi", schema(value_type = Option<String>, format = Password))]
	pub password: Option<Option<SecretString>>,
}

impl From<RegisterUserRequest> for UserRegistration {
	fn from(req: RegisterUserRequest) -> Self {
		UserRegistration {
			username: req.username,
			email: req.email,
			password: req.password,
		}
	}
}

/// A user as returned by the API. The password is never included.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct UserResponse {
	pub uuid: Uuid,
	pub username: String,
	pub email: String,
}

impl From<&User> for UserResponse {
	fn from(user: &User) -> Self {
		Self {
			uuid: user.id.into_inner(),
			username: user.username.clone(),
			email: user.email.clone(),
		}
	}
}

impl From<User> for UserResponse {
	fn from(user: User) -> Self {
		Self::from(&user)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn omitted_and_null_password_differ() {
		let omitted: RegisterUserRequest =
			serde_json::from_str(r#"{"username": "a", "email": "a@example.com"}"#).unwrap();
		assert!(omitted.password.is_none());

		let null: RegisterUserRequest =
			serde_json::from_str(r#"{"username": "a", "email": "a@example.com", "password": null}"#)
				.unwrap();
		assert!(matches!(null.password, Some(None)));

		let set: RegisterUserRequest =
			serde_json::from_str(r#"{"username": "a", "password": "pw"}"#).unwrap();
		assert_eq!(set.password.unwrap().unwrap().expose(), "pw");
	}

	#[test]
	fn debug_output_redacts_password() {
		let req: RegisterUserRequest =
			serde_json::from_str(r#"{"username": "a", "password": "hunter2"}"#).unwrap();
		assert!(!format!("{req:?}").contains("hunter2"));
	}

	#[test]
	fn response_omits_password() {
		let user = User::new("jdoe", "jdoe@example.com");
		let json = serde_json::to_value(UserResponse::from(&user)).unwrap();
		assert_eq!(json["username"], "jdoe");
		assert_eq!(json["uuid"], user.id.to_string());
		assert!(json.get("password").is_none());
	}
}
