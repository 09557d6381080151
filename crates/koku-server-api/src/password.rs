// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use koku_common_secret::SecretString;
use koku_server_provisioning::PasswordChange;
use serde::Deserialize;

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

/// Body of `POST /api/v1/password-change`.
#[derive(Debug, Clone, Default, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct PasswordChangeRequest {
	/// The reset token from the new user login email.
	pub token: Option<String>,
	#[serde(default, deserialize_with = "crate::serde_util::double_option")]
	#[cfg_attr(feature = "openapi", schema(value_type = String, format = Password))]
	pub password: Option<Option<SecretString>>,
}

impl From<PasswordChangeRequest> for PasswordChange {
	fn from(req: PasswordChangeRequest) -> Self {
		PasswordChange {
			token: req.token,
			password: req.password,
		}
	}
}
