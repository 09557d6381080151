// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use koku_server_iam::{User, UserPreference};
use koku_server_provisioning::PreferenceInput;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

use crate::users::UserResponse;

/// Body of preference create and update requests.
#[derive(Debug, Clone, Default, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct PreferenceRequest {
	#[serde(default, deserialize_with = "crate::serde_util::double_option")]
	#[cfg_attr(feature = "openapi", schema(value_type = Option<String>))]
	pub name: Option<Option<String>>,
	#[serde(default, deserialize_with = "crate::serde_util::double_option")]
	#[cfg_attr(feature = "openapi", schema(value_type = Option<String>))]
	pub description: Option<Option<String>>,
	#[cfg_attr(feature = "openapi", schema(value_type = Object))]
	pub preference: Option<Value>,
}

impl From<PreferenceRequest> for PreferenceInput {
	fn from(req: PreferenceRequest) -> Self {
		PreferenceInput {
			name: req.name,
			description: req.description,
			preference: req.preference,
		}
	}
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct UserPreferenceResponse {
	pub uuid: Uuid,
	pub name: String,
	pub description: Option<String>,
	#[cfg_attr(feature = "openapi", schema(value_type = Object))]
	pub preference: Value,
	pub user: UserResponse,
}

impl UserPreferenceResponse {
	pub fn new(preference: &UserPreference, user: &User) -> Self {
		Self {
			uuid: preference.id.into_inner(),
			name: preference.name.clone(),
			description: preference.description.clone(),
			preference: preference.preference.clone(),
			user: UserResponse::from(user),
		}
	}
}
