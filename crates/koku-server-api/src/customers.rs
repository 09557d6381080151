// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use chrono::{DateTime, Utc};
use koku_server_provisioning::{CustomerRegistration, CustomerWithOwner};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

use crate::users::{RegisterUserRequest, UserResponse};

/// Body of `POST /api/v1/customers`.
#[derive(Debug, Clone, Default, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct CreateCustomerRequest {
	pub name: Option<String>,
	pub owner: Option<RegisterUserRequest>,
}

impl From<CreateCustomerRequest> for CustomerRegistration {
	fn from(req: CreateCustomerRequest) -> Self {
		CustomerRegistration {
			name: req.name,
			owner: req.owner.map(Into::into),
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct CustomerResponse {
	pub uuid: Uuid,
	pub name: String,
	pub owner: UserResponse,
	pub date_created: DateTime<Utc>,
}

impl From<&CustomerWithOwner> for CustomerResponse {
	fn from(value: &CustomerWithOwner) -> Self {
		Self {
			uuid: value.customer.id.into_inner(),
			name: value.customer.name.clone(),
			owner: UserResponse::from(&value.owner),
			date_created: value.customer.date_created,
		}
	}
}

/// Customer view for operators; adds the tenant schema name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct AdminCustomerResponse {
	pub uuid: Uuid,
	pub name: String,
	pub owner: UserResponse,
	pub date_created: DateTime<Utc>,
	pub schema_name: String,
}

impl From<&CustomerWithOwner> for AdminCustomerResponse {
	fn from(value: &CustomerWithOwner) -> Self {
		Self {
			uuid: value.customer.id.into_inner(),
			name: value.customer.name.clone(),
			owner: UserResponse::from(&value.owner),
			date_created: value.customer.date_created,
			schema_name: value.customer.schema_name.clone(),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use koku_server_iam::{Customer, User};

	fn sample() -> CustomerWithOwner {
		let owner = User::new("owner", "owner@acme.com");
		let customer = Customer::new("Acme Corp", owner.id);
		CustomerWithOwner { customer, owner }
	}

	#[test]
	fn public_view_hides_schema_name() {
		let json = serde_json::to_value(CustomerResponse::from(&sample())).unwrap();
		assert!(json.get("schema_name").is_none());
		assert_eq!(json["owner"]["username"], "owner");
	}

	#[test]
	fn admin_view_includes_schema_name() {
		let json = serde_json::to_value(AdminCustomerResponse::from(&sample())).unwrap();
		assert_eq!(json["schema_name"], "acmecorp");
	}

	#[test]
	fn nested_owner_converts() {
		let req: CreateCustomerRequest = serde_json::from_str(
			r#"{"name": "Acme", "owner": {"username": "o", "email": "o@acme.com", "password": null}}"#,
		)
		.unwrap();
		let registration = CustomerRegistration::from(req);
		let owner = registration.owner.unwrap();
		assert_eq!(owner.username.as_deref(), Some("o"));
		assert!(matches!(owner.password, Some(None)));
	}
}
