// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Customer provisioning handlers.

use axum::{
	extract::{Path, State},
	http::StatusCode,
	response::IntoResponse,
	Json,
};
use koku_server_api::{CreateCustomerRequest, CustomerResponse, ErrorResponse, UserResponse};

use super::parse_customer_id;
use crate::{api::AppState, error::ServerError, extract::ApiJson};

#[utoipa::path(
    post,
    path = "/api/v1/customers",
    request_body = CreateCustomerRequest,
    responses(
        (status = 201, description = "Customer and owner created", body = CustomerResponse),
        (status = 400, description = "Field validation errors, owner errors nested under owner"),
        (status = 502, description = "New user login email could not be sent")
    ),
    tag = "customers"
)]
/// Provision a customer together with its owner account.
#[tracing::instrument(skip(state, body))]
pub async fn create_customer(
	State(state): State<AppState>,
	ApiJson(body): ApiJson<CreateCustomerRequest>,
) -> Result<impl IntoResponse, ServerError> {
	let provisioned = state.provisioning.provision_customer(body.into()).await?;
	Ok((StatusCode::CREATED, Json(CustomerResponse::from(&provisioned))))
}

#[utoipa::path(
    get,
    path = "/api/v1/customers/{customer_id}",
    params(
        ("customer_id" = String, Path, description = "Customer UUID")
    ),
    responses(
        (status = 200, description = "The customer", body = CustomerResponse),
        (status = 404, description = "No such customer", body = ErrorResponse)
    ),
    tag = "customers"
)]
pub async fn get_customer(
	State(state): State<AppState>,
	Path(customer_id): Path<String>,
) -> Result<impl IntoResponse, ServerError> {
	let customer_id = parse_customer_id(&customer_id)?;
	let customer = state.provisioning.get_customer(&customer_id).await?;
	Ok(Json(CustomerResponse::from(&customer)))
}

#[utoipa::path(
    get,
    path = "/api/v1/customers/{customer_id}/users",
    params(
        ("customer_id" = String, Path, description = "Customer UUID")
    ),
    responses(
        (status = 200, description = "Members of the customer's group", body = Vec<UserResponse>),
        (status = 404, description = "No such customer", body = ErrorResponse)
    ),
    tag = "customers"
)]
pub async fn list_customer_users(
	State(state): State<AppState>,
	Path(customer_id): Path<String>,
) -> Result<impl IntoResponse, ServerError> {
	let customer_id = parse_customer_id(&customer_id)?;
	let users = state.provisioning.users_for_customer(&customer_id).await?;
	Ok(Json(users.iter().map(UserResponse::from).collect::<Vec<_>>()))
}
