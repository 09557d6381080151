// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Operator views of customers, including schema names.

use axum::{
	extract::{Path, State},
	response::IntoResponse,
	Json,
};
use koku_server_api::{AdminCustomerResponse, ErrorResponse};

use super::parse_customer_id;
use crate::{api::AppState, error::ServerError};

#[utoipa::path(
    get,
    path = "/api/v1/admin/customers",
    responses(
        (status = 200, description = "All customers", body = Vec<AdminCustomerResponse>)
    ),
    tag = "admin"
)]
pub async fn list_customers(
	State(state): State<AppState>,
) -> Result<impl IntoResponse, ServerError> {
	let customers = state.provisioning.list_customers().await?;
	Ok(Json(
		customers
			.iter()
			.map(AdminCustomerResponse::from)
			.collect::<Vec<_>>(),
	))
}

#[utoipa::path(
    get,
    path = "/api/v1/admin/customers/{customer_id}",
    params(
        ("customer_id" = String, Path, description = "Customer UUID")
    ),
    responses(
        (status = 200, description = "The customer", body = AdminCustomerResponse),
        (status = 404, description = "No such customer", body = ErrorResponse)
    ),
    tag = "admin"
)]
pub async fn get_customer(
	State(state): State<AppState>,
	Path(customer_id): Path<String>,
) -> Result<impl IntoResponse, ServerError> {
	let customer_id = parse_customer_id(&customer_id)?;
	let customer = state.provisioning.get_customer(&customer_id).await?;
	Ok(Json(AdminCustomerResponse::from(&customer)))
}
