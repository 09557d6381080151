// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! User registration and lookup handlers.

use axum::{
	extract::{Path, State},
	http::StatusCode,
	response::IntoResponse,
	Json,
};
use koku_server_api::{RegisterUserRequest, UserResponse};

use super::parse_user_id;
use crate::{api::AppState, error::ServerError, extract::ApiJson};

#[utoipa::path(
    post,
    path = "/api/v1/users",
    request_body = RegisterUserRequest,
    responses(
        (status = 201, description = "User registered", body = UserResponse),
        (status = 400, description = "Field validation errors"),
        (status = 502, description = "New user login email could not be sent")
    ),
    tag = "users"
)]
/// Register a user with default preferences and send the login email.
#[tracing::instrument(skip(state, body))]
pub async fn register_user(
	State(state): State<AppState>,
	ApiJson(body): ApiJson<RegisterUserRequest>,
) -> Result<impl IntoResponse, ServerError> {
	let user = state.provisioning.register_user(body.into()).await?;
	Ok((StatusCode::CREATED, Json(UserResponse::from(&user))))
}

#[utoipa::path(
    get,
    path = "/api/v1/users",
    responses(
        (status = 200, description = "All users ordered by username", body = Vec<UserResponse>)
    ),
    tag = "users"
)]
pub async fn list_users(State(state): State<AppState>) -> Result<impl IntoResponse, ServerError> {
	let users = state.provisioning.list_users().await?;
	Ok(Json(users.iter().map(UserResponse::from).collect::<Vec<_>>()))
}

#[utoipa::path(
    get,
    path = "/api/v1/users/{user_id}",
    params(
        ("user_id" = String, Path, description = "User UUID")
    ),
    responses(
        (status = 200, description = "The user", body = UserResponse),
        (status = 404, description = "No such user", body = koku_server_api::ErrorResponse)
    ),
    tag = "users"
)]
pub async fn get_user(
	State(state): State<AppState>,
	Path(user_id): Path<String>,
) -> Result<impl IntoResponse, ServerError> {
	let user_id = parse_user_id(&user_id)?;
	let user = state.provisioning.get_user(&user_id).await?;
	Ok(Json(UserResponse::from(&user)))
}
