// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Per-user preference handlers.

use axum::{
	extract::{Path, State},
	http::StatusCode,
	response::IntoResponse,
	Json,
};
use koku_server_api::{ErrorResponse, PreferenceRequest, UserPreferenceResponse};

use super::{parse_preference_id, parse_user_id};
use crate::{api::AppState, error::ServerError, extract::ApiJson};

#[utoipa::path(
    get,
    path = "/api/v1/users/{user_id}/preferences",
    params(
        ("user_id" = String, Path, description = "User UUID")
    ),
    responses(
        (status = 200, description = "The user's preferences ordered by name", body = Vec<UserPreferenceResponse>),
        (status = 404, description = "No such user", body = ErrorResponse)
    ),
    tag = "preferences"
)]
pub async fn list_preferences(
	State(state): State<AppState>,
	Path(user_id): Path<String>,
) -> Result<impl IntoResponse, ServerError> {
	let user_id = parse_user_id(&user_id)?;
	let user = state.provisioning.get_user(&user_id).await?;
	let preferences = state.provisioning.list_preferences(&user_id).await?;
	Ok(Json(
		preferences
			.iter()
			.map(|p| UserPreferenceResponse::new(p, &user))
			.collect::<Vec<_>>(),
	))
}

#[utoipa::path(
    post,
    path = "/api/v1/users/{user_id}/preferences",
    params(
        ("user_id" = String, Path, description = "User UUID")
    ),
    request_body = PreferenceRequest,
    responses(
        (status = 201, description = "Preference created", body = UserPreferenceResponse),
        (status = 400, description = "Field validation errors or an invalid catalog value"),
        (status = 404, description = "No such user", body = ErrorResponse)
    ),
    tag = "preferences"
)]
#[tracing::instrument(skip(state, body))]
pub async fn create_preference(
	State(state): State<AppState>,
	Path(user_id): Path<String>,
	ApiJson(body): ApiJson<PreferenceRequest>,
) -> Result<impl IntoResponse, ServerError> {
	let user_id = parse_user_id(&user_id)?;
	let user = state.provisioning.get_user(&user_id).await?;
	let preference = state
		.provisioning
		.create_preference(&user_id, body.into())
		.await?;
	Ok((
		StatusCode::CREATED,
		Json(UserPreferenceResponse::new(&preference, &user)),
	))
}

#[utoipa::path(
    get,
    path = "/api/v1/users/{user_id}/preferences/{preference_id}",
    params(
        ("user_id" = String, Path, description = "User UUID"),
        ("preference_id" = String, Path, description = "Preference UUID")
    ),
    responses(
        (status = 200, description = "The preference", body = UserPreferenceResponse),
        (status = 404, description = "No such user or preference", body = ErrorResponse)
    ),
    tag = "preferences"
)]
pub async fn get_preference(
	State(state): State<AppState>,
	Path((user_id, preference_id)): Path<(String, String)>,
) -> Result<impl IntoResponse, ServerError> {
	let user_id = parse_user_id(&user_id)?;
	let preference_id = parse_preference_id(&preference_id)?;
	let user = state.provisioning.get_user(&user_id).await?;
	let preference = state
		.provisioning
		.get_preference(&user_id, &preference_id)
		.await?;
	Ok(Json(UserPreferenceResponse::new(&preference, &user)))
}

#[utoipa::path(
    put,
    path = "/api/v1/users/{user_id}/preferences/{preference_id}",
    params(
        ("user_id" = String, Path, description = "User UUID"),
        ("preference_id" = String, Path, description = "Preference UUID")
    ),
    request_body = PreferenceRequest,
    responses(
        (status = 200, description = "Preference updated", body = UserPreferenceResponse),
        (status = 400, description = "Field validation errors or an invalid catalog value"),
        (status = 404, description = "No such user or preference", body = ErrorResponse)
    ),
    tag = "preferences"
)]
#[tracing::instrument(skip(state, body))]
pub async fn update_preference(
	State(state): State<AppState>,
	Path((user_id, preference_id)): Path<(String, String)>,
	ApiJson(body): ApiJson<PreferenceRequest>,
) -> Result<impl IntoResponse, ServerError> {
	let user_id = parse_user_id(&user_id)?;
	let preference_id = parse_preference_id(&preference_id)?;
	let user = state.provisioning.get_user(&user_id).await?;
	let preference = state
		.provisioning
		.update_preference(&user_id, &preference_id, body.into())
		.await?;
	Ok(Json(UserPreferenceResponse::new(&preference, &user)))
}

#[utoipa::path(
    delete,
    path = "/api/v1/users/{user_id}/preferences/{preference_id}",
    params(
        ("user_id" = String, Path, description = "User UUID"),
        ("preference_id" = String, Path, description = "Preference UUID")
    ),
    responses(
        (status = 204, description = "Preference deleted"),
        (status = 404, description = "No such preference", body = ErrorResponse)
    ),
    tag = "preferences"
)]
pub async fn delete_preference(
	State(state): State<AppState>,
	Path((user_id, preference_id)): Path<(String, String)>,
) -> Result<impl IntoResponse, ServerError> {
	let user_id = parse_user_id(&user_id)?;
	let preference_id = parse_preference_id(&preference_id)?;
	state
		.provisioning
		.delete_preference(&user_id, &preference_id)
		.await?;
	Ok(StatusCode::NO_CONTENT)
}
