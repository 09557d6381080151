// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use axum::{extract::State, http::StatusCode, response::IntoResponse};
use koku_server_api::PasswordChangeRequest;

use crate::{api::AppState, error::ServerError, extract::ApiJson};

#[utoipa::path(
    post,
    path = "/api/v1/password-change",
    request_body = PasswordChangeRequest,
    responses(
        (status = 204, description = "Password changed and token consumed"),
        (status = 400, description = "Missing fields, or an invalid or expired reset token")
    ),
    tag = "users"
)]
/// Set a new password with the reset token from the login email.
#[tracing::instrument(skip(state, body))]
pub async fn change_password(
	State(state): State<AppState>,
	ApiJson(body): ApiJson<PasswordChangeRequest>,
) -> Result<impl IntoResponse, ServerError> {
	state.provisioning.change_password(body.into()).await?;
	Ok(StatusCode::NO_CONTENT)
}
