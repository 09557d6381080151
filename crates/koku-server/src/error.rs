// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Mapping of service failures onto HTTP responses.

use axum::{
	extract::rejection::JsonRejection,
	http::StatusCode,
	response::{IntoResponse, Response},
	Json,
};
use koku_server_api::ErrorResponse;
use koku_server_provisioning::ProvisioningError;

#[derive(Debug, thiserror::Error)]
pub enum ServerError {
	#[error(transparent)]
	Provisioning(#[from] ProvisioningError),

	#[error("{0}")]
	NotFound(String),

	#[error("{0}")]
	BadRequest(String),
}

impl From<JsonRejection> for ServerError {
	fn from(rejection: JsonRejection) -> Self {
		ServerError::BadRequest(rejection.body_text())
	}
}

impl IntoResponse for ServerError {
	fn into_response(self) -> Response {
		match self {
			ServerError::Provisioning(ProvisioningError::Validation(errors)) => {
				(StatusCode::BAD_REQUEST, Json(errors.to_json())).into_response()
			}
			ServerError::Provisioning(e) => {
				let status = StatusCode::from_u16(e.status_code())
					.unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
				let body = if e.is_internal() {
					tracing::error!(error = %e, "request failed");
					ErrorResponse::new("internal_error", "An internal error occurred.")
				} else {
					ErrorResponse::new(error_code(status), e.to_string())
				};
				(status, Json(body)).into_response()
			}
			ServerError::NotFound(message) => (
				StatusCode::NOT_FOUND,
				Json(ErrorResponse::not_found(message)),
			)
				.into_response(),
			ServerError::BadRequest(message) => (
				StatusCode::BAD_REQUEST,
				Json(ErrorResponse::new("bad_request", message)),
			)
				.into_response(),
		}
	}
}

fn error_code(status: StatusCode) -> &'static str {
	match status {
		StatusCode::NOT_FOUND => "not_found",
		StatusCode::CONFLICT => "conflict",
		StatusCode::BAD_GATEWAY => "notification_failed",
		StatusCode::BAD_REQUEST => "bad_request",
		_ => "internal_error",
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use koku_server_db::DbError;
	use koku_server_iam::ValidationErrors;

	#[test]
	fn validation_maps_to_bad_request() {
		let err = ServerError::from(ProvisioningError::Validation(ValidationErrors::single(
			"email", "bad",
		)));
		assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
	}

	#[test]
	fn statuses_follow_provisioning_errors() {
		let cases = [
			(ProvisioningError::UserNotFound, StatusCode::NOT_FOUND),
			(
				ProvisioningError::Database(DbError::Conflict("user already exists".into())),
				StatusCode::CONFLICT,
			),
			(
				ProvisioningError::Notification("smtp down".into()),
				StatusCode::BAD_GATEWAY,
			),
			(
				ProvisioningError::Database(DbError::Internal("boom".into())),
				StatusCode::INTERNAL_SERVER_ERROR,
			),
		];
		for (err, expected) in cases {
			assert_eq!(ServerError::from(err).into_response().status(), expected);
		}
	}
}
