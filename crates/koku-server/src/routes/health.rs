// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Health check handler.

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use koku_server_api::{HealthResponse, HealthStatus};

use crate::{api::AppState, version::VERSION};

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Database reachable", body = HealthResponse),
        (status = 503, description = "Database unreachable", body = HealthResponse)
    ),
    tag = "health"
)]
/// GET /health - database ping plus SMTP presence.
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
	let database_ok = match koku_server_db::ping(&state.pool).await {
		Ok(()) => true,
		Err(e) => {
			tracing::error!(error = %e, "Database health check failed");
			false
		}
	};

	let status = HealthResponse::aggregate(database_ok, state.smtp_configured);
	let response = HealthResponse {
		status,
		version: VERSION.to_string(),
		database: if database_ok {
			HealthStatus::Healthy
		} else {
			HealthStatus::Unhealthy
		},
		smtp_configured: state.smtp_configured,
		timestamp: chrono::Utc::now().to_rfc3339(),
	};

	let http_status = match status {
		HealthStatus::Healthy | HealthStatus::Degraded => StatusCode::OK,
		HealthStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
	};

	(http_status, Json(response))
}
