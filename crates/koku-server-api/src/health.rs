// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use serde::{Deserialize, Serialize};

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
	Healthy,
	Degraded,
	Unhealthy,
}

/// Body of `GET /health`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct HealthResponse {
	pub status: HealthStatus,
	pub version: String,
	pub database: HealthStatus,
	/// SMTP presence only; no connection is attempted.
	pub smtp_configured: bool,
	pub timestamp: String,
}

impl HealthResponse {
	/// Healthy only with a reachable database. Missing SMTP degrades, since
	/// registrations then go out without a login email.
	pub fn aggregate(database_ok: bool, smtp_configured: bool) -> HealthStatus {
		match (database_ok, smtp_configured) {
			(false, _) => HealthStatus::Unhealthy,
			(true, false) => HealthStatus::Degraded,
			(true, true) => HealthStatus::Healthy,
		}
	}
}
