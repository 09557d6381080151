// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use koku_server_iam::{ResetTokenPolicy, DEFAULT_RESET_TOKEN_TTL_HOURS};
use serde::Deserialize;

#[derive(Debug, Clone)]
pub struct AuthConfig {
	pub reset_token_ttl_hours: i64,
}

impl Default for AuthConfig {
	fn default() -> Self {
		Self {
			reset_token_ttl_hours: DEFAULT_RESET_TOKEN_TTL_HOURS,
		}
	}
}

impl AuthConfig {
	pub fn reset_token_policy(&self) -> ResetTokenPolicy {
		ResetTokenPolicy::from_hours(self.reset_token_ttl_hours)
	}
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuthConfigLayer {
	pub reset_token_ttl_hours: Option<i64>,
}

impl AuthConfigLayer {
	pub fn merge(&mut self, other: AuthConfigLayer) {
		if other.reset_token_ttl_hours.is_some() {
			self.reset_token_ttl_hours = other.reset_token_ttl_hours;
		}
	}

	pub fn finalize(self) -> AuthConfig {
		AuthConfig {
			reset_token_ttl_hours: self
				.reset_token_ttl_hours
				.unwrap_or(DEFAULT_RESET_TOKEN_TTL_HOURS),
		}
	}
}
