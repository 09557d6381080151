// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use koku_server_db::DbError;
use koku_server_iam::{IamError, ValidationErrors};

#[derive(Debug, thiserror::Error)]
pub enum ProvisioningError {
	#[error("validation failed: {0}")]
	Validation(ValidationErrors),

	#[error("user not found")]
	UserNotFound,

	#[error("customer not found")]
	CustomerNotFound,

	#[error("preference not found")]
	PreferenceNotFound,

	#[error("notification failed: {0}")]
	Notification(String),

	#[error(transparent)]
	Database(#[from] DbError),

	#[error(transparent)]
	Iam(#[from] IamError),
}

impl From<ValidationErrors> for ProvisioningError {
	fn from(errors: ValidationErrors) -> Self {
		ProvisioningError::Validation(errors)
	}
}

impl ProvisioningError {
	/// HTTP status this error should be reported with.
	pub fn status_code(&self) -> u16 {
		match self {
			ProvisioningError::Validation(_) => 400,
			ProvisioningError::UserNotFound
			| ProvisioningError::CustomerNotFound
			| ProvisioningError::PreferenceNotFound => 404,
			ProvisioningError::Database(DbError::NotFound(_)) => 404,
			ProvisioningError::Database(DbError::Conflict(_)) => 409,
			ProvisioningError::Notification(_) => 502,
			ProvisioningError::Database(_) | ProvisioningError::Iam(_) => 500,
		}
	}

	/// True for failures whose details should not reach the client.
	pub fn is_internal(&self) -> bool {
		self.status_code() >= 500 && !matches!(self, ProvisioningError::Notification(_))
	}
}

pub type Result<T> = std::result::Result<T, ProvisioningError>;

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn status_codes() {
		let validation = ValidationErrors::single("email", "bad");
		assert_eq!(ProvisioningError::from(validation).status_code(), 400);
		assert_eq!(ProvisioningError::UserNotFound.status_code(), 404);
		assert_eq!(ProvisioningError::PreferenceNotFound.status_code(), 404);
		assert_eq!(
			ProvisioningError::Database(DbError::Conflict("dup".into())).status_code(),
			409
		);
		assert_eq!(
			ProvisioningError::Notification("smtp down".into()).status_code(),
			502
		);
		assert_eq!(
			ProvisioningError::Database(DbError::Internal("x".into())).status_code(),
			500
		);
	}

	#[test]
	fn notification_is_not_internal() {
		assert!(!ProvisioningError::Notification("x".into()).is_internal());
		assert!(ProvisioningError::Iam(IamError::PasswordHash("x".into())).is_internal());
		assert!(!ProvisioningError::CustomerNotFound.is_internal());
	}
}
