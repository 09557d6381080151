// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use async_trait::async_trait;
use koku_server_email::{EmailError, EmailService};
use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct NotifyError(pub String);

impl From<EmailError> for NotifyError {
	fn from(e: EmailError) -> Self {
		NotifyError(e.to_string())
	}
}

/// Outbound messages triggered by account creation.
#[async_trait]
pub trait IamNotifier: Send + Sync {
	/// Tell a newly created user how to set their password.
	async fn new_user_login(
		&self,
		username: &str,
		email: &str,
		user_uuid: Uuid,
		reset_token: Uuid,
	) -> Result<(), NotifyError>;
}

#[async_trait]
impl IamNotifier for EmailService {
	async fn new_user_login(
		&self,
		username: &str,
		email: &str,
		user_uuid: Uuid,
		reset_token: Uuid,
	) -> Result<(), NotifyError> {
		self
			.send_new_user_login(username, email, user_uuid, reset_token)
			.await
			.map_err(NotifyError::from)
	}
}
