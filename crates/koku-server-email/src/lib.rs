// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Email service for Koku account lifecycle messages.
//!
//! [`EmailService`] renders an [`EmailRequest`] through [`templates`] and hands
//! the result to an [`EmailTransport`]. The SMTP client is the production
//! transport; tests substitute a recording one.

pub mod templates;

use async_trait::async_trait;
use koku_server_smtp::{SmtpClient, SmtpError};
use std::sync::Arc;
use uuid::Uuid;

pub use templates::{render_email, RenderedEmail};

#[derive(Debug, thiserror::Error)]
pub enum EmailError {
	#[error("SMTP error: {0}")]
	Smtp(#[from] SmtpError),
}

pub type Result<T> = std::result::Result<T, EmailError>;

/// Anything that can deliver a rendered multipart message.
#[async_trait]
pub trait EmailTransport: Send + Sync {
	async fn send_email(
		&self,
		to: &str,
		subject: &str,
		body_html: &str,
		body_text: &str,
	) -> std::result::Result<(), SmtpError>;
}

#[async_trait]
impl EmailTransport for SmtpClient {
	async fn send_email(
		&self,
		to: &str,
		subject: &str,
		body_html: &str,
		body_text: &str,
	) -> std::result::Result<(), SmtpError> {
		SmtpClient::send_email(self, to, subject, body_html, body_text).await
	}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmailRequest {
	/// Sent once at registration; carries the reset token that lets the new
	/// user choose a password.
	NewUserLogin {
		username: String,
		user_uuid: Uuid,
		reset_token: Uuid,
	},
}

impl EmailRequest {
	fn kind(&self) -> &'static str {
		match self {
			EmailRequest::NewUserLogin { .. } => "new_user_login",
		}
	}
}

pub struct EmailService {
	transport: Arc<dyn EmailTransport>,
	base_url: String,
}

impl EmailService {
	/// `base_url` is the public origin links in emails point at.
	pub fn new(transport: Arc<dyn EmailTransport>, base_url: impl Into<String>) -> Self {
		let base_url = base_url.into();
		Self {
			transport,
			base_url: base_url.trim_end_matches('/').to_string(),
		}
	}

	pub fn base_url(&self) -> &str {
		&self.base_url
	}

	#[tracing::instrument(
		name = "email_service_send",
		skip(self, request),
		fields(to = %to, kind = request.kind())
	)]
	pub async fn send(&self, to: &str, request: EmailRequest) -> Result<()> {
		let rendered = render_email(&request, &self.base_url);

		self
			.transport
			.send_email(to, &rendered.subject, &rendered.html, &rendered.text)
			.await?;

		tracing::info!("email sent");
		Ok(())
	}

	pub async fn send_new_user_login(
		&self,
		username: &str,
		email: &str,
		user_uuid: Uuid,
		reset_token: Uuid,
	) -> Result<()> {
		self
			.send(
				email,
				EmailRequest::NewUserLogin {
					username: username.to_string(),
					user_uuid,
					reset_token,
				},
			)
			.await
	}
}
