// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! SMTP client used to deliver account emails.
//!
//! Messages are sent as multipart/alternative with a plain text and an HTML
//! part. The connection is opened lazily by [`lettre`] on first send, so
//! building a client never touches the network.
//!
//! ```no_run
//! use koku_server_smtp::{SmtpClient, SmtpConfig};
//!
//! # async fn example() -> Result<(), koku_server_smtp::SmtpError> {
//! let client = SmtpClient::new(SmtpConfig {
//!     host: "smtp.example.com".to_string(),
//!     port: 587,
//!     username: None,
//!     password: None,
//!     from_address: "noreply@example.com".to_string(),
//!     from_name: "Koku".to_string(),
//!     use_tls: true,
//! })?;
//! client
//!     .send_email("user@example.com", "Hello", "<p>Hello</p>", "Hello")
//!     .await?;
//! # Ok(())
//! # }
//! ```

use koku_common_secret::SecretString;
use lettre::{
	message::{header::ContentType, Mailbox, MultiPart, SinglePart},
	transport::smtp::authentication::Credentials,
	AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error)]
pub enum SmtpError {
	#[error("connection failed: {0}")]
	Connection(String),

	#[error("send failed: {0}")]
	Send(String),

	#[error("invalid configuration: {0}")]
	Config(String),

	#[error("invalid email address: {0}")]
	Address(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SmtpConfig {
	pub host: String,

	/// 25 (plain), 465 (implicit TLS) or 587 (STARTTLS).
	pub port: u16,

	pub username: Option<String>,

	pub password: Option<SecretString>,

	pub from_address: String,

	pub from_name: String,

	#[serde(default = "default_use_tls")]
	pub use_tls: bool,
}

fn default_use_tls() -> bool {
	true
}

impl SmtpConfig {
	/// `"Name <address>"` as a parsed mailbox.
	pub fn from_mailbox(&self) -> Result<Mailbox, SmtpError> {
		format!("{} <{}>", self.from_name, self.from_address)
			.parse()
			.map_err(|e| SmtpError::Address(format!("{e}")))
	}
}

pub struct SmtpClient {
	transport: AsyncSmtpTransport<Tokio1Executor>,
	from_mailbox: Mailbox,
}

impl SmtpClient {
	/// Build the transport. Credentials are only attached when both a
	/// username and a password are configured.
	///
	/// # Errors
	///
	/// [`SmtpError::Address`] for a bad sender address,
	/// [`SmtpError::Connection`] if the TLS relay cannot be set up.
	#[tracing::instrument(
		name = "smtp_client_new",
		skip(config),
		fields(host = %config.host, port = %config.port, use_tls = %config.use_tls)
	)]
	pub fn new(config: SmtpConfig) -> Result<Self, SmtpError> {
		if config.host.trim().is_empty() {
			return Err(SmtpError::Config("host must not be empty".into()));
		}
		let from_mailbox = config.from_mailbox()?;

		let builder = if config.use_tls {
			AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
				.map_err(|e| SmtpError::Connection(format!("{e}")))?
		} else {
			AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.host)
		};

		let mut builder = builder.port(config.port);

		if let (Some(username), Some(password)) = (&config.username, &config.password) {
			builder = builder.credentials(Credentials::new(
				username.clone(),
				password.expose().clone(),
			));
		}

		tracing::debug!("SMTP client initialized");

		Ok(Self {
			transport: builder.build(),
			from_mailbox,
		})
	}

	/// Open a connection and issue NOOP.
	#[tracing::instrument(name = "smtp_check_health", skip(self))]
	pub async fn check_health(&self) -> Result<(), SmtpError> {
		let ok = self
			.transport
			.test_connection()
			.await
			.map_err(|e| SmtpError::Connection(format!("{e}")))?;
		if !ok {
			return Err(SmtpError::Connection("server did not answer NOOP".into()));
		}
		Ok(())
	}

	#[tracing::instrument(
		name = "smtp_send_email",
		skip(self, body_html, body_text),
		fields(to = %to, subject = %subject)
	)]
	pub async fn send_email(
		&self,
		to: &str,
		subject: &str,
		body_html: &str,
		body_text: &str,
	) -> Result<(), SmtpError> {
		let message = build_message(&self.from_mailbox, to, subject, body_html, body_text)?;

		self
			.transport
			.send(message)
			.await
			.map_err(|e| SmtpError::Send(format!("{e}")))?;

		tracing::info!("email sent");
		Ok(())
	}
}

fn build_message(
	from: &Mailbox,
	to: &str,
	subject: &str,
	body_html: &str,
	body_text: &str,
) -> Result<Message, SmtpError> {
	let to_mailbox: Mailbox = to.parse().map_err(|e| SmtpError::Address(format!("{e}")))?;

	Message::builder()
		.from(from.clone())
		.to(to_mailbox)
		.subject(subject)
		.multipart(
			MultiPart::alternative()
				.singlepart(
					SinglePart::builder()
						.header(ContentType::TEXT_PLAIN)
						.body(body_text.to_string()),
				)
				.singlepart(
					SinglePart::builder()
						.header(ContentType::TEXT_HTML)
						.body(body_html.to_string()),
				),
		)
		.map_err(|e| SmtpError::Send(format!("failed to build message: {e}")))
}
