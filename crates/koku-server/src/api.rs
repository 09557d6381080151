// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Application state and route table.

use std::sync::Arc;

use axum::{
	routing::{get, post},
	Json, Router,
};
use koku_server_config::{ServerConfig, SmtpConfig};
use koku_server_db::SqlitePool;
use koku_server_email::{EmailService, EmailTransport};
use koku_server_provisioning::{IamNotifier, ProvisioningService};
use koku_server_smtp::SmtpClient;
use utoipa::OpenApi;

use crate::api_docs::ApiDoc;
use crate::routes;

#[derive(Clone)]
pub struct AppState {
	pub pool: SqlitePool,
	pub provisioning: Arc<ProvisioningService>,
	pub smtp_configured: bool,
	pub base_url: String,
}

/// Build state from configuration.
///
/// A broken SMTP configuration is logged and the server runs without a
/// notifier rather than refusing to start.
pub fn create_app_state(pool: SqlitePool, config: &ServerConfig) -> AppState {
	let transport = config.smtp.as_ref().and_then(build_smtp_transport);
	let notifier: Option<Arc<dyn IamNotifier>> = transport.map(|transport| {
		Arc::new(EmailService::new(transport, config.http.base_url.clone()))
			as Arc<dyn IamNotifier>
	});

	create_app_state_with_notifier(pool, config, notifier)
}

/// Build state with an explicit notifier.
pub fn create_app_state_with_notifier(
	pool: SqlitePool,
	config: &ServerConfig,
	notifier: Option<Arc<dyn IamNotifier>>,
) -> AppState {
	let smtp_configured = notifier.is_some();
	let provisioning = ProvisioningService::new(pool.clone(), notifier)
		.with_preference_defaults(config.preferences.defaults.clone())
		.with_reset_token_policy(config.auth.reset_token_policy());

	AppState {
		pool,
		provisioning: Arc::new(provisioning),
		smtp_configured,
		base_url: config.http.base_url.clone(),
	}
}

fn build_smtp_transport(config: &SmtpConfig) -> Option<Arc<dyn EmailTransport>> {
	let client_config = koku_server_smtp::SmtpConfig {
		host: config.host.clone(),
		port: config.port,
		username: config.username.clone(),
		password: config.password.clone(),
		from_address: config.from_address.clone(),
		from_name: config.from_name.clone(),
		use_tls: config.use_tls,
	};

	match SmtpClient::new(client_config) {
		Ok(client) => {
			tracing::info!(host = %config.host, port = config.port, "SMTP client configured");
			Some(Arc::new(client))
		}
		Err(e) => {
			tracing::error!(error = %e, "Failed to initialize SMTP client");
			tracing::warn!("Continuing without new user login emails");
			None
		}
	}
}

pub fn create_router(state: AppState) -> Router {
	Router::new()
		.route("/health", get(routes::health::health_check))
		.route("/api/openapi.json", get(|| async { Json(ApiDoc::openapi()) }))
		.route(
			"/api/v1/users",
			get(routes::users::list_users).post(routes::users::register_user),
		)
		.route("/api/v1/users/{user_id}", get(routes::users::get_user))
		.route(
			"/api/v1/users/{user_id}/preferences",
			get(routes::preferences::list_preferences).post(routes::preferences::create_preference),
		)
		.route(
			"/api/v1/users/{user_id}/preferences/{preference_id}",
			get(routes::preferences::get_preference)
				.put(routes::preferences::update_preference)
				.delete(routes::preferences::delete_preference),
		)
		.route("/api/v1/customers", post(routes::customers::create_customer))
		.route(
			"/api/v1/customers/{customer_id}",
			get(routes::customers::get_customer),
		)
		.route(
			"/api/v1/customers/{customer_id}/users",
			get(routes::customers::list_customer_users),
		)
		.route(
			"/api/v1/admin/customers",
			get(routes::admin::list_customers),
		)
		.route(
			"/api/v1/admin/customers/{customer_id}",
			get(routes::admin::get_customer),
		)
		.route(
			"/api/v1/password-change",
			post(routes::password::change_password),
		)
		.with_state(state)
}
