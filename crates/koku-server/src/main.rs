// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Koku IAM server binary.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use koku_server::{create_app_state, create_router, version};
use koku_server_config::LogFormat;
use tower_http::{
	cors::{Any, CorsLayer},
	trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Koku server - user registration and tenant provisioning.
#[derive(Parser, Debug)]
#[command(name = "koku-server", about = "Koku IAM server", version)]
struct Args {
	/// Path to a TOML config file
	#[arg(long, env = "KOKU_SERVER_CONFIG")]
	config: Option<PathBuf>,

	#[command(subcommand)]
	command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
	/// Show version and build information
	Version,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
	let args = Args::parse();

	if let Some(Command::Version) = args.command {
		println!("{}", version::format_version_info());
		return Ok(());
	}

	dotenvy::dotenv().ok();

	let config = match &args.config {
		Some(path) => koku_server_config::load_config_with_file(path)?,
		None => koku_server_config::load_config()?,
	};

	let (pretty, json) = match config.logging.format {
		LogFormat::Pretty => (Some(tracing_subscriber::fmt::layer()), None),
		LogFormat::Json => (None, Some(tracing_subscriber::fmt::layer().json())),
	};
	tracing_subscriber::registry()
		.with(
			tracing_subscriber::EnvFilter::try_from_default_env()
				.unwrap_or_else(|_| config.logging.level.clone().into()),
		)
		.with(pretty)
		.with(json)
		.init();

	tracing::info!(
		host = %config.http.host,
		port = config.http.port,
		database = %config.database.url,
		smtp = config.smtp.is_some(),
		"starting koku-server"
	);

	let pool = koku_server_db::create_pool(&config.database.url).await?;
	koku_server_db::run_migrations(&pool).await?;

	let state = create_app_state(pool, &config);
	if !state.smtp_configured {
		tracing::warn!("SMTP is not configured; new user login emails will not be sent");
	}

	match state.provisioning.purge_expired_reset_tokens().await {
		Ok(0) => {}
		Ok(purged) => tracing::info!(purged, "removed expired reset tokens"),
		Err(e) => tracing::warn!(error = %e, "Failed to purge expired reset tokens"),
	}

	let app = create_router(state)
		.layer(TraceLayer::new_for_http())
		.layer(
			CorsLayer::new()
				.allow_origin(Any)
				.allow_methods(Any)
				.allow_headers(Any),
		);

	let addr = config.socket_addr();
	tracing::info!("listening on {}", addr);

	let listener = tokio::net::TcpListener::bind(&addr).await?;

	tokio::select! {
		result = axum::serve(listener, app) => {
			if let Err(e) = result {
				tracing::error!(error = %e, "Server error");
			}
		}
		_ = tokio::signal::ctrl_c() => {
			tracing::info!("Received shutdown signal");
		}
	}

	tracing::info!("Server shutdown complete");
	Ok(())
}
