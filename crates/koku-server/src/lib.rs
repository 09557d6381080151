// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Koku identity and access management server.
//!
//! Serves user registration, customer provisioning, preferences and password
//! reset over a JSON API backed by SQLite.

pub mod api;
pub mod api_docs;
pub mod error;
pub mod extract;
pub mod routes;
pub mod version;

pub use api::{create_app_state, create_app_state_with_notifier, create_router, AppState};
pub use api_docs::ApiDoc;
pub use error::ServerError;
pub use koku_server_config::ServerConfig;
