// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! # koku-server-db
//!
//! SQLite persistence for the Koku IAM server.
//!
//! ## Repository Pattern
//!
//! Each entity has a `*Store` trait (the interface the provisioning service
//! depends on) and a `*Repository` holding a `SqlitePool` that implements it
//! by delegating to inherent methods.
//!
//! Writes that span several tables go through [`IamTransaction`] instead, so
//! that a user, its defaults and its reset token either all land or none do.
//!
//! ## Conventions
//!
//! - IDs are UUID strings; timestamps are RFC 3339 strings.
//! - Lookups return `Result<Option<T>>`; `NotFound` is for updates by ID.
//! - UNIQUE violations on insert surface as `DbError::Conflict`.

mod convert;
pub mod customer;
pub mod error;
pub mod migrations;
pub mod pool;
pub mod preference;
pub mod reset_token;
pub mod transaction;
pub mod user;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use customer::{CustomerRepository, CustomerStore};
pub use error::{DbError, Result};
pub use migrations::run_migrations;
pub use pool::{create_pool, ping};
pub use preference::{PreferenceRepository, PreferenceStore};
pub use reset_token::{ResetTokenRepository, ResetTokenStore};
pub use transaction::IamTransaction;
pub use user::{UserRepository, UserStore};

pub use sqlx::sqlite::SqlitePool;
