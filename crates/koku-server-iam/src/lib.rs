// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Identity and access management domain for Koku.
//!
//! This crate holds the entities and the pure validation rules behind user
//! registration and tenant provisioning:
//!
//! - [`user`]: users and username/email rules
//! - [`customer`]: tenants and schema name derivation
//! - [`preference`]: per-user locale, currency and timezone preferences
//! - [`catalog`]: the valid value sets preferences are checked against
//! - [`reset_token`]: single-use password reset tokens
//! - [`password`]: argon2 hashing and temporary password generation
//! - [`validation`]: field error collection in the REST error shape
//!
//! Persistence lives in `koku-server-db`; multi-step flows live in
//! `koku-server-provisioning`.

mod argon2_config;
pub mod catalog;
pub mod customer;
pub mod error;
pub mod password;
pub mod preference;
pub mod reset_token;
pub mod types;
pub mod user;
pub mod validation;

pub use customer::{create_schema_name, validate_customer_name, validate_schema_name, Customer};
pub use error::{IamError, Result};
pub use password::{generate_temporary_password, hash_password, verify_password};
pub use preference::{
	preference_value, validate_preference, PreferenceDefaults, PreferenceKind, UserPreference,
	DEFAULT_PREFERENCE_DESCRIPTION,
};
pub use reset_token::{
	hash_reset_token, ResetToken, ResetTokenPolicy, DEFAULT_RESET_TOKEN_TTL_HOURS,
};
pub use types::{CustomerId, PreferenceId, ResetTokenId, UserId};
pub use user::{normalize_email, validate_email, validate_username, User};
pub use validation::{messages, ValidationErrors};

pub use koku_common_secret::SecretString;
