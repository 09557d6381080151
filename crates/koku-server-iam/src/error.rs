// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use thiserror::Error;

#[derive(Debug, Error)]
pub enum IamError {
	#[error("password hashing failed: {0}")]
	PasswordHash(String),

	#[error("invalid preference value: {0}")]
	InvalidPreference(String),

	#[error("invalid identifier: {0}")]
	InvalidId(#[from] uuid::Error),
}

pub type Result<T> = std::result::Result<T, IamError>;
