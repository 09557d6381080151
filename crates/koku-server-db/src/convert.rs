// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Parsing helpers for columns stored as TEXT.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::DbError;

pub(crate) fn parse_uuid(value: &str, column: &str) -> Result<Uuid, DbError> {
	Uuid::parse_str(value).map_err(|e| DbError::Internal(format!("Invalid {column}: {e}")))
}

pub(crate) fn parse_timestamp(value: &str, column: &str) -> Result<DateTime<Utc>, DbError> {
	DateTime::parse_from_rfc3339(value)
		.map(|dt| dt.with_timezone(&Utc))
		.map_err(|e| DbError::Internal(format!("Invalid {column}: {e}")))
}

pub(crate) fn parse_optional_timestamp(
	value: Option<String>,
	column: &str,
) -> Result<Option<DateTime<Utc>>, DbError> {
	value.map(|v| parse_timestamp(&v, column)).transpose()
}
