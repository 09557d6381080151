// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Schema migrations.
//!
//! Migrations are plain SQL files applied statement by statement on every
//! startup. Re-running one is harmless: tables and indexes use
//! `IF NOT EXISTS`, and column additions that already happened are skipped.

use sqlx::sqlite::SqlitePool;

use crate::error::DbError;

const MIGRATIONS: &[(&str, &str)] = &[
	("001_users", include_str!("../migrations/001_users.sql")),
	("002_customers", include_str!("../migrations/002_customers.sql")),
	(
		"003_user_preferences",
		include_str!("../migrations/003_user_preferences.sql"),
	),
	(
		"004_preference_name_description",
		include_str!("../migrations/004_preference_name_description.sql"),
	),
	("005_reset_tokens", include_str!("../migrations/005_reset_tokens.sql")),
	(
		"006_preference_name_unique",
		include_str!("../migrations/006_preference_name_unique.sql"),
	),
];

/// Run all database migrations (001-006).
///
/// # Errors
/// Returns `DbError::Sqlx` for any failure other than an object that already
/// exists.
#[tracing::instrument(skip(pool))]
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), DbError> {
	for (name, sql) in MIGRATIONS {
		for stmt in sql.split(';').filter(|s| !s.trim().is_empty()) {
			if let Err(e) = sqlx::query(stmt).execute(pool).await {
				let msg = e.to_string();
				if !msg.contains("duplicate column") && !msg.contains("already exists") {
					tracing::error!(migration = %name, error = %e, "migration failed");
					return Err(e.into());
				}
			}
		}
		tracing::debug!(migration = %name, "migration applied");
	}

	tracing::info!(count = MIGRATIONS.len(), "database migrations complete");
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::testing::create_test_pool;
	use sqlx::Row;

	#[tokio::test]
	async fn migrations_are_idempotent() {
		let pool = create_test_pool().await;
		run_migrations(&pool).await.unwrap();
		run_migrations(&pool).await.unwrap();
	}

	#[tokio::test]
	async fn preference_table_gains_name_and_description() {
		let pool = create_test_pool().await;
		let columns: Vec<String> = sqlx::query("PRAGMA table_info(user_preferences)")
			.fetch_all(&pool)
			.await
			.unwrap()
			.iter()
			.map(|row| row.get::<String, _>("name"))
			.collect();

		assert!(columns.contains(&"name".to_string()));
		assert!(columns.contains(&"description".to_string()));
	}

	#[tokio::test]
	async fn preference_names_are_unique_per_user() {
		let pool = create_test_pool().await;
		let unique: i64 = sqlx::query(
			"SELECT \"unique\" FROM pragma_index_list('user_preferences') WHERE name = 'idx_user_preferences_user_name_unique'",
		)
		.fetch_one(&pool)
		.await
		.unwrap()
		.get(0);
		assert_eq!(unique, 1);
	}
}
