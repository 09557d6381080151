// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Password reset token repository. Tokens are looked up by SHA-256 hash.

use async_trait::async_trait;
use chrono::Utc;
use koku_server_iam::{ResetToken, ResetTokenId, UserId};
use sqlx::{
	sqlite::{SqliteConnection, SqlitePool, SqliteRow},
	Row,
};

use crate::convert::{parse_optional_timestamp, parse_timestamp, parse_uuid};
use crate::error::DbError;

#[async_trait]
pub trait ResetTokenStore: Send + Sync {
	async fn create_token(&self, token: &ResetToken) -> Result<(), DbError>;
	async fn get_token_by_hash(&self, token_hash: &str) -> Result<Option<ResetToken>, DbError>;
	async fn list_tokens_for_user(&self, user_id: &UserId) -> Result<Vec<ResetToken>, DbError>;
	async fn mark_used(&self, id: &ResetTokenId) -> Result<bool, DbError>;
	async fn delete_expired(&self) -> Result<u64, DbError>;
}

#[derive(Clone)]
pub struct ResetTokenRepository {
	pool: SqlitePool,
}

impl ResetTokenRepository {
	pub fn new(pool: SqlitePool) -> Self {
		Self { pool }
	}

	#[tracing::instrument(skip(self, token), fields(token_id = %token.id, user_id = %token.user_id))]
	pub async fn create_token(&self, token: &ResetToken) -> Result<(), DbError> {
		let mut conn = self.pool.acquire().await?;
		insert_reset_token(&mut conn, token).await
	}

	#[tracing::instrument(skip(self, token_hash))]
	pub async fn get_token_by_hash(&self, token_hash: &str) -> Result<Option<ResetToken>, DbError> {
		let row = sqlx::query(
			r#"
			SELECT id, user_id, token_hash, created_at, expires_at, used_at
			FROM reset_tokens
			WHERE token_hash = ?
			"#,
		)
		.bind(token_hash)
		.fetch_optional(&self.pool)
		.await?;

		row.as_ref().map(row_to_token).transpose()
	}

	#[tracing::instrument(skip(self), fields(user_id = %user_id))]
	pub async fn list_tokens_for_user(&self, user_id: &UserId) -> Result<Vec<ResetToken>, DbError> {
		let rows = sqlx::query(
			r#"
			SELECT id, user_id, token_hash, created_at, expires_at, used_at
			FROM reset_tokens
			WHERE user_id = ?
			ORDER BY created_at DESC
			"#,
		)
		.bind(user_id.to_string())
		.fetch_all(&self.pool)
		.await?;

		rows.iter().map(row_to_token).collect()
	}

	/// Returns false if the token was already used or does not exist.
	#[tracing::instrument(skip(self), fields(token_id = %id))]
	pub async fn mark_used(&self, id: &ResetTokenId) -> Result<bool, DbError> {
		let mut conn = self.pool.acquire().await?;
		consume_reset_token(&mut conn, id).await
	}

	/// Remove tokens past their expiry, used or not.
	#[tracing::instrument(skip(self))]
	pub async fn delete_expired(&self) -> Result<u64, DbError> {
		let result = sqlx::query("DELETE FROM reset_tokens WHERE expires_at < ?")
			.bind(Utc::now().to_rfc3339())
			.execute(&self.pool)
			.await?;

		let deleted = result.rows_affected();
		if deleted > 0 {
			tracing::info!(deleted, "expired reset tokens removed");
		}
		Ok(deleted)
	}
}

#[async_trait]
impl ResetTokenStore for ResetTokenRepository {
	async fn create_token(&self, token: &ResetToken) -> Result<(), DbError> {
		self.create_token(token).await
	}

	async fn get_token_by_hash(&self, token_hash: &str) -> Result<Option<ResetToken>, DbError> {
		self.get_token_by_hash(token_hash).await
	}

	async fn list_tokens_for_user(&self, user_id: &UserId) -> Result<Vec<ResetToken>, DbError> {
		self.list_tokens_for_user(user_id).await
	}

	async fn mark_used(&self, id: &ResetTokenId) -> Result<bool, DbError> {
		self.mark_used(id).await
	}

	async fn delete_expired(&self) -> Result<u64, DbError> {
		self.delete_expired().await
	}
}

pub(crate) async fn insert_reset_token(
	conn: &mut SqliteConnection,
	token: &ResetToken,
) -> Result<(), DbError> {
	sqlx::query(
		r#"
		INSERT INTO reset_tokens (id, user_id, token_hash, created_at, expires_at, used_at)
		VALUES (?, ?, ?, ?, ?, ?)
		"#,
	)
	.bind(token.id.to_string())
	.bind(token.user_id.to_string())
	.bind(&token.token_hash)
	.bind(token.created_at.to_rfc3339())
	.bind(token.expires_at.to_rfc3339())
	.bind(token.used_at.map(|t| t.to_rfc3339()))
	.execute(&mut *conn)
	.await
	.map_err(|e| DbError::from_insert(e, "reset token"))?;

	tracing::debug!(token_id = %token.id, "reset token created");
	Ok(())
}

pub(crate) async fn consume_reset_token(
	conn: &mut SqliteConnection,
	id: &ResetTokenId,
) -> Result<bool, DbError> {
	let result = sqlx::query("UPDATE reset_tokens SET used_at = ? WHERE id = ? AND used_at IS NULL")
		.bind(Utc::now().to_rfc3339())
		.bind(id.to_string())
		.execute(&mut *conn)
		.await?;

	Ok(result.rows_affected() > 0)
}

fn row_to_token(row: &SqliteRow) -> Result<ResetToken, DbError> {
	let id: String = row.get("id");
	let user_id: String = row.get("user_id");
	let created_at: String = row.get("created_at");
	let expires_at: String = row.get("expires_at");
	let used_at: Option<String> = row.get("used_at");

	Ok(ResetToken {
		id: ResetTokenId::new(parse_uuid(&id, "reset token ID")?),
		user_id: UserId::new(parse_uuid(&user_id, "user ID")?),
		token_hash: row.get("token_hash"),
		created_at: parse_timestamp(&created_at, "created_at")?,
		expires_at: parse_timestamp(&expires_at, "expires_at")?,
		used_at: parse_optional_timestamp(used_at, "used_at")?,
	})
}
