// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! User repository.
//!
//! Users are stored with their argon2 password hash, which never leaves this
//! module except through [`UserRepository::get_password_hash`].

use async_trait::async_trait;
use chrono::Utc;
use koku_server_iam::{User, UserId};
use sqlx::{
	sqlite::{SqliteConnection, SqlitePool, SqliteRow},
	Row,
};

use crate::convert::{parse_timestamp, parse_uuid};
use crate::error::DbError;

#[async_trait]
pub trait UserStore: Send + Sync {
	async fn create_user(&self, user: &User, password_hash: &str) -> Result<(), DbError>;
	async fn get_user_by_id(&self, id: &UserId) -> Result<Option<User>, DbError>;
	async fn get_user_by_username(&self, username: &str) -> Result<Option<User>, DbError>;
	async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, DbError>;
	async fn list_users(&self) -> Result<Vec<User>, DbError>;
	async fn username_exists(&self, username: &str) -> Result<bool, DbError>;
	async fn email_exists(&self, email: &str) -> Result<bool, DbError>;
	async fn get_password_hash(&self, id: &UserId) -> Result<Option<String>, DbError>;
	async fn update_password_hash(&self, id: &UserId, password_hash: &str) -> Result<(), DbError>;
}

#[derive(Clone)]
pub struct UserRepository {
	pool: SqlitePool,
}

impl UserRepository {
	pub fn new(pool: SqlitePool) -> Self {
		Self { pool }
	}

	/// Insert a user.
	///
	/// # Errors
	/// `DbError::Conflict` when the username or email is taken.
	#[tracing::instrument(skip(self, user, password_hash), fields(user_id = %user.id, username = %user.username))]
	pub async fn create_user(&self, user: &User, password_hash: &str) -> Result<(), DbError> {
		let mut conn = self.pool.acquire().await?;
		insert_user(&mut conn, user, password_hash).await
	}

	#[tracing::instrument(skip(self), fields(user_id = %id))]
	pub async fn get_user_by_id(&self, id: &UserId) -> Result<Option<User>, DbError> {
		let row = sqlx::query(
			r#"
			SELECT id, username, email, is_active, date_joined
			FROM users
			WHERE id = ?
			"#,
		)
		.bind(id.to_string())
		.fetch_optional(&self.pool)
		.await?;

		row.as_ref().map(row_to_user).transpose()
	}

	#[tracing::instrument(skip(self))]
	pub async fn get_user_by_username(&self, username: &str) -> Result<Option<User>, DbError> {
		let row = sqlx::query(
			r#"
			SELECT id, username, email, is_active, date_joined
			FROM users
			WHERE username = ?
			"#,
		)
		.bind(username)
		.fetch_optional(&self.pool)
		.await?;

		row.as_ref().map(row_to_user).transpose()
	}

	/// Exact, case-sensitive match on the stored address.
	#[tracing::instrument(skip(self, email))]
	pub async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, DbError> {
		let row = sqlx::query(
			r#"
			SELECT id, username, email, is_active, date_joined
			FROM users
			WHERE email = ?
			"#,
		)
		.bind(email)
		.fetch_optional(&self.pool)
		.await?;

		row.as_ref().map(row_to_user).transpose()
	}

	#[tracing::instrument(skip(self))]
	pub async fn list_users(&self) -> Result<Vec<User>, DbError> {
		let rows = sqlx::query(
			r#"
			SELECT id, username, email, is_active, date_joined
			FROM users
			ORDER BY username
			"#,
		)
		.fetch_all(&self.pool)
		.await?;

		rows.iter().map(row_to_user).collect()
	}

	#[tracing::instrument(skip(self))]
	pub async fn username_exists(&self, username: &str) -> Result<bool, DbError> {
		let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE username = ?")
			.bind(username)
			.fetch_one(&self.pool)
			.await?;
		Ok(count > 0)
	}

	#[tracing::instrument(skip(self, email))]
	pub async fn email_exists(&self, email: &str) -> Result<bool, DbError> {
		let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE email = ?")
			.bind(email)
			.fetch_one(&self.pool)
			.await?;
		Ok(count > 0)
	}

	#[tracing::instrument(skip(self), fields(user_id = %id))]
	pub async fn get_password_hash(&self, id: &UserId) -> Result<Option<String>, DbError> {
		let hash: Option<String> = sqlx::query_scalar("SELECT password_hash FROM users WHERE id = ?")
			.bind(id.to_string())
			.fetch_optional(&self.pool)
			.await?;
		Ok(hash)
	}

	/// # Errors
	/// `DbError::NotFound` if no user has this ID.
	#[tracing::instrument(skip(self, password_hash), fields(user_id = %id))]
	pub async fn update_password_hash(&self, id: &UserId, password_hash: &str) -> Result<(), DbError> {
		let mut conn = self.pool.acquire().await?;
		set_password_hash(&mut conn, id, password_hash).await
	}
}

#[async_trait]
impl UserStore for UserRepository {
	async fn create_user(&self, user: &User, password_hash: &str) -> Result<(), DbError> {
		self.create_user(user, password_hash).await
	}

	async fn get_user_by_id(&self, id: &UserId) -> Result<Option<User>, DbError> {
		self.get_user_by_id(id).await
	}

	async fn get_user_by_username(&self, username: &str) -> Result<Option<User>, DbError> {
		self.get_user_by_username(username).await
	}

	async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, DbError> {
		self.get_user_by_email(email).await
	}

	async fn list_users(&self) -> Result<Vec<User>, DbError> {
		self.list_users().await
	}

	async fn username_exists(&self, username: &str) -> Result<bool, DbError> {
		self.username_exists(username).await
	}

	async fn email_exists(&self, email: &str) -> Result<bool, DbError> {
		self.email_exists(email).await
	}

	async fn get_password_hash(&self, id: &UserId) -> Result<Option<String>, DbError> {
		self.get_password_hash(id).await
	}

	async fn update_password_hash(&self, id: &UserId, password_hash: &str) -> Result<(), DbError> {
		self.update_password_hash(id, password_hash).await
	}
}

pub(crate) async fn insert_user(
	conn: &mut SqliteConnection,
	user: &User,
	password_hash: &str,
) -> Result<(), DbError> {
	let joined = user.date_joined.to_rfc3339();
	sqlx::query(
		r#"
		INSERT INTO users (id, username, email, password_hash, is_active, date_joined, updated_at)
		VALUES (?, ?, ?, ?, ?, ?, ?)
		"#,
	)
	.bind(user.id.to_string())
	.bind(&user.username)
	.bind(&user.email)
	.bind(password_hash)
	.bind(user.is_active as i32)
	.bind(&joined)
	.bind(&joined)
	.execute(&mut *conn)
	.await
	.map_err(|e| DbError::from_insert(e, "user"))?;

	tracing::debug!(user_id = %user.id, "user created");
	Ok(())
}

pub(crate) async fn set_password_hash(
	conn: &mut SqliteConnection,
	id: &UserId,
	password_hash: &str,
) -> Result<(), DbError> {
	let result = sqlx::query("UPDATE users SET password_hash = ?, updated_at = ? WHERE id = ?")
		.bind(password_hash)
		.bind(Utc::now().to_rfc3339())
		.bind(id.to_string())
		.execute(&mut *conn)
		.await?;

	if result.rows_affected() == 0 {
		return Err(DbError::NotFound(format!("user {id}")));
	}
	tracing::debug!(user_id = %id, "password updated");
	Ok(())
}

pub(crate) fn row_to_user(row: &SqliteRow) -> Result<User, DbError> {
	let id: String = row.get("id");
	let is_active: i32 = row.get("is_active");
	let date_joined: String = row.get("date_joined");

	Ok(User {
		id: UserId::new(parse_uuid(&id, "user ID")?),
		username: row.get("username"),
		email: row.get("email"),
		is_active: is_active != 0,
		date_joined: parse_timestamp(&date_joined, "date_joined")?,
	})
}
