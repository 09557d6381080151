// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! User preference repository.
//!
//! The preference object is stored as JSON text. Every query is scoped to the
//! owning user, and listings are ordered by preference name.

use async_trait::async_trait;
use chrono::Utc;
use koku_server_iam::{PreferenceId, UserId, UserPreference};
use sqlx::{
	sqlite::{SqliteConnection, SqlitePool, SqliteRow},
	Row,
};

use crate::convert::{parse_timestamp, parse_uuid};
use crate::error::DbError;

#[async_trait]
pub trait PreferenceStore: Send + Sync {
	async fn create_preference(&self, preference: &UserPreference) -> Result<(), DbError>;
	async fn get_preference(
		&self,
		user_id: &UserId,
		id: &PreferenceId,
	) -> Result<Option<UserPreference>, DbError>;
	async fn get_preference_by_name(
		&self,
		user_id: &UserId,
		name: &str,
	) -> Result<Option<UserPreference>, DbError>;
	async fn list_preferences(&self, user_id: &UserId) -> Result<Vec<UserPreference>, DbError>;
	async fn update_preference(&self, preference: &UserPreference) -> Result<(), DbError>;
	async fn delete_preference(&self, user_id: &UserId, id: &PreferenceId) -> Result<bool, DbError>;
}

#[derive(Clone)]
pub struct PreferenceRepository {
	pool: SqlitePool,
}

impl PreferenceRepository {
	pub fn new(pool: SqlitePool) -> Self {
		Self { pool }
	}

	#[tracing::instrument(skip(self, preference), fields(preference_id = %preference.id, user_id = %preference.user_id, name = %preference.name))]
	pub async fn create_preference(&self, preference: &UserPreference) -> Result<(), DbError> {
		let mut conn = self.pool.acquire().await?;
		insert_preference(&mut conn, preference).await
	}

	#[tracing::instrument(skip(self), fields(user_id = %user_id, preference_id = %id))]
	pub async fn get_preference(
		&self,
		user_id: &UserId,
		id: &PreferenceId,
	) -> Result<Option<UserPreference>, DbError> {
		let row = sqlx::query(
			r#"
			SELECT id, user_id, name, description, preference, created_at, updated_at
			FROM user_preferences
			WHERE id = ? AND user_id = ?
			"#,
		)
		.bind(id.to_string())
		.bind(user_id.to_string())
		.fetch_optional(&self.pool)
		.await?;

		row.as_ref().map(row_to_preference).transpose()
	}

	#[tracing::instrument(skip(self), fields(user_id = %user_id))]
	pub async fn get_preference_by_name(
		&self,
		user_id: &UserId,
		name: &str,
	) -> Result<Option<UserPreference>, DbError> {
		let row = sqlx::query(
			r#"
			SELECT id, user_id, name, description, preference, created_at, updated_at
			FROM user_preferences
			WHERE user_id = ? AND name = ?
			"#,
		)
		.bind(user_id.to_string())
		.bind(name)
		.fetch_optional(&self.pool)
		.await?;

		row.as_ref().map(row_to_preference).transpose()
	}

	#[tracing::instrument(skip(self), fields(user_id = %user_id))]
	pub async fn list_preferences(&self, user_id: &UserId) -> Result<Vec<UserPreference>, DbError> {
		let rows = sqlx::query(
			r#"
			SELECT id, user_id, name, description, preference, created_at, updated_at
			FROM user_preferences
			WHERE user_id = ?
			ORDER BY name
			"#,
		)
		.bind(user_id.to_string())
		.fetch_all(&self.pool)
		.await?;

		rows.iter().map(row_to_preference).collect()
	}

	/// Overwrite name, description and value; `updated_at` is set to now.
	///
	/// # Errors
	/// `DbError::NotFound` if the user has no preference with this ID,
	/// `DbError::Conflict` if the new name is already taken by another of the
	/// user's preferences.
	#[tracing::instrument(skip(self, preference), fields(preference_id = %preference.id, user_id = %preference.user_id))]
	pub async fn update_preference(&self, preference: &UserPreference) -> Result<(), DbError> {
		let value = serde_json::to_string(&preference.preference)?;
		let result = sqlx::query(
			r#"
			UPDATE user_preferences
			SET name = ?, description = ?, preference = ?, updated_at = ?
			WHERE id = ? AND user_id = ?
			"#,
		)
		.bind(&preference.name)
		.bind(&preference.description)
		.bind(value)
		.bind(Utc::now().to_rfc3339())
		.bind(preference.id.to_string())
		.bind(preference.user_id.to_string())
		.execute(&self.pool)
		.await
		.map_err(|e| DbError::from_insert(e, "preference"))?;

		if result.rows_affected() == 0 {
			return Err(DbError::NotFound(format!("preference {}", preference.id)));
		}
		tracing::debug!(preference_id = %preference.id, "preference updated");
		Ok(())
	}

	#[tracing::instrument(skip(self), fields(user_id = %user_id, preference_id = %id))]
	pub async fn delete_preference(&self, user_id: &UserId, id: &PreferenceId) -> Result<bool, DbError> {
		let result = sqlx::query("DELETE FROM user_preferences WHERE id = ? AND user_id = ?")
			.bind(id.to_string())
			.bind(user_id.to_string())
			.execute(&self.pool)
			.await?;

		Ok(result.rows_affected() > 0)
	}
}

#[async_trait]
impl PreferenceStore for PreferenceRepository {
	async fn create_preference(&self, preference: &UserPreference) -> Result<(), DbError> {
		self.create_preference(preference).await
	}

	async fn get_preference(
		&self,
		user_id: &UserId,
		id: &PreferenceId,
	) -> Result<Option<UserPreference>, DbError> {
		self.get_preference(user_id, id).await
	}

	async fn get_preference_by_name(
		&self,
		user_id: &UserId,
		name: &str,
	) -> Result<Option<UserPreference>, DbError> {
		self.get_preference_by_name(user_id, name).await
	}

	async fn list_preferences(&self, user_id: &UserId) -> Result<Vec<UserPreference>, DbError> {
		self.list_preferences(user_id).await
	}

	async fn update_preference(&self, preference: &UserPreference) -> Result<(), DbError> {
		self.update_preference(preference).await
	}

	async fn delete_preference(&self, user_id: &UserId, id: &PreferenceId) -> Result<bool, DbError> {
		self.delete_preference(user_id, id).await
	}
}

pub(crate) async fn insert_preference(
	conn: &mut SqliteConnection,
	preference: &UserPreference,
) -> Result<(), DbError> {
	let value = serde_json::to_string(&preference.preference)?;
	sqlx::query(
		r#"
		INSERT INTO user_preferences (id, user_id, name, description, preference, created_at, updated_at)
		VALUES (?, ?, ?, ?, ?, ?, ?)
		"#,
	)
	.bind(preference.id.to_string())
	.bind(preference.user_id.to_string())
	.bind(&preference.name)
	.bind(&preference.description)
	.bind(value)
	.bind(preference.created_at.to_rfc3339())
	.bind(preference.updated_at.to_rfc3339())
	.execute(&mut *conn)
	.await
	.map_err(|e| DbError::from_insert(e, "preference"))?;

	tracing::debug!(preference_id = %preference.id, name = %preference.name, "preference created");
	Ok(())
}

fn row_to_preference(row: &SqliteRow) -> Result<UserPreference, DbError> {
	let id: String = row.get("id");
	let user_id: String = row.get("user_id");
	let value: String = row.get("preference");
	let created_at: String = row.get("created_at");
	let updated_at: String = row.get("updated_at");

	Ok(UserPreference {
		id: PreferenceId::new(parse_uuid(&id, "preference ID")?),
		user_id: UserId::new(parse_uuid(&user_id, "user ID")?),
		name: row.get("name"),
		description: row.get("description"),
		preference: serde_json::from_str(&value)?,
		created_at: parse_timestamp(&created_at, "created_at")?,
		updated_at: parse_timestamp(&updated_at, "updated_at")?,
	})
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::testing::create_test_pool;
	use crate::user::UserRepository;
	use koku_server_iam::{PreferenceDefaults, User};
	use serde_json::json;

	async fn setup() -> (PreferenceRepository, User) {
		let pool = create_test_pool().await;
		let user = User::new("prefs", "prefs@example.com");
		UserRepository::new(pool.clone())
			.create_user(&user, "hash")
			.await
			.unwrap();
		(PreferenceRepository::new(pool), user)
	}

	#[tokio::test]
	async fn list_is_ordered_by_name() {
		let (repo, user) = setup().await;
		for pref in PreferenceDefaults::default().build_for(user.id) {
			repo.create_preference(&pref).await.unwrap();
		}

		let names: Vec<String> = repo
			.list_preferences(&user.id)
			.await
			.unwrap()
			.into_iter()
			.map(|p| p.name)
			.collect();
		assert_eq!(names, vec!["currency", "locale", "timezone"]);
	}

	#[tokio::test]
	async fn json_value_round_trips() {
		let (repo, user) = setup().await;
		let pref = UserPreference::new(
			user.id,
			"dashboard",
			None,
			json!({"widgets": ["cost", "usage"], "compact": true}),
		);
		repo.create_preference(&pref).await.unwrap();

		let fetched = repo.get_preference(&user.id, &pref.id).await.unwrap().unwrap();
		assert_eq!(fetched.preference, pref.preference);
		assert_eq!(fetched.description, None);

		let by_name = repo.get_preference_by_name(&user.id, "dashboard").await.unwrap();
		assert_eq!(by_name.map(|p| p.id), Some(pref.id));
	}

	#[tokio::test]
	async fn queries_are_scoped_to_owner() {
		let (repo, user) = setup().await;
		let pref = UserPreference::new(user.id, "currency", None, json!({"currency": "EUR"}));
		repo.create_preference(&pref).await.unwrap();

		let stranger = UserId::generate();
		assert!(repo.get_preference(&stranger, &pref.id).await.unwrap().is_none());
		assert!(!repo.delete_preference(&stranger, &pref.id).await.unwrap());
		assert!(repo.delete_preference(&user.id, &pref.id).await.unwrap());
		assert!(repo.list_preferences(&user.id).await.unwrap().is_empty());
	}

	#[tokio::test]
	async fn update_changes_value() {
		let (repo, user) = setup().await;
		let mut pref = UserPreference::new(user.id, "currency", None, json!({"currency": "EUR"}));
		repo.create_preference(&pref).await.unwrap();

		pref.preference = json!({"currency": "GBP"});
		pref.description = Some("billing".to_string());
		repo.update_preference(&pref).await.unwrap();

		let fetched = repo.get_preference(&user.id, &pref.id).await.unwrap().unwrap();
		assert_eq!(fetched.preference, json!({"currency": "GBP"}));
		assert_eq!(fetched.description.as_deref(), Some("billing"));

		let ghost = UserPreference::new(user.id, "x", None, json!({}));
		assert!(matches!(
			repo.update_preference(&ghost).await,
			Err(DbError::NotFound(_))
		));
	}

	#[tokio::test]
	async fn duplicate_name_for_same_user_conflicts() {
		let (repo, user) = setup().await;
		let first = UserPreference::new(user.id, "theme", None, json!({"mode": "dark"}));
		repo.create_preference(&first).await.unwrap();

		let second = UserPreference::new(user.id, "theme", None, json!({"mode": "light"}));
		assert!(matches!(
			repo.create_preference(&second).await,
			Err(DbError::Conflict(_))
		));
		assert_eq!(repo.list_preferences(&user.id).await.unwrap().len(), 1);
	}

	#[tokio::test]
	async fn renaming_onto_a_taken_name_conflicts() {
		let (repo, user) = setup().await;
		repo
			.create_preference(&UserPreference::new(user.id, "theme", None, json!({})))
			.await
			.unwrap();
		let mut other = UserPreference::new(user.id, "layout", None, json!({}));
		repo.create_preference(&other).await.unwrap();

		other.name = "theme".to_string();
		assert!(matches!(
			repo.update_preference(&other).await,
			Err(DbError::Conflict(_))
		));
	}

	#[tokio::test]
	async fn same_name_is_allowed_across_users() {
		let (repo, user) = setup().await;
		let other_user = User::new("other", "other@example.com");
		UserRepository::new(repo.pool.clone())
			.create_user(&other_user, "hash")
			.await
			.unwrap();

		repo
			.create_preference(&UserPreference::new(user.id, "theme", None, json!({})))
			.await
			.unwrap();
		repo
			.create_preference(&UserPreference::new(other_user.id, "theme", None, json!({})))
			.await
			.unwrap();
	}
}
