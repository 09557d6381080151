// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Multi-row writes that must land together.
//!
//! Registration inserts a user, its default preferences and a reset token;
//! provisioning adds a customer and its group membership on top. Both run
//! through one [`IamTransaction`], which rolls back when dropped uncommitted.

use koku_server_iam::{Customer, CustomerId, ResetToken, ResetTokenId, User, UserId, UserPreference};
use sqlx::{sqlite::SqlitePool, Sqlite, Transaction};

use crate::customer::{insert_customer, insert_customer_user};
use crate::error::DbError;
use crate::preference::insert_preference;
use crate::reset_token::{consume_reset_token, insert_reset_token};
use crate::user::{insert_user, set_password_hash};

pub struct IamTransaction {
	tx: Transaction<'static, Sqlite>,
}

impl IamTransaction {
	#[tracing::instrument(skip(pool))]
	pub async fn begin(pool: &SqlitePool) -> Result<Self, DbError> {
		Ok(Self {
			tx: pool.begin().await?,
		})
	}

	pub async fn insert_user(&mut self, user: &User, password_hash: &str) -> Result<(), DbError> {
		insert_user(&mut self.tx, user, password_hash).await
	}

	pub async fn insert_preference(&mut self, preference: &UserPreference) -> Result<(), DbError> {
		insert_preference(&mut self.tx, preference).await
	}

	pub async fn insert_reset_token(&mut self, token: &ResetToken) -> Result<(), DbError> {
		insert_reset_token(&mut self.tx, token).await
	}

	pub async fn insert_customer(&mut self, customer: &Customer) -> Result<(), DbError> {
		insert_customer(&mut self.tx, customer).await
	}

	pub async fn add_customer_user(
		&mut self,
		customer_id: &CustomerId,
		user_id: &UserId,
	) -> Result<(), DbError> {
		insert_customer_user(&mut self.tx, customer_id, user_id).await
	}

	pub async fn set_password_hash(
		&mut self,
		user_id: &UserId,
		password_hash: &str,
	) -> Result<(), DbError> {
		set_password_hash(&mut self.tx, user_id, password_hash).await
	}

	/// False when another request consumed the token first.
	pub async fn consume_reset_token(&mut self, id: &ResetTokenId) -> Result<bool, DbError> {
		consume_reset_token(&mut self.tx, id).await
	}

	pub async fn commit(self) -> Result<(), DbError> {
		self.tx.commit().await?;
		Ok(())
	}

	pub async fn rollback(self) -> Result<(), DbError> {
		self.tx.rollback().await?;
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::testing::create_test_pool;
	use crate::{CustomerRepository, PreferenceRepository, UserRepository};
	use koku_server_iam::{PreferenceDefaults, ResetTokenPolicy};

	#[tokio::test]
	async fn committed_writes_are_visible() {
		let pool = create_test_pool().await;
		let user = User::new("owner", "owner@example.com");
		let customer = Customer::new("Acme", user.id);
		let (token, _) = ResetToken::issue(user.id, &ResetTokenPolicy::default());

		let mut tx = IamTransaction::begin(&pool).await.unwrap();
		tx.insert_user(&user, "hash").await.unwrap();
		for pref in PreferenceDefaults::default().build_for(user.id) {
			tx.insert_preference(&pref).await.unwrap();
		}
		tx.insert_reset_token(&token).await.unwrap();
		tx.insert_customer(&customer).await.unwrap();
		tx.add_customer_user(&customer.id, &user.id).await.unwrap();
		tx.commit().await.unwrap();

		let users = CustomerRepository::new(pool.clone())
			.list_users(&customer.id)
			.await
			.unwrap();
		assert_eq!(users.len(), 1);
		let prefs = PreferenceRepository::new(pool)
			.list_preferences(&user.id)
			.await
			.unwrap();
		assert_eq!(prefs.len(), 3);
	}

	#[tokio::test]
	async fn rolled_back_writes_vanish() {
		let pool = create_test_pool().await;
		let user = User::new("ghost", "ghost@example.com");

		let mut tx = IamTransaction::begin(&pool).await.unwrap();
		tx.insert_user(&user, "hash").await.unwrap();
		tx.rollback().await.unwrap();

		let found = UserRepository::new(pool).get_user_by_id(&user.id).await.unwrap();
		assert!(found.is_none());
	}

	#[tokio::test]
	async fn dropped_transaction_rolls_back() {
		let pool = create_test_pool().await;
		let user = User::new("dropped", "dropped@example.com");

		{
			let mut tx = IamTransaction::begin(&pool).await.unwrap();
			tx.insert_user(&user, "hash").await.unwrap();
		}

		let found = UserRepository::new(pool).get_user_by_id(&user.id).await.unwrap();
		assert!(found.is_none());
	}
}
