// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Customer repository.
//!
//! This module provides database access for tenants and their user groups:
//! - Customer lookup by ID, name and schema name
//! - Group membership (`customer_users`)

use async_trait::async_trait;
use chrono::Utc;
use koku_server_iam::{Customer, CustomerId, User, UserId};
use sqlx::{
	sqlite::{SqliteConnection, SqlitePool, SqliteRow},
	Row,
};

use crate::convert::{parse_timestamp, parse_uuid};
use crate::error::DbError;
use crate::user::row_to_user;

#[async_trait]
pub trait CustomerStore: Send + Sync {
	async fn create_customer(&self, customer: &Customer) -> Result<(), DbError>;
	async fn get_customer_by_id(&self, id: &CustomerId) -> Result<Option<Customer>, DbError>;
	async fn get_customer_by_name(&self, name: &str) -> Result<Option<Customer>, DbError>;
	async fn get_customer_by_schema_name(
		&self,
		schema_name: &str,
	) -> Result<Option<Customer>, DbError>;
	async fn list_customers(&self) -> Result<Vec<Customer>, DbError>;
	async fn add_user(&self, customer_id: &CustomerId, user_id: &UserId) -> Result<(), DbError>;
	async fn list_users(&self, customer_id: &CustomerId) -> Result<Vec<User>, DbError>;
	async fn list_customers_for_user(&self, user_id: &UserId) -> Result<Vec<Customer>, DbError>;
}

#[derive(Clone)]
pub struct CustomerRepository {
	pool: SqlitePool,
}

impl CustomerRepository {
	pub fn new(pool: SqlitePool) -> Self {
		Self { pool }
	}

	/// Insert a customer. The owner is not added to the group here.
	///
	/// # Errors
	/// `DbError::Conflict` if the name or schema name is taken.
	#[tracing::instrument(skip(self, customer), fields(customer_id = %customer.id, schema_name = %customer.schema_name))]
	pub async fn create_customer(&self, customer: &Customer) -> Result<(), DbError> {
		let mut conn = self.pool.acquire().await?;
		insert_customer(&mut conn, customer).await
	}

	#[tracing::instrument(skip(self), fields(customer_id = %id))]
	pub async fn get_customer_by_id(&self, id: &CustomerId) -> Result<Option<Customer>, DbError> {
		let row = sqlx::query(
			r#"
			SELECT id, name, schema_name, owner_id, date_created
			FROM customers
			WHERE id = ?
			"#,
		)
		.bind(id.to_string())
		.fetch_optional(&self.pool)
		.await?;

		row.as_ref().map(row_to_customer).transpose()
	}

	/// The customer doubling as the authentication group called `name`.
	#[tracing::instrument(skip(self))]
	pub async fn get_customer_by_name(&self, name: &str) -> Result<Option<Customer>, DbError> {
		let row = sqlx::query(
			r#"
			SELECT id, name, schema_name, owner_id, date_created
			FROM customers
			WHERE name = ?
			"#,
		)
		.bind(name)
		.fetch_optional(&self.pool)
		.await?;

		row.as_ref().map(row_to_customer).transpose()
	}

	#[tracing::instrument(skip(self))]
	pub async fn get_customer_by_schema_name(
		&self,
		schema_name: &str,
	) -> Result<Option<Customer>, DbError> {
		let row = sqlx::query(
			r#"
			SELECT id, name, schema_name, owner_id, date_created
			FROM customers
			WHERE schema_name = ?
			"#,
		)
		.bind(schema_name)
		.fetch_optional(&self.pool)
		.await?;

		row.as_ref().map(row_to_customer).transpose()
	}

	#[tracing::instrument(skip(self))]
	pub async fn list_customers(&self) -> Result<Vec<Customer>, DbError> {
		let rows = sqlx::query(
			r#"
			SELECT id, name, schema_name, owner_id, date_created
			FROM customers
			ORDER BY date_created, name
			"#,
		)
		.fetch_all(&self.pool)
		.await?;

		rows.iter().map(row_to_customer).collect()
	}

	/// Add a user to the customer's group. Adding an existing member is a no-op.
	#[tracing::instrument(skip(self), fields(customer_id = %customer_id, user_id = %user_id))]
	pub async fn add_user(&self, customer_id: &CustomerId, user_id: &UserId) -> Result<(), DbError> {
		let mut conn = self.pool.acquire().await?;
		insert_customer_user(&mut conn, customer_id, user_id).await
	}

	/// Members of the customer's group, ordered by username.
	#[tracing::instrument(skip(self), fields(customer_id = %customer_id))]
	pub async fn list_users(&self, customer_id: &CustomerId) -> Result<Vec<User>, DbError> {
		let rows = sqlx::query(
			r#"
			SELECT u.id, u.username, u.email, u.is_active, u.date_joined
			FROM users u
			INNER JOIN customer_users cu ON cu.user_id = u.id
			WHERE cu.customer_id = ?
			ORDER BY u.username
			"#,
		)
		.bind(customer_id.to_string())
		.fetch_all(&self.pool)
		.await?;

		rows.iter().map(row_to_user).collect()
	}

	#[tracing::instrument(skip(self), fields(user_id = %user_id))]
	pub async fn list_customers_for_user(&self, user_id: &UserId) -> Result<Vec<Customer>, DbError> {
		let rows = sqlx::query(
			r#"
			SELECT c.id, c.name, c.schema_name, c.owner_id, c.date_created
			FROM customers c
			INNER JOIN customer_users cu ON cu.customer_id = c.id
			WHERE cu.user_id = ?
			ORDER BY c.name
			"#,
		)
		.bind(user_id.to_string())
		.fetch_all(&self.pool)
		.await?;

		rows.iter().map(row_to_customer).collect()
	}
}

#[async_trait]
impl CustomerStore for CustomerRepository {
	async fn create_customer(&self, customer: &Customer) -> Result<(), DbError> {
		self.create_customer(customer).await
	}

	async fn get_customer_by_id(&self, id: &CustomerId) -> Result<Option<Customer>, DbError> {
		self.get_customer_by_id(id).await
	}

	async fn get_customer_by_name(&self, name: &str) -> Result<Option<Customer>, DbError> {
		self.get_customer_by_name(name).await
	}

	async fn get_customer_by_schema_name(
		&self,
		schema_name: &str,
	) -> Result<Option<Customer>, DbError> {
		self.get_customer_by_schema_name(schema_name).await
	}

	async fn list_customers(&self) -> Result<Vec<Customer>, DbError> {
		self.list_customers().await
	}

	async fn add_user(&self, customer_id: &CustomerId, user_id: &UserId) -> Result<(), DbError> {
		self.add_user(customer_id, user_id).await
	}

	async fn list_users(&self, customer_id: &CustomerId) -> Result<Vec<User>, DbError> {
		self.list_users(customer_id).await
	}

	async fn list_customers_for_user(&self, user_id: &UserId) -> Result<Vec<Customer>, DbError> {
		self.list_customers_for_user(user_id).await
	}
}

pub(crate) async fn insert_customer(
	conn: &mut SqliteConnection,
	customer: &Customer,
) -> Result<(), DbError> {
	sqlx::query(
		r#"
		INSERT INTO customers (id, name, schema_name, owner_id, date_created)
		VALUES (?, ?, ?, ?, ?)
		"#,
	)
	.bind(customer.id.to_string())
	.bind(&customer.name)
	.bind(&customer.schema_name)
	.bind(customer.owner_id.to_string())
	.bind(customer.date_created.to_rfc3339())
	.execute(&mut *conn)
	.await
	.map_err(|e| DbError::from_insert(e, "customer"))?;

	tracing::debug!(customer_id = %customer.id, schema_name = %customer.schema_name, "customer created");
	Ok(())
}

pub(crate) async fn insert_customer_user(
	conn: &mut SqliteConnection,
	customer_id: &CustomerId,
	user_id: &UserId,
) -> Result<(), DbError> {
	sqlx::query(
		r#"
		INSERT OR IGNORE INTO customer_users (customer_id, user_id, joined_at)
		VALUES (?, ?, ?)
		"#,
	)
	.bind(customer_id.to_string())
	.bind(user_id.to_string())
	.bind(Utc::now().to_rfc3339())
	.execute(&mut *conn)
	.await?;

	tracing::debug!(customer_id = %customer_id, user_id = %user_id, "user added to customer group");
	Ok(())
}

fn row_to_customer(row: &SqliteRow) -> Result<Customer, DbError> {
	let id: String = row.get("id");
	let owner_id: String = row.get("owner_id");
	let date_created: String = row.get("date_created");

	Ok(Customer {
		id: CustomerId::new(parse_uuid(&id, "customer ID")?),
		name: row.get("name"),
		schema_name: row.get("schema_name"),
		owner_id: UserId::new(parse_uuid(&owner_id, "owner ID")?),
		date_created: parse_timestamp(&date_created, "date_created")?,
	})
}
