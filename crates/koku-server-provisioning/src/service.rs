// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::sync::Arc;

use chrono::Utc;
use koku_common_secret::SecretString;
use koku_server_db::{
	CustomerRepository, CustomerStore, DbError, IamTransaction, PreferenceRepository,
	PreferenceStore, ResetTokenRepository, ResetTokenStore, SqlitePool, UserRepository, UserStore,
};
use koku_server_iam::preference::{PREFERENCE_DESCRIPTION_MAX_LENGTH, PREFERENCE_NAME_MAX_LENGTH};
use koku_server_iam::user::PASSWORD_MAX_LENGTH;
use koku_server_iam::{
	create_schema_name, generate_temporary_password, hash_password, hash_reset_token, messages,
	normalize_email, validate_customer_name, validate_email, validate_preference,
	validate_schema_name, validate_username, Customer, CustomerId, IamError, PreferenceDefaults,
	PreferenceId, ResetToken, ResetTokenPolicy, User, UserId, UserPreference, ValidationErrors,
};
use serde_json::Value;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::error::{ProvisioningError, Result};
use crate::notifier::IamNotifier;
use crate::request::{
	CustomerRegistration, CustomerWithOwner, PasswordChange, PreferenceInput, UserRegistration,
};

pub const CUSTOMER_NAME_TAKEN: &str = "customer with this name already exists.";
pub const SCHEMA_NAME_TAKEN: &str = "customer with this schema name already exists.";
pub const PREFERENCE_NAME_TAKEN: &str = "A preference with that name already exists.";

/// A registration that passed validation.
struct NewAccount {
	username: String,
	email: String,
	password: Option<SecretString>,
}

/// Validated preference fields, ready to store.
struct PreferenceFields {
	name: String,
	description: Option<String>,
	preference: Value,
}

#[derive(Clone)]
pub struct ProvisioningService {
	pool: SqlitePool,
	users: Arc<dyn UserStore>,
	customers: Arc<dyn CustomerStore>,
	preferences: Arc<dyn PreferenceStore>,
	reset_tokens: Arc<dyn ResetTokenStore>,
	notifier: Option<Arc<dyn IamNotifier>>,
	defaults: PreferenceDefaults,
	reset_policy: ResetTokenPolicy,
}

impl ProvisioningService {
	/// Build the service over `pool`. Without a notifier, new user emails are
	/// skipped with a warning.
	pub fn new(pool: SqlitePool, notifier: Option<Arc<dyn IamNotifier>>) -> Self {
		Self {
			users: Arc::new(UserRepository::new(pool.clone())),
			customers: Arc::new(CustomerRepository::new(pool.clone())),
			preferences: Arc::new(PreferenceRepository::new(pool.clone())),
			reset_tokens: Arc::new(ResetTokenRepository::new(pool.clone())),
			pool,
			notifier,
			defaults: PreferenceDefaults::default(),
			reset_policy: ResetTokenPolicy::default(),
		}
	}

	pub fn with_preference_defaults(mut self, defaults: PreferenceDefaults) -> Self {
		self.defaults = defaults;
		self
	}

	pub fn with_reset_token_policy(mut self, policy: ResetTokenPolicy) -> Self {
		self.reset_policy = policy;
		self
	}

	pub fn preference_defaults(&self) -> &PreferenceDefaults {
		&self.defaults
	}

	pub fn has_notifier(&self) -> bool {
		self.notifier.is_some()
	}

	pub fn pool(&self) -> &SqlitePool {
		&self.pool
	}

	// =========================================================================
	// Users
	// =========================================================================

	/// Create a user with default preferences and a reset token, then send
	/// the new user login email. Nothing is stored if the email fails.
	#[instrument(skip(self, input))]
	pub async fn register_user(&self, input: UserRegistration) -> Result<User> {
		let mut errors = ValidationErrors::new();
		let account = self.validate_account(input, &mut errors).await?;
		let account = match account {
			Some(account) if errors.is_empty() => account,
			_ => return Err(errors.into()),
		};

		let mut tx = IamTransaction::begin(&self.pool).await?;
		let (user, reset_token) = self.insert_account(&mut tx, &account).await?;

		if let Err(e) = self.notify_new_user(&user, reset_token).await {
			tx.rollback().await?;
			return Err(e);
		}
		tx.commit().await?;

		info!(user_id = %user.id, username = %user.username, "user registered");
		Ok(user)
	}

	pub async fn get_user(&self, id: &UserId) -> Result<User> {
		self
			.users
			.get_user_by_id(id)
			.await?
			.ok_or(ProvisioningError::UserNotFound)
	}

	pub async fn list_users(&self) -> Result<Vec<User>> {
		Ok(self.users.list_users().await?)
	}

	// =========================================================================
	// Customers
	// =========================================================================

	/// Create an owner account and a customer whose group holds it.
	///
	/// Owner field errors are reported under `owner.*`. The whole operation
	/// is a single transaction that includes the new user login email.
	#[instrument(skip(self, input))]
	pub async fn provision_customer(&self, input: CustomerRegistration) -> Result<CustomerWithOwner> {
		let mut errors = ValidationErrors::new();

		let account = match input.owner {
			None => {
				errors.add("owner", messages::REQUIRED);
				None
			}
			Some(owner) => {
				let mut owner_errors = ValidationErrors::new();
				let account = self.validate_account(owner, &mut owner_errors).await?;
				errors.merge_nested("owner", owner_errors);
				account
			}
		};

		let name = match input.name.map(|name| name.trim().to_string()) {
			None => {
				errors.add("name", messages::REQUIRED);
				None
			}
			Some(name) => self.validate_customer_name(name, &mut errors).await?,
		};

		let (account, name) = match (account, name) {
			(Some(account), Some(name)) if errors.is_empty() => (account, name),
			_ => return Err(errors.into()),
		};

		let mut tx = IamTransaction::begin(&self.pool).await?;
		let (owner, reset_token) = self.insert_account(&mut tx, &account).await?;

		let customer = Customer::new(name, owner.id);
		tx.insert_customer(&customer).await?;
		tx.add_customer_user(&customer.id, &owner.id).await?;

		if let Err(e) = self.notify_new_user(&owner, reset_token).await {
			tx.rollback().await?;
			return Err(e);
		}
		tx.commit().await?;

		info!(
			customer_id = %customer.id,
			schema_name = %customer.schema_name,
			owner_id = %owner.id,
			"customer provisioned"
		);
		Ok(CustomerWithOwner { customer, owner })
	}

	/// The authentication group for a customer, looked up by exact name.
	pub async fn customer_by_name(&self, name: &str) -> Result<Option<Customer>> {
		Ok(self.customers.get_customer_by_name(name).await?)
	}

	/// Members of the customer's group, ordered by username.
	pub async fn users_for_customer(&self, id: &CustomerId) -> Result<Vec<User>> {
		if self.customers.get_customer_by_id(id).await?.is_none() {
			return Err(ProvisioningError::CustomerNotFound);
		}
		Ok(self.customers.list_users(id).await?)
	}

	pub async fn get_customer(&self, id: &CustomerId) -> Result<CustomerWithOwner> {
		let customer = self
			.customers
			.get_customer_by_id(id)
			.await?
			.ok_or(ProvisioningError::CustomerNotFound)?;
		self.with_owner(customer).await
	}

	pub async fn list_customers(&self) -> Result<Vec<CustomerWithOwner>> {
		let customers = self.customers.list_customers().await?;
		let mut result = Vec::with_capacity(customers.len());
		for customer in customers {
			result.push(self.with_owner(customer).await?);
		}
		Ok(result)
	}

	// =========================================================================
	// Preferences
	// =========================================================================

	#[instrument(skip(self, input), fields(user_id = %user_id))]
	pub async fn create_preference(
		&self,
		user_id: &UserId,
		input: PreferenceInput,
	) -> Result<UserPreference> {
		self.get_user(user_id).await?;

		let fields = self.validate_preference_input(user_id, input, None).await?;
		let preference =
			UserPreference::new(*user_id, fields.name, fields.description, fields.preference);
		self
			.preferences
			.create_preference(&preference)
			.await
			.map_err(preference_write_error)?;

		debug!(preference_id = %preference.id, name = %preference.name, "preference created");
		Ok(preference)
	}

	/// Replace a preference's fields. Omitted `name` and `description` keep
	/// their current values.
	#[instrument(skip(self, input), fields(user_id = %user_id, preference_id = %id))]
	pub async fn update_preference(
		&self,
		user_id: &UserId,
		id: &PreferenceId,
		input: PreferenceInput,
	) -> Result<UserPreference> {
		let mut preference = self.get_preference(user_id, id).await?;

		let fields = self
			.validate_preference_input(user_id, input, Some(&preference))
			.await?;
		preference.name = fields.name;
		preference.description = fields.description;
		preference.preference = fields.preference;
		preference.updated_at = Utc::now();

		self
			.preferences
			.update_preference(&preference)
			.await
			.map_err(preference_write_error)?;
		Ok(preference)
	}

	pub async fn get_preference(&self, user_id: &UserId, id: &PreferenceId) -> Result<UserPreference> {
		self
			.preferences
			.get_preference(user_id, id)
			.await?
			.ok_or(ProvisioningError::PreferenceNotFound)
	}

	/// All of a user's preferences, ordered by name.
	pub async fn list_preferences(&self, user_id: &UserId) -> Result<Vec<UserPreference>> {
		self.get_user(user_id).await?;
		Ok(self.preferences.list_preferences(user_id).await?)
	}

	#[instrument(skip(self), fields(user_id = %user_id, preference_id = %id))]
	pub async fn delete_preference(&self, user_id: &UserId, id: &PreferenceId) -> Result<()> {
		if !self.preferences.delete_preference(user_id, id).await? {
			return Err(ProvisioningError::PreferenceNotFound);
		}
		debug!("preference deleted");
		Ok(())
	}

	// =========================================================================
	// Password reset
	// =========================================================================

	/// Set a new password using a reset token. The token is consumed.
	#[instrument(skip(self, input))]
	pub async fn change_password(&self, input: PasswordChange) -> Result<()> {
		let mut errors = ValidationErrors::new();

		let token = match input.token {
			None => {
				errors.add("token", messages::REQUIRED);
				None
			}
			Some(token) => match Uuid::parse_str(token.trim()) {
				Ok(token) => Some(token),
				Err(_) => {
					errors.add("token", messages::INVALID_UUID);
					None
				}
			},
		};

		let password = match input.password {
			None => {
				errors.add("password", messages::REQUIRED);
				None
			}
			Some(password) => check_password(password, &mut errors),
		};

		let (token, password) = match (token, password) {
			(Some(token), Some(password)) if errors.is_empty() => (token, password),
			_ => return Err(errors.into()),
		};

		let record = match self
			.reset_tokens
			.get_token_by_hash(&hash_reset_token(&token))
			.await?
		{
			Some(record) if record.is_valid() => record,
			_ => return Err(invalid_token()),
		};

		let password_hash = hash_password(password.expose())?;

		let mut tx = IamTransaction::begin(&self.pool).await?;
		if !tx.consume_reset_token(&record.id).await? {
			tx.rollback().await?;
			return Err(invalid_token());
		}
		tx.set_password_hash(&record.user_id, &password_hash).await?;
		tx.commit().await?;

		info!(user_id = %record.user_id, "password changed via reset token");
		Ok(())
	}

	/// Remove expired reset tokens, returning how many were deleted.
	pub async fn purge_expired_reset_tokens(&self) -> Result<u64> {
		let removed = self.reset_tokens.delete_expired().await?;
		if removed > 0 {
			info!(removed, "purged expired reset tokens");
		}
		Ok(removed)
	}

	// =========================================================================
	// Helpers
	// =========================================================================

	/// Collect field errors for a registration into `errors`. Returns the
	/// account only when every field passed.
	async fn validate_account(
		&self,
		input: UserRegistration,
		errors: &mut ValidationErrors,
	) -> Result<Option<NewAccount>> {
		let username = match input.username.map(|u| u.trim().to_string()) {
			None => {
				errors.add("username", messages::REQUIRED);
				None
			}
			Some(username) => match validate_username(&username) {
				Err(message) => {
					errors.add("username", message);
					None
				}
				Ok(()) => {
					if self.users.username_exists(&username).await? {
						errors.add("username", messages::USERNAME_TAKEN);
						None
					} else {
						Some(username)
					}
				}
			},
		};

		let email = match input.email.map(|e| e.trim().to_string()) {
			None => {
				errors.add("email", messages::REQUIRED);
				None
			}
			Some(email) => match validate_email(&email) {
				Err(message) => {
					errors.add("email", message);
					None
				}
				Ok(()) => {
					let email = normalize_email(&email);
					if self.users.email_exists(&email).await? {
						errors.add("email", messages::UNIQUE);
						None
					} else {
						Some(email)
					}
				}
			},
		};

		let password = match input.password {
			None => Some(None),
			Some(password) => check_password(password, errors).map(Some),
		};

		Ok(match (username, email, password) {
			(Some(username), Some(email), Some(password)) => Some(NewAccount {
				username,
				email,
				password,
			}),
			_ => None,
		})
	}

	async fn validate_customer_name(
		&self,
		name: String,
		errors: &mut ValidationErrors,
	) -> Result<Option<String>> {
		if let Err(message) = validate_customer_name(&name) {
			errors.add("name", message);
			return Ok(None);
		}
		if self.customers.get_customer_by_name(&name).await?.is_some() {
			errors.add("name", CUSTOMER_NAME_TAKEN);
			return Ok(None);
		}

		let schema_name = create_schema_name(&name);
		if let Err(message) = validate_schema_name(&schema_name) {
			errors.add("name", message);
			return Ok(None);
		}
		if self
			.customers
			.get_customer_by_schema_name(&schema_name)
			.await?
			.is_some()
		{
			errors.add("name", SCHEMA_NAME_TAKEN);
			return Ok(None);
		}

		Ok(Some(name))
	}

	/// Insert the user, its default preferences and a reset token. Returns the
	/// user and the plaintext token.
	async fn insert_account(
		&self,
		tx: &mut IamTransaction,
		account: &NewAccount,
	) -> Result<(User, Uuid)> {
		self
			.defaults
			.validate()
			.map_err(IamError::InvalidPreference)?;

		let password = match &account.password {
			Some(password) => password.clone(),
			None => generate_temporary_password(),
		};
		let password_hash = hash_password(password.expose())?;

		let user = User::new(account.username.clone(), &account.email);
		tx.insert_user(&user, &password_hash).await?;

		for preference in self.defaults.build_for(user.id) {
			tx.insert_preference(&preference).await?;
		}

		let (token, plaintext) = ResetToken::issue(user.id, &self.reset_policy);
		tx.insert_reset_token(&token).await?;

		debug!(user_id = %user.id, "account rows staged");
		Ok((user, plaintext))
	}

	async fn notify_new_user(&self, user: &User, reset_token: Uuid) -> Result<()> {
		let Some(notifier) = &self.notifier else {
			warn!(user_id = %user.id, "no notifier configured, skipping new user login email");
			return Ok(());
		};

		notifier
			.new_user_login(&user.username, &user.email, user.id.into_inner(), reset_token)
			.await
			.map_err(|e| {
				warn!(user_id = %user.id, error = %e, "new user login email failed");
				ProvisioningError::Notification(e.to_string())
			})
	}

	async fn with_owner(&self, customer: Customer) -> Result<CustomerWithOwner> {
		let owner = self
			.users
			.get_user_by_id(&customer.owner_id)
			.await?
			.ok_or_else(|| {
				DbError::Internal(format!(
					"owner {} of customer {} is missing",
					customer.owner_id, customer.id
				))
			})?;
		Ok(CustomerWithOwner { customer, owner })
	}

	async fn validate_preference_input(
		&self,
		user_id: &UserId,
		input: PreferenceInput,
		existing: Option<&UserPreference>,
	) -> Result<PreferenceFields> {
		let mut errors = ValidationErrors::new();

		let name = match input.name.map(|n| n.map(|n| n.trim().to_string())) {
			None => Some(
				existing
					.map(|p| p.name.clone())
					.unwrap_or_else(|| Uuid::new_v4().to_string()),
			),
			Some(None) => {
				errors.add("name", messages::NULL);
				None
			}
			Some(Some(name)) if name.is_empty() => {
				errors.add("name", messages::BLANK);
				None
			}
			Some(Some(name)) if name.chars().count() > PREFERENCE_NAME_MAX_LENGTH => {
				errors.add("name", messages::max_length(PREFERENCE_NAME_MAX_LENGTH));
				None
			}
			Some(Some(name)) => Some(name),
		};

		let description = match input.description {
			None => existing.and_then(|p| p.description.clone()),
			Some(None) => None,
			Some(Some(description)) => {
				if description.chars().count() > PREFERENCE_DESCRIPTION_MAX_LENGTH {
					errors.add(
						"description",
						messages::max_length(PREFERENCE_DESCRIPTION_MAX_LENGTH),
					);
				}
				Some(description)
			}
		};

		let preference = match input.preference {
			None | Some(Value::Null) => {
				errors.add("preference", messages::REQUIRED);
				None
			}
			Some(value) if !value.is_object() => {
				errors.add("preference", messages::NOT_AN_OBJECT);
				None
			}
			Some(value) => Some(value),
		};

		let (name, preference) = match (name, preference) {
			(Some(name), Some(preference)) if errors.is_empty() => (name, preference),
			_ => return Err(errors.into()),
		};

		if let Err(message) = validate_preference(&name, &preference) {
			let mut errors = ValidationErrors::new();
			errors.add_non_field(message);
			return Err(errors.into());
		}

		if let Some(other) = self.preferences.get_preference_by_name(user_id, &name).await? {
			if existing.map(|p| p.id) != Some(other.id) {
				return Err(ValidationErrors::single("name", PREFERENCE_NAME_TAKEN).into());
			}
		}

		Ok(PreferenceFields {
			name,
			description,
			preference,
		})
	}
}

/// Check an explicitly supplied password. Null, blank and overlong values are
/// rejected.
fn check_password(password: Option<SecretString>, errors: &mut ValidationErrors) -> Option<SecretString> {
	let Some(password) = password else {
		errors.add("password", messages::NULL);
		return None;
	};
	if password.is_empty() {
		errors.add("password", messages::BLANK);
		return None;
	}
	if password.char_count() > PASSWORD_MAX_LENGTH {
		errors.add("password", messages::max_length(PASSWORD_MAX_LENGTH));
		return None;
	}
	Some(password)
}

fn invalid_token() -> ProvisioningError {
	ValidationErrors::single("token", messages::INVALID_RESET_TOKEN).into()
}

/// A write that lost a race for the per-user name reports the same field
/// error as the up-front check.
fn preference_write_error(e: DbError) -> ProvisioningError {
	match e {
		DbError::Conflict(_) => ValidationErrors::single("name", PREFERENCE_NAME_TAKEN).into(),
		other => other.into(),
	}
}
