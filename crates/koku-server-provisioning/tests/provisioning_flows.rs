// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use koku_common_secret::SecretString;
use koku_server_db::testing::create_test_pool;
use koku_server_db::{UserRepository, UserStore};
use koku_server_iam::{messages, verify_password, PreferenceDefaults, ResetTokenPolicy};
use koku_server_provisioning::service::{PREFERENCE_NAME_TAKEN, SCHEMA_NAME_TAKEN};
use koku_server_provisioning::{
	CustomerRegistration, IamNotifier, NotifyError, PasswordChange, PreferenceInput,
	ProvisioningError, ProvisioningService, UserRegistration,
};
use serde_json::json;
use uuid::Uuid;

#[derive(Debug, Clone)]
struct SentLogin {
	username: String,
	email: String,
	user_uuid: Uuid,
	reset_token: Uuid,
}

#[derive(Default)]
struct RecordingNotifier {
	sent: Mutex<Vec<SentLogin>>,
	fail: bool,
}

impl RecordingNotifier {
	fn failing() -> Self {
		Self {
			fail: true,
			..Default::default()
		}
	}

	fn sent(&self) -> Vec<SentLogin> {
		self.sent.lock().unwrap().clone()
	}
}

#[async_trait]
impl IamNotifier for RecordingNotifier {
	async fn new_user_login(
		&self,
		username: &str,
		email: &str,
		user_uuid: Uuid,
		reset_token: Uuid,
	) -> Result<(), NotifyError> {
		if self.fail {
			return Err(NotifyError("connection refused".to_string()));
		}
		self.sent.lock().unwrap().push(SentLogin {
			username: username.to_string(),
			email: email.to_string(),
			user_uuid,
			reset_token,
		});
		Ok(())
	}
}

async fn service_with(notifier: Arc<RecordingNotifier>) -> ProvisioningService {
	let pool = create_test_pool().await;
	ProvisioningService::new(pool, Some(notifier))
}

fn registration(username: &str, email: &str) -> UserRegistration {
	UserRegistration {
		username: Some(username.to_string()),
		email: Some(email.to_string()),
		password: None,
	}
}

fn validation_errors(err: ProvisioningError) -> koku_server_iam::ValidationErrors {
	match err {
		ProvisioningError::Validation(errors) => errors,
		other => panic!("expected validation error, got {other:?}"),
	}
}

#[tokio::test]
async fn register_user_seeds_defaults_and_sends_login_email() {
	let notifier = Arc::new(RecordingNotifier::default());
	let service = service_with(notifier.clone()).await;

	let user = service
		.register_user(registration("jsmith", "jsmith@Example.com"))
		.await
		.unwrap();
	assert_eq!(user.email, "jsmith@example.com");

	let names: Vec<String> = service
		.list_preferences(&user.id)
		.await
		.unwrap()
		.into_iter()
		.map(|p| p.name)
		.collect();
	assert_eq!(names, vec!["currency", "locale", "timezone"]);

	let sent = notifier.sent();
	assert_eq!(sent.len(), 1);
	assert_eq!(sent[0].username, "jsmith");
	assert_eq!(sent[0].email, "jsmith@example.com");
	assert_eq!(sent[0].user_uuid, user.id.into_inner());
}

#[tokio::test]
async fn default_preferences_carry_configured_values() {
	let notifier = Arc::new(RecordingNotifier::default());
	let service = service_with(notifier)
		.await
		.with_preference_defaults(PreferenceDefaults {
			currency: "EUR".to_string(),
			timezone: "Europe/Berlin".to_string(),
			locale: "de_DE.ISO8859-1".to_string(),
		});

	let user = service
		.register_user(registration("hans", "hans@example.de"))
		.await
		.unwrap();
	let prefs = service.list_preferences(&user.id).await.unwrap();

	let currency = prefs.iter().find(|p| p.name == "currency").unwrap();
	assert_eq!(currency.preference, json!({"currency": "EUR"}));
	assert_eq!(currency.description.as_deref(), Some("default preference"));
	let timezone = prefs.iter().find(|p| p.name == "timezone").unwrap();
	assert_eq!(timezone.preference, json!({"timezone": "Europe/Berlin"}));
}

#[tokio::test]
async fn supplied_password_is_hashed() {
	let notifier = Arc::new(RecordingNotifier::default());
	let service = service_with(notifier).await;

	let mut input = registration("alice", "alice@example.com");
	input.password = Some(Some(SecretString::new("correct horse".to_string())));
	let user = service.register_user(input).await.unwrap();

	let hash = UserRepository::new(service.pool().clone())
		.get_password_hash(&user.id)
		.await
		.unwrap()
		.unwrap();
	assert!(verify_password("correct horse", &hash));
	assert!(!hash.contains("correct horse"));
}

#[tokio::test]
async fn registration_reports_every_bad_field() {
	let notifier = Arc::new(RecordingNotifier::default());
	let service = service_with(notifier.clone()).await;

	let err = service
		.register_user(UserRegistration {
			username: None,
			email: Some("not-an-email".to_string()),
			password: Some(None),
		})
		.await
		.unwrap_err();
	assert_eq!(err.status_code(), 400);

	let errors = validation_errors(err);
	assert_eq!(errors.get("username"), Some(&[messages::REQUIRED.to_string()][..]));
	assert_eq!(errors.get("email"), Some(&[messages::INVALID_EMAIL.to_string()][..]));
	assert_eq!(errors.get("password"), Some(&[messages::NULL.to_string()][..]));
	assert!(notifier.sent().is_empty());
}

#[tokio::test]
async fn overlong_password_is_rejected() {
	let notifier = Arc::new(RecordingNotifier::default());
	let service = service_with(notifier).await;

	let mut input = registration("bob", "bob@example.com");
	input.password = Some(Some(SecretString::new("x".repeat(129))));
	let errors = validation_errors(service.register_user(input).await.unwrap_err());
	assert_eq!(
		errors.get("password"),
		Some(&[messages::max_length(128)][..])
	);
}

#[tokio::test]
async fn duplicate_username_and_email_are_rejected() {
	let notifier = Arc::new(RecordingNotifier::default());
	let service = service_with(notifier).await;

	service
		.register_user(registration("carol", "carol@example.com"))
		.await
		.unwrap();

	let errors = validation_errors(
		service
			.register_user(registration("carol", "carol@EXAMPLE.com"))
			.await
			.unwrap_err(),
	);
	assert_eq!(
		errors.get("username"),
		Some(&[messages::USERNAME_TAKEN.to_string()][..])
	);
	assert_eq!(errors.get("email"), Some(&[messages::UNIQUE.to_string()][..]));
}

#[tokio::test]
async fn failed_email_rolls_back_registration() {
	let notifier = Arc::new(RecordingNotifier::failing());
	let service = service_with(notifier).await;

	let err = service
		.register_user(registration("dave", "dave@example.com"))
		.await
		.unwrap_err();
	assert!(matches!(err, ProvisioningError::Notification(_)));
	assert_eq!(err.status_code(), 502);

	assert!(service.list_users().await.unwrap().is_empty());
}

#[tokio::test]
async fn missing_notifier_still_registers() {
	let pool = create_test_pool().await;
	let service = ProvisioningService::new(pool, None);
	assert!(!service.has_notifier());

	let user = service
		.register_user(registration("erin", "erin@example.com"))
		.await
		.unwrap();
	assert_eq!(service.get_user(&user.id).await.unwrap(), user);
}

#[tokio::test]
async fn provision_customer_creates_owner_and_group() {
	let notifier = Arc::new(RecordingNotifier::default());
	let service = service_with(notifier.clone()).await;

	let provisioned = service
		.provision_customer(CustomerRegistration {
			name: Some("Acme Corp, Inc.".to_string()),
			owner: Some(registration("acme_admin", "admin@acme.com")),
		})
		.await
		.unwrap();

	assert_eq!(provisioned.customer.schema_name, "acmecorpinc");
	assert_eq!(provisioned.customer.owner_id, provisioned.owner.id);

	let members = service
		.users_for_customer(&provisioned.customer.id)
		.await
		.unwrap();
	assert_eq!(members, vec![provisioned.owner.clone()]);

	let group = service
		.customer_by_name("Acme Corp, Inc.")
		.await
		.unwrap()
		.unwrap();
	assert_eq!(group.id, provisioned.customer.id);

	let fetched = service.get_customer(&provisioned.customer.id).await.unwrap();
	assert_eq!(fetched, provisioned);
	assert_eq!(service.list_customers().await.unwrap().len(), 1);
	assert_eq!(notifier.sent().len(), 1);
}

#[tokio::test]
async fn owner_errors_are_nested() {
	let notifier = Arc::new(RecordingNotifier::default());
	let service = service_with(notifier).await;

	let errors = validation_errors(
		service
			.provision_customer(CustomerRegistration {
				name: None,
				owner: Some(registration("", "broken")),
			})
			.await
			.unwrap_err(),
	);
	assert!(errors.get("name").is_some());
	assert!(errors.get("owner.username").is_some());
	assert!(errors.get("owner.email").is_some());

	let json = errors.to_json();
	assert_eq!(
		json["owner"]["email"],
		json!([messages::INVALID_EMAIL])
	);
}

#[tokio::test]
async fn missing_owner_is_required() {
	let notifier = Arc::new(RecordingNotifier::default());
	let service = service_with(notifier).await;

	let errors = validation_errors(
		service
			.provision_customer(CustomerRegistration {
				name: Some("Initech".to_string()),
				owner: None,
			})
			.await
			.unwrap_err(),
	);
	assert_eq!(errors.get("owner"), Some(&[messages::REQUIRED.to_string()][..]));
}

#[tokio::test]
async fn colliding_schema_names_are_rejected() {
	let notifier = Arc::new(RecordingNotifier::default());
	let service = service_with(notifier).await;

	service
		.provision_customer(CustomerRegistration {
			name: Some("Acme Corp".to_string()),
			owner: Some(registration("first", "first@acme.com")),
		})
		.await
		.unwrap();

	let errors = validation_errors(
		service
			.provision_customer(CustomerRegistration {
				name: Some("acme-corp".to_string()),
				owner: Some(registration("second", "second@acme.com")),
			})
			.await
			.unwrap_err(),
	);
	assert_eq!(errors.get("name"), Some(&[SCHEMA_NAME_TAKEN.to_string()][..]));
}

#[tokio::test]
async fn names_without_word_characters_are_rejected() {
	let notifier = Arc::new(RecordingNotifier::default());
	let service = service_with(notifier).await;

	for name in ["!!!", "Public"] {
		let errors = validation_errors(
			service
				.provision_customer(CustomerRegistration {
					name: Some(name.to_string()),
					owner: Some(registration("owner", "owner@example.com")),
				})
				.await
				.unwrap_err(),
		);
		assert!(errors.get("name").is_some(), "{name} should be rejected");
	}
}

#[tokio::test]
async fn failed_email_rolls_back_customer_and_owner() {
	let notifier = Arc::new(RecordingNotifier::failing());
	let service = service_with(notifier).await;

	let err = service
		.provision_customer(CustomerRegistration {
			name: Some("Globex".to_string()),
			owner: Some(registration("hank", "hank@globex.com")),
		})
		.await
		.unwrap_err();
	assert!(matches!(err, ProvisioningError::Notification(_)));

	assert!(service.list_customers().await.unwrap().is_empty());
	assert!(service.list_users().await.unwrap().is_empty());
	assert!(service.customer_by_name("Globex").await.unwrap().is_none());
}

#[tokio::test]
async fn preference_lifecycle() {
	let notifier = Arc::new(RecordingNotifier::default());
	let service = service_with(notifier).await;
	let user = service
		.register_user(registration("frank", "frank@example.com"))
		.await
		.unwrap();

	let created = service
		.create_preference(
			&user.id,
			PreferenceInput {
				name: Some(Some("dashboard".to_string())),
				description: Some(Some("layout".to_string())),
				preference: Some(json!({"columns": 3})),
			},
		)
		.await
		.unwrap();
	assert_eq!(created.name, "dashboard");

	let updated = service
		.update_preference(
			&user.id,
			&created.id,
			PreferenceInput {
				name: None,
				description: Some(None),
				preference: Some(json!({"columns": 4})),
			},
		)
		.await
		.unwrap();
	assert_eq!(updated.name, "dashboard");
	assert_eq!(updated.description, None);
	assert_eq!(
		service
			.get_preference(&user.id, &created.id)
			.await
			.unwrap()
			.preference,
		json!({"columns": 4})
	);

	service.delete_preference(&user.id, &created.id).await.unwrap();
	let err = service
		.get_preference(&user.id, &created.id)
		.await
		.unwrap_err();
	assert!(matches!(err, ProvisioningError::PreferenceNotFound));
	assert!(matches!(
		service.delete_preference(&user.id, &created.id).await.unwrap_err(),
		ProvisioningError::PreferenceNotFound
	));
}

#[tokio::test]
async fn unnamed_preference_gets_uuid_name() {
	let notifier = Arc::new(RecordingNotifier::default());
	let service = service_with(notifier).await;
	let user = service
		.register_user(registration("gina", "gina@example.com"))
		.await
		.unwrap();

	let created = service
		.create_preference(
			&user.id,
			PreferenceInput {
				preference: Some(json!({"anything": true})),
				..Default::default()
			},
		)
		.await
		.unwrap();
	assert!(Uuid::parse_str(&created.name).is_ok());
}

#[tokio::test]
async fn null_preference_name_is_rejected() {
	let notifier = Arc::new(RecordingNotifier::default());
	let service = service_with(notifier).await;
	let user = service
		.register_user(registration("nora", "nora@example.com"))
		.await
		.unwrap();

	let errors = validation_errors(
		service
			.create_preference(
				&user.id,
				PreferenceInput {
					name: Some(None),
					preference: Some(json!({"anything": true})),
					..Default::default()
				},
			)
			.await
			.unwrap_err(),
	);
	assert_eq!(errors.get("name"), Some(&[messages::NULL.to_string()][..]));
	assert_eq!(service.list_preferences(&user.id).await.unwrap().len(), 3);
}

#[tokio::test]
async fn invalid_catalog_values_are_non_field_errors() {
	let notifier = Arc::new(RecordingNotifier::default());
	let service = service_with(notifier).await;
	let user = service
		.register_user(registration("ivan", "ivan@example.com"))
		.await
		.unwrap();
	let currency = service
		.list_preferences(&user.id)
		.await
		.unwrap()
		.into_iter()
		.find(|p| p.name == "currency")
		.unwrap();

	let errors = validation_errors(
		service
			.update_preference(
				&user.id,
				&currency.id,
				PreferenceInput {
					preference: Some(json!({"currency": "DOGE"})),
					..Default::default()
				},
			)
			.await
			.unwrap_err(),
	);
	assert_eq!(
		errors.get("non_field_errors"),
		Some(&["Invalid currency: DOGE".to_string()][..])
	);

	let errors = validation_errors(
		service
			.create_preference(
				&user.id,
				PreferenceInput {
					name: Some(Some("timezone".to_string())),
					preference: Some(json!({"tz": "UTC"})),
					..Default::default()
				},
			)
			.await
			.unwrap_err(),
	);
	assert_eq!(
		errors.get("non_field_errors"),
		Some(&["Invalid timezone: None".to_string()][..])
	);
}

#[tokio::test]
async fn preference_names_are_unique_per_user() {
	let notifier = Arc::new(RecordingNotifier::default());
	let service = service_with(notifier).await;
	let user = service
		.register_user(registration("judy", "judy@example.com"))
		.await
		.unwrap();

	let errors = validation_errors(
		service
			.create_preference(
				&user.id,
				PreferenceInput {
					name: Some(Some("locale".to_string())),
					preference: Some(json!({"locale": "fr_FR.ISO8859-1"})),
					..Default::default()
				},
			)
			.await
			.unwrap_err(),
	);
	assert_eq!(errors.get("name"), Some(&[PREFERENCE_NAME_TAKEN.to_string()][..]));
}

#[tokio::test]
async fn preference_value_must_be_an_object() {
	let notifier = Arc::new(RecordingNotifier::default());
	let service = service_with(notifier).await;
	let user = service
		.register_user(registration("kim", "kim@example.com"))
		.await
		.unwrap();

	let errors = validation_errors(
		service
			.create_preference(
				&user.id,
				PreferenceInput {
					name: Some(Some("theme".to_string())),
					preference: Some(json!("dark")),
					..Default::default()
				},
			)
			.await
			.unwrap_err(),
	);
	assert_eq!(
		errors.get("preference"),
		Some(&[messages::NOT_AN_OBJECT.to_string()][..])
	);
}

#[tokio::test]
async fn preferences_of_unknown_user_are_not_found() {
	let notifier = Arc::new(RecordingNotifier::default());
	let service = service_with(notifier).await;
	let stranger = koku_server_iam::UserId::generate();

	let err = service
		.create_preference(
			&stranger,
			PreferenceInput {
				preference: Some(json!({})),
				..Default::default()
			},
		)
		.await
		.unwrap_err();
	assert!(matches!(err, ProvisioningError::UserNotFound));
	assert_eq!(err.status_code(), 404);
}

#[tokio::test]
async fn reset_token_changes_password_once() {
	let notifier = Arc::new(RecordingNotifier::default());
	let service = service_with(notifier.clone()).await;
	let user = service
		.register_user(registration("leo", "leo@example.com"))
		.await
		.unwrap();
	let token = notifier.sent()[0].reset_token;

	let change = PasswordChange {
		token: Some(token.to_string()),
		password: Some(Some(SecretString::new("n3w-passw0rd".to_string()))),
	};
	service.change_password(change.clone()).await.unwrap();

	let hash = UserRepository::new(service.pool().clone())
		.get_password_hash(&user.id)
		.await
		.unwrap()
		.unwrap();
	assert!(verify_password("n3w-passw0rd", &hash));

	let errors = validation_errors(service.change_password(change).await.unwrap_err());
	assert_eq!(
		errors.get("token"),
		Some(&[messages::INVALID_RESET_TOKEN.to_string()][..])
	);
}

#[tokio::test]
async fn expired_reset_token_is_rejected() {
	let notifier = Arc::new(RecordingNotifier::default());
	let service = service_with(notifier.clone())
		.await
		.with_reset_token_policy(ResetTokenPolicy::from_hours(0));
	service
		.register_user(registration("mia", "mia@example.com"))
		.await
		.unwrap();
	let token = notifier.sent()[0].reset_token;

	let errors = validation_errors(
		service
			.change_password(PasswordChange {
				token: Some(token.to_string()),
				password: Some(Some(SecretString::new("whatever".to_string()))),
			})
			.await
			.unwrap_err(),
	);
	assert!(errors.get("token").is_some());
}

#[tokio::test]
async fn password_change_requires_well_formed_input() {
	let notifier = Arc::new(RecordingNotifier::default());
	let service = service_with(notifier).await;

	let errors = validation_errors(
		service
			.change_password(PasswordChange {
				token: Some("not-a-uuid".to_string()),
				password: None,
			})
			.await
			.unwrap_err(),
	);
	assert_eq!(errors.get("token"), Some(&[messages::INVALID_UUID.to_string()][..]));
	assert_eq!(errors.get("password"), Some(&[messages::REQUIRED.to_string()][..]));

	let errors = validation_errors(
		service
			.change_password(PasswordChange {
				token: Some(Uuid::new_v4().to_string()),
				password: Some(Some(SecretString::new("fine".to_string()))),
			})
			.await
			.unwrap_err(),
	);
	assert!(errors.get("token").is_some());
}

#[tokio::test]
async fn users_for_unknown_customer_is_not_found() {
	let notifier = Arc::new(RecordingNotifier::default());
	let service = service_with(notifier).await;

	let err = service
		.users_for_customer(&koku_server_iam::CustomerId::generate())
		.await
		.unwrap_err();
	assert!(matches!(err, ProvisioningError::CustomerNotFound));
}
