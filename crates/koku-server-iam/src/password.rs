// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Password hashing and temporary password generation.

use argon2::password_hash::{
	rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString,
};
use koku_common_secret::SecretString;
use rand::seq::SliceRandom;

use crate::argon2_config::argon2_instance;
use crate::error::{IamError, Result};

pub const TEMPORARY_PASSWORD_LENGTH: usize = 10;

/// Punctuation, digits, then ASCII upper- and lowercase letters.
pub const TEMPORARY_PASSWORD_ALPHABET: &[u8] =
	b"!@#$%^&*()_+0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";

/// Hash `password` into an Argon2id PHC string.
pub fn hash_password(password: &str) -> Result<String> {
	let salt = SaltString::generate(&mut OsRng);
	argon2_instance()
		.hash_password(password.as_bytes(), &salt)
		.map(|hash| hash.to_string())
		.map_err(|e| IamError::PasswordHash(e.to_string()))
}

/// False for a mismatch and for a hash that does not parse.
pub fn verify_password(password: &str, hash: &str) -> bool {
	let Ok(parsed) = PasswordHash::new(hash) else {
		return false;
	};
	argon2_instance()
		.verify_password(password.as_bytes(), &parsed)
		.is_ok()
}

/// Password assigned when a user registers without one.
///
/// The user is expected to replace it through the reset link in the new user
/// login email.
pub fn generate_temporary_password() -> SecretString {
	let mut rng = rand::thread_rng();
	let password: String = (0..TEMPORARY_PASSWORD_LENGTH)
		.filter_map(|_| TEMPORARY_PASSWORD_ALPHABET.choose(&mut rng))
		.map(|&b| b as char)
		.collect();
	SecretString::new(password)
}

#[cfg(test)]
mod tests {
	use super::*;
	use proptest::prelude::*;

	#[test]
	fn hash_then_verify() {
		let hash = hash_password("s3cret!").unwrap();
		assert!(hash.starts_with("$argon2id$"));
		assert!(verify_password("s3cret!", &hash));
		assert!(!verify_password("wrong", &hash));
	}

	#[test]
	fn malformed_hash_never_verifies() {
		assert!(!verify_password("anything", "not-a-phc-string"));
	}

	#[test]
	fn same_password_gets_fresh_salt() {
		assert_ne!(hash_password("pw").unwrap(), hash_password("pw").unwrap());
	}

	#[test]
	fn temporary_passwords_vary() {
		let a = generate_temporary_password();
		let b = generate_temporary_password();
		assert_ne!(a.expose(), b.expose());
	}

	proptest! {
		#![proptest_config(ProptestConfig::with_cases(64))]

		#[test]
		fn temporary_password_shape(_seed in any::<u8>()) {
			let password = generate_temporary_password();
			prop_assert_eq!(password.char_count(), TEMPORARY_PASSWORD_LENGTH);
			prop_assert!(password
				.expose()
				.bytes()
				.all(|b| TEMPORARY_PASSWORD_ALPHABET.contains(&b)));
		}
	}
}
