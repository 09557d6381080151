// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Single-use password reset tokens.
//!
//! A token is issued alongside every new user and mailed in the new user
//! login email. The plaintext is a UUIDv4; only its SHA-256 hex digest is
//! persisted, so a leaked table cannot be replayed.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::types::{ResetTokenId, UserId};

pub const DEFAULT_RESET_TOKEN_TTL_HOURS: i64 = 24;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResetTokenPolicy {
	pub ttl: Duration,
}

impl ResetTokenPolicy {
	pub fn from_hours(hours: i64) -> Self {
		Self {
			ttl: Duration::hours(hours),
		}
	}
}

impl Default for ResetTokenPolicy {
	fn default() -> Self {
		Self::from_hours(DEFAULT_RESET_TOKEN_TTL_HOURS)
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResetToken {
	pub id: ResetTokenId,
	pub user_id: UserId,
	/// SHA-256 hex of the plaintext token.
	pub token_hash: String,
	pub created_at: DateTime<Utc>,
	pub expires_at: DateTime<Utc>,
	pub used_at: Option<DateTime<Utc>>,
}

impl ResetToken {
	/// Issue a token for `user_id`, returning the record and the plaintext.
	pub fn issue(user_id: UserId, policy: &ResetTokenPolicy) -> (Self, Uuid) {
		let plaintext = Uuid::new_v4();
		let now = Utc::now();
		let token = Self {
			id: ResetTokenId::generate(),
			user_id,
			token_hash: hash_reset_token(&plaintext),
			created_at: now,
			expires_at: now + policy.ttl,
			used_at: None,
		};
		(token, plaintext)
	}

	pub fn is_expired(&self) -> bool {
		Utc::now() >= self.expires_at
	}

	pub fn is_used(&self) -> bool {
		self.used_at.is_some()
	}

	pub fn is_valid(&self) -> bool {
		!self.is_used() && !self.is_expired()
	}
}

/// Digest over the hyphenated lowercase form, as mailed to the user.
pub fn hash_reset_token(token: &Uuid) -> String {
	let mut hasher = Sha256::new();
	hasher.update(token.hyphenated().to_string().as_bytes());
	hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
	use super::*;
	use proptest::prelude::*;

	#[test]
	fn issued_token_is_valid_and_hashed() {
		let user_id = UserId::generate();
		let (token, plaintext) = ResetToken::issue(user_id, &ResetTokenPolicy::default());

		assert!(token.is_valid());
		assert_eq!(token.user_id, user_id);
		assert_eq!(token.token_hash, hash_reset_token(&plaintext));
		assert_ne!(token.token_hash, plaintext.to_string());
		assert_eq!(token.expires_at - token.created_at, Duration::hours(24));
	}

	#[test]
	fn used_token_is_invalid() {
		let (mut token, _) = ResetToken::issue(UserId::generate(), &ResetTokenPolicy::default());
		token.used_at = Some(Utc::now());
		assert!(token.is_used());
		assert!(!token.is_valid());
	}

	#[test]
	fn expired_token_is_invalid() {
		let (token, _) = ResetToken::issue(UserId::generate(), &ResetTokenPolicy::from_hours(-1));
		assert!(token.is_expired());
		assert!(!token.is_valid());
	}

	#[test]
	fn hash_is_hex_sha256() {
		let hash = hash_reset_token(&Uuid::new_v4());
		assert_eq!(hash.len(), 64);
		assert!(hash.chars().all(|c| c.is_ascii_hexdigit()));
	}

	proptest! {
		#[test]
		fn distinct_tokens_hash_differently(a in any::<[u8; 16]>(), b in any::<[u8; 16]>()) {
			prop_assume!(a != b);
			prop_assert_ne!(
				hash_reset_token(&Uuid::from_bytes(a)),
				hash_reset_token(&Uuid::from_bytes(b))
			);
		}
	}
}
