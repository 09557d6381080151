// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Typed identifiers for IAM entities.
//!
//! Each identifier wraps a [`Uuid`] and serializes transparently as the UUID
//! string, which is also how the REST layer and the database represent them.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

macro_rules! define_id_type {
	($name:ident, $doc:expr) => {
		#[doc = $doc]
		#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
		#[serde(transparent)]
		pub struct $name(Uuid);

		impl $name {
			pub fn new(id: Uuid) -> Self {
				Self(id)
			}

			/// Generate a new random (v4) ID.
			pub fn generate() -> Self {
				Self(Uuid::new_v4())
			}

			pub fn into_inner(self) -> Uuid {
				self.0
			}

			pub fn as_uuid(&self) -> &Uuid {
				&self.0
			}
		}

		impl fmt::Display for $name {
			fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
				write!(f, "{}", self.0)
			}
		}

		impl FromStr for $name {
			type Err = uuid::Error;

			fn from_str(s: &str) -> Result<Self, Self::Err> {
				Uuid::parse_str(s).map(Self)
			}
		}

		impl From<Uuid> for $name {
			fn from(id: Uuid) -> Self {
				Self(id)
			}
		}

		impl From<$name> for Uuid {
			fn from(id: $name) -> Self {
				id.0
			}
		}
	};
}

define_id_type!(UserId, "Unique identifier for a user.");
define_id_type!(CustomerId, "Unique identifier for a customer (tenant).");
define_id_type!(PreferenceId, "Unique identifier for a user preference.");
define_id_type!(ResetTokenId, "Unique identifier for a password reset token.");
