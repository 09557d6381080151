// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Secret wrapper for passwords, SMTP credentials and temporary login
//! passwords.
//!
//! A [`Secret<T>`] prints as `[REDACTED]` through `Debug`, `Display` and
//! `Serialize`, and zeroizes its contents when dropped. The inner value is only
//! reachable through [`Secret::expose`].
//!
//! ```
//! use koku_common_secret::Secret;
//!
//! let password = Secret::new("hunter2".to_string());
//! assert_eq!(format!("{password}"), "[REDACTED]");
//! assert_eq!(password.expose(), "hunter2");
//! ```

pub mod env;

use std::fmt;
use zeroize::Zeroize;

pub use env::{load_secret_env, SecretEnvError};

/// Placeholder written wherever a secret would otherwise be rendered.
pub const REDACTED: &str = "[REDACTED]";

#[derive(Zeroize)]
#[zeroize(drop)]
pub struct Secret<T>
where
	T: Zeroize,
{
	inner: T,
}

pub type SecretString = Secret<String>;

impl<T> Secret<T>
where
	T: Zeroize,
{
	pub fn new(inner: T) -> Self {
		Self { inner }
	}

	pub fn expose(&self) -> &T {
		&self.inner
	}
}

impl SecretString {
	/// Number of characters in the wrapped string.
	pub fn char_count(&self) -> usize {
		self.inner.chars().count()
	}

	pub fn is_empty(&self) -> bool {
		self.inner.is_empty()
	}
}

impl From<String> for SecretString {
	fn from(value: String) -> Self {
		Secret::new(value)
	}
}

impl From<&str> for SecretString {
	fn from(value: &str) -> Self {
		Secret::new(value.to_string())
	}
}

impl<T> Clone for Secret<T>
where
	T: Zeroize + Clone,
{
	fn clone(&self) -> Self {
		Self::new(self.inner.clone())
	}
}

impl<T> fmt::Debug for Secret<T>
where
	T: Zeroize,
{
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_tuple("Secret").field(&REDACTED).finish()
	}
}

impl<T> fmt::Display for Secret<T>
where
	T: Zeroize,
{
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(REDACTED)
	}
}

impl<T> PartialEq for Secret<T>
where
	T: Zeroize + PartialEq,
{
	fn eq(&self, other: &Self) -> bool {
		self.inner == other.inner
	}
}

impl<T> Eq for Secret<T> where T: Zeroize + Eq {}

#[cfg(feature = "serde")]
mod serde_impl {
	use super::{Secret, REDACTED};
	use serde::{Deserialize, Deserializer, Serialize, Serializer};
	use zeroize::Zeroize;

	impl<T> Serialize for Secret<T>
	where
		T: Zeroize,
	{
		fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
		where
			S: Serializer,
		{
			serializer.serialize_str(REDACTED)
		}
	}

	impl<'de, T> Deserialize<'de> for Secret<T>
	where
		T: Deserialize<'de> + Zeroize,
	{
		fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
		where
			D: Deserializer<'de>,
		{
			T::deserialize(deserializer).map(Secret::new)
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use proptest::prelude::*;

	#[test]
	fn debug_and_display_hide_the_password() {
		let secret = SecretString::from("correct horse battery staple");

		assert_eq!(format!("{secret}"), REDACTED);
		let debug = format!("{secret:?}");
		assert!(debug.contains(REDACTED));
		assert!(!debug.contains("horse"));
	}

	#[test]
	fn option_of_secret_stays_redacted() {
		let secret: Option<SecretString> = Some("smtp-pass".into());
		assert!(!format!("{secret:?}").contains("smtp-pass"));
	}

	#[test]
	fn char_count_counts_unicode_scalars() {
		let secret = SecretString::from("pässwörd");
		assert_eq!(secret.char_count(), 8);
		assert!(!secret.is_empty());
	}

	#[cfg(feature = "serde")]
	#[test]
	fn serialize_redacts_and_deserialize_wraps() {
		let secret = SecretString::from("hunter2");
		let json = serde_json::to_string(&secret).unwrap();
		assert_eq!(json, format!("\"{REDACTED}\""));

		let parsed: SecretString = serde_json::from_str("\"hunter2\"").unwrap();
		assert_eq!(parsed.expose(), "hunter2");
	}

	proptest! {
		#[test]
		fn rendered_forms_never_contain_value(value in "[a-zA-Z0-9]{12,40}") {
			let secret = SecretString::from(value.clone());
			let display = format!("{secret}");
			let debug = format!("{secret:?}");
			prop_assert!(!display.contains(&value));
			prop_assert!(!debug.contains(&value));
		}

		#[test]
		fn equality_follows_inner(a in "[a-z]{1,16}", b in "[a-z]{1,16}") {
			prop_assert_eq!(SecretString::from(a.clone()) == SecretString::from(b.clone()), a == b);
		}
	}
}
