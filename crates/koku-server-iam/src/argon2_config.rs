// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Argon2 parameters for password hashing.
//!
//! Release and debug builds use `Argon2::default()` (Argon2id, 19 MiB, 2
//! iterations). Unit tests use a 1 MiB, single-pass instance so that the
//! registration tests stay fast. The test parameters MUST NOT reach production.

use argon2::Argon2;
#[cfg(test)]
use argon2::{Algorithm, Params, Version};

#[inline]
pub(crate) fn argon2_instance() -> Argon2<'static> {
	#[cfg(test)]
	{
		let params = Params::new(1024, 1, 1, None).expect("valid Argon2 params for tests");
		Argon2::new(Algorithm::Argon2id, Version::V0x13, params)
	}

	#[cfg(not(test))]
	{
		Argon2::default()
	}
}
