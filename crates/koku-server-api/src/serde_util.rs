// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use serde::{Deserialize, Deserializer};

/// Keep an explicit `null` distinct from an omitted field.
///
/// Use with `#[serde(default, deserialize_with = "...")]`: an omitted field
/// becomes `None` through `default`, a present one `Some(value)` where the
/// value itself may be `None`.
pub(crate) fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
	T: Deserialize<'de>,
	D: Deserializer<'de>,
{
	Option::<T>::deserialize(deserializer).map(Some)
}
