// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Account and tenant provisioning for Koku.
//!
//! [`ProvisioningService`] validates registration input the way the REST
//! clients expect (field errors collected together, nested owner errors
//! under `owner.*`) and performs each create flow in a single transaction.
//! The new user login email is sent before commit, so a delivery failure
//! leaves nothing behind.

pub mod error;
pub mod notifier;
pub mod request;
pub mod service;

pub use error::{ProvisioningError, Result};
pub use notifier::{IamNotifier, NotifyError};
pub use request::{
	CustomerRegistration, CustomerWithOwner, PasswordChange, PreferenceInput, UserRegistration,
};
pub use service::ProvisioningService;
