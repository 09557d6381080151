// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Wire types for the Koku IAM REST API.
//!
//! Request bodies convert into `koku-server-provisioning` inputs; response
//! bodies are built from `koku-server-iam` entities. With the `openapi`
//! feature every type also derives a utoipa schema.

pub mod customers;
pub mod errors;
pub mod health;
pub mod password;
pub mod preferences;
mod serde_util;
pub mod users;

pub use customers::{AdminCustomerResponse, CreateCustomerRequest, CustomerResponse};
pub use errors::ErrorResponse;
pub use health::{HealthResponse, HealthStatus};
pub use password::PasswordChangeRequest;
pub use preferences::{PreferenceRequest, UserPreferenceResponse};
pub use users::{RegisterUserRequest, UserResponse};
