// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! OpenAPI document served at `/api/openapi.json`.

use utoipa::OpenApi;

use crate::routes;

#[derive(OpenApi)]
#[openapi(
    info(title = "Koku IAM API", description = "User registration, customer provisioning and preferences"),
    paths(
        routes::health::health_check,
        routes::users::register_user,
        routes::users::list_users,
        routes::users::get_user,
        routes::customers::create_customer,
        routes::customers::get_customer,
        routes::customers::list_customer_users,
        routes::admin::list_customers,
        routes::admin::get_customer,
        routes::preferences::list_preferences,
        routes::preferences::create_preference,
        routes::preferences::get_preference,
        routes::preferences::update_preference,
        routes::preferences::delete_preference,
        routes::password::change_password,
    ),
    components(schemas(
        koku_server_api::RegisterUserRequest,
        koku_server_api::UserResponse,
        koku_server_api::CreateCustomerRequest,
        koku_server_api::CustomerResponse,
        koku_server_api::AdminCustomerResponse,
        koku_server_api::PreferenceRequest,
        koku_server_api::UserPreferenceResponse,
        koku_server_api::PasswordChangeRequest,
        koku_server_api::ErrorResponse,
        koku_server_api::HealthResponse,
        koku_server_api::HealthStatus,
    )),
    tags(
        (name = "health", description = "Liveness"),
        (name = "users", description = "User registration and password reset"),
        (name = "customers", description = "Tenant provisioning"),
        (name = "admin", description = "Operator views"),
        (name = "preferences", description = "Per-user preferences")
    )
)]
pub struct ApiDoc;
