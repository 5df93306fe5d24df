//! Create User Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};

use mesh_app::rpc::{users, validation};

use crate::{
    extensions::*,
    gateway::{
        GatewayState,
        response::{ApiError, ApiReply},
    },
};

use super::get::{UserData, into_user};

/// Create User Request
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub(crate) struct CreateUserRequest {
    pub name: String,

    pub email: String,

    /// At least six characters
    pub password: String,

    /// Optional E.164 phone number
    pub phone: String,
}

impl From<CreateUserRequest> for users::CreateUserRequest {
    fn from(request: CreateUserRequest) -> Self {
        users::CreateUserRequest {
            name: request.name,
            email: request.email,
            password: request.password,
            phone: request.phone,
        }
    }
}

/// Create User Handler
#[endpoint(
    tags("users"),
    summary = "Create User",
    responses(
        (status_code = StatusCode::CREATED, description = "User created"),
        (status_code = StatusCode::BAD_REQUEST, description = "Invalid request"),
        (status_code = StatusCode::CONFLICT, description = "Email already registered"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "User service failure"),
    ),
)]
#[tracing::instrument(name = "gateway.users.create", skip_all)]
pub(crate) async fn handler(
    json: JsonBody<CreateUserRequest>,
    depot: &mut Depot,
) -> Result<ApiReply<UserData>, ApiError> {
    let state = depot.obtain_or_500::<Arc<GatewayState>>()?;

    let request = users::CreateUserRequest::from(json.into_inner());

    validation::create_user(&request).map_err(ApiError::invalid_request)?;

    let response = state
        .users
        .create_user(request)
        .await
        .map_err(|error| ApiError::from_rpc(error, "Failed to create user"))?;

    let (message, user) = into_user(response)?;

    Ok(ApiReply::created(message, user))
}
