//! Get User Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::PathParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};

use mesh_app::{
    rpc::users::{GetUserRequest, UserMessage, UserResponse},
    status::StatusClass,
};

use crate::{
    extensions::*,
    gateway::{
        GatewayState,
        response::{ApiError, ApiReply, check},
    },
};

/// A user as the gateway returns it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub(crate) struct UserData {
    /// The unique identifier of the user
    pub id: String,

    pub name: String,

    pub email: String,

    /// E.164 phone number, empty when unset
    pub phone: String,

    /// Seconds since the Unix epoch
    pub created_at: i64,

    /// Seconds since the Unix epoch
    pub updated_at: i64,
}

impl From<UserMessage> for UserData {
    fn from(user: UserMessage) -> Self {
        UserData {
            id: user.id,
            name: user.name,
            email: user.email,
            phone: user.phone,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// Split a single-user reply into its message and payload.
pub(super) fn into_user(response: UserResponse) -> Result<(String, UserData), ApiError> {
    check(&response.status)?;

    let user = response.user.ok_or_else(|| {
        ApiError::new(StatusClass::Internal, "user service returned no user")
    })?;

    Ok((response.status.message, user.into()))
}

/// Get User Handler
#[endpoint(
    tags("users"),
    summary = "Get User",
    responses(
        (status_code = StatusCode::OK, description = "User found"),
        (status_code = StatusCode::BAD_REQUEST, description = "Malformed user id"),
        (status_code = StatusCode::NOT_FOUND, description = "User not found"),
    ),
)]
pub(crate) async fn handler(
    id: PathParam<String>,
    depot: &mut Depot,
) -> Result<ApiReply<UserData>, ApiError> {
    let state = depot.obtain_or_500::<Arc<GatewayState>>()?;

    let response = state
        .users
        .get_user(GetUserRequest {
            id: id.into_inner(),
        })
        .await
        .map_err(|error| ApiError::from_rpc(error, "Failed to get user"))?;

    let (message, user) = into_user(response)?;

    Ok(ApiReply::ok(message, user))
}
