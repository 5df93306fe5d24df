//! Update User Handler

use std::sync::Arc;

use salvo::{
    oapi::{
        ToSchema,
        extract::{JsonBody, PathParam},
    },
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

/// Update User Request
///
/// Empty fields leave the stored values unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub(crate) struct UpdateUserRequest {
    pub name: String,
    pub email: String,
    pub phone: String,
}

impl UpdateUserRequest {
    fn for_user(self, id: String) -> users::UpdateUserRequest {
        users::UpdateUserRequest {
            id,
            name: self.name,
            email: self.email,
            phone: self.phone,
        }
    }
}

/// Update User Handler
#[endpoint(
    tags("users"),
    summary = "Update User",
    responses(
        (status_code = StatusCode::OK, description = "User updated"),
        (status_code = StatusCode::BAD_REQUEST, description = "Invalid request"),
        (status_code = StatusCode::NOT_FOUND, description = "User not found"),
        (status_code = StatusCode::CONFLICT, description = "Email already registered"),
    ),
)]
#[tracing::instrument(name = "gateway.users.update", skip_all)]
pub(crate) async fn handler(
    id: PathParam<String>,
    json: JsonBody<UpdateUserRequest>,
    depot: &mut Depot,
) -> Result<ApiReply<UserData>, ApiError> {
    let state = depot.obtain_or_500::<Arc<GatewayState>>()?;

    let request = json.into_inner().for_user(id.into_inner());

    validation::update_user(&request).map_err(ApiError::invalid_request)?;

    let response = state
        .users
        .update_user(request)
        .await
        .map_err(|error| ApiError::from_rpc(error, "Failed to update user"))?;

    let (message, user) = into_user(response)?;

    Ok(ApiReply::ok(message, user))
}
