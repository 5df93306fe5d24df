//! Delete User Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};

use mesh_app::rpc::users::DeleteUserRequest;

use crate::{
    extensions::*,
    gateway::{
        GatewayState,
        response::{ApiError, ApiReply, NoData, check},
    },
};

/// Delete User Handler
///
/// Replies with `data: null`.
#[endpoint(
    tags("users"),
    summary = "Delete User",
    responses(
        (status_code = StatusCode::OK, description = "User deleted"),
        (status_code = StatusCode::NOT_FOUND, description = "User not found"),
    ),
)]
pub(crate) async fn handler(
    id: PathParam<String>,
    depot: &mut Depot,
) -> Result<ApiReply<NoData>, ApiError> {
    let state = depot.obtain_or_500::<Arc<GatewayState>>()?;

    let status = state
        .users
        .delete_user(DeleteUserRequest {
            id: id.into_inner(),
        })
        .await
        .map_err(|error| ApiError::from_rpc(error, "Failed to delete user"))?;

    check(&status)?;

    Ok(ApiReply::empty(status.message))
}
