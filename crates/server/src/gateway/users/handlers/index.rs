//! User Index Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::QueryParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};

use mesh_app::rpc::users::ListUsersRequest;

use crate::{
    extensions::*,
    gateway::{
        GatewayState, page_window,
        response::{ApiError, ApiReply, Pagination, check},
        wire_int,
    },
};

use super::get::UserData;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct UsersResponse {
    /// The users on this page
    pub users: Vec<UserData>,

    pub pagination: Pagination,
}

/// User Index Handler
///
/// Lists users a page at a time. Missing or non-numeric `page` and
/// `limit` values fall back to the defaults.
#[endpoint(tags("users"), summary = "List Users")]
pub(crate) async fn handler(
    page: QueryParam<String, false>,
    limit: QueryParam<String, false>,
    search: QueryParam<String, false>,
    depot: &mut Depot,
) -> Result<ApiReply<UsersResponse>, ApiError> {
    let state = depot.obtain_or_500::<Arc<GatewayState>>()?;

    let window = page_window(page, limit);

    let response = state
        .users
        .list_users(ListUsersRequest {
            page: wire_int(window.page()),
            limit: wire_int(window.limit()),
            search: search.into_inner().unwrap_or_default(),
        })
        .await
        .map_err(|error| ApiError::from_rpc(error, "Failed to list users"))?;

    check(&response.status)?;

    Ok(ApiReply::ok(
        response.status.message,
        UsersResponse {
            pagination: Pagination::new(window, response.total),
            users: response.users.into_iter().map(Into::into).collect(),
        },
    ))
}
