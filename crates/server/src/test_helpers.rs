//! Test helpers.

use std::sync::Arc;

use salvo::prelude::*;

use mesh_app::{
    cache::CachePolicy,
    context::AppContext,
    rpc::{
        products::{MockProductRpc, ProductRpc, ProductRpcHandler},
        users::{MockUserRpc, UserRpc, UserRpcHandler},
    },
};

use crate::{
    config::docs::DocsConfig,
    gateway::{self, GatewayState},
};

fn strict_users_mock() -> MockUserRpc {
    let mut users = MockUserRpc::new();

    users.expect_create_user().never();
    users.expect_get_user().never();
    users.expect_update_user().never();
    users.expect_delete_user().never();
    users.expect_list_users().never();

    users
}

fn strict_products_mock() -> MockProductRpc {
    let mut products = MockProductRpc::new();

    products.expect_create_product().never();
    products.expect_get_product().never();
    products.expect_update_product().never();
    products.expect_delete_product().never();
    products.expect_list_products().never();

    products
}

fn gateway_service(users: Arc<dyn UserRpc>, products: Arc<dyn ProductRpc>) -> Service {
    Service::new(gateway::router(GatewayState::new(users, products)))
}

/// Gateway over a mocked user service.
pub(crate) fn users_gateway(users: MockUserRpc) -> Service {
    gateway_service(Arc::new(users), Arc::new(strict_products_mock()))
}

/// Gateway over a mocked product service.
pub(crate) fn products_gateway(products: MockProductRpc) -> Service {
    gateway_service(Arc::new(strict_users_mock()), Arc::new(products))
}

/// Gateway state wired straight to both handlers over in-memory storage.
pub(crate) fn gateway_state() -> Arc<GatewayState> {
    let app = AppContext::in_memory(CachePolicy::default());

    GatewayState::new(
        Arc::new(UserRpcHandler::new(app.users)),
        Arc::new(ProductRpcHandler::new(app.products)),
    )
}

pub(crate) fn in_memory_gateway() -> Service {
    Service::new(gateway::router(gateway_state()))
}

/// Docs enabled without credentials.
pub(crate) fn open_docs() -> DocsConfig {
    DocsConfig {
        enabled: true,
        title: "Mesh Gateway API".to_string(),
        version: "1.0.0".to_string(),
        username: "admin".to_string(),
        password: None,
    }
}
