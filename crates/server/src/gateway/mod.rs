//! HTTP gateway relaying REST calls to the domain services.

use std::sync::Arc;

use salvo::{
    affix_state::inject,
    cors::{Any, Cors},
    oapi::extract::QueryParam,
    prelude::*,
};

use mesh_app::pagination::{DEFAULT_LIMIT, DEFAULT_PAGE, PageRequest};

use crate::{config::docs::DocsConfig, healthcheck};

pub(crate) mod docs;
pub(crate) mod products;
pub(crate) mod response;
pub(crate) mod state;
pub(crate) mod users;

pub(crate) use state::GatewayState;

/// `/api/v1` routes over the given upstreams.
pub(crate) fn router(state: Arc<GatewayState>) -> Router {
    Router::with_path("api/v1")
        .hoop(inject(state))
        .push(Router::with_path("health").get(healthcheck::gateway))
        .push(
            Router::with_path("users")
                .get(users::index::handler)
                .post(users::create::handler)
                .push(
                    Router::with_path("{id}")
                        .get(users::get::handler)
                        .put(users::update::handler)
                        .delete(users::delete::handler),
                ),
        )
        .push(
            Router::with_path("products")
                .get(products::index::handler)
                .post(products::create::handler)
                .push(
                    Router::with_path("{id}")
                        .get(products::get::handler)
                        .put(products::update::handler)
                        .delete(products::delete::handler),
                ),
        )
}

/// The API plus, when enabled, its API document and Swagger UI.
pub(crate) fn routes(state: Arc<GatewayState>, settings: &DocsConfig) -> Router {
    let api = router(state);

    let docs = settings.enabled.then(|| docs::router(&api, settings));

    let routes = Router::new().push(api);

    match docs {
        Some(docs) => routes.push(docs),
        None => routes,
    }
}

/// Wrap `router` in a service answering cross-origin requests from any origin.
pub(crate) fn with_cors(router: Router) -> Service {
    let cors = Cors::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
        .into_handler();

    Service::new(router).hoop(cors)
}

/// Page window from `page`/`limit` query parameters. Missing or
/// non-numeric values fall back to the defaults before clamping.
fn page_window(page: QueryParam<String, false>, limit: QueryParam<String, false>) -> PageRequest {
    let number = |param: QueryParam<String, false>, default: u32| {
        param
            .into_inner()
            .and_then(|value| value.parse::<i64>().ok())
            .unwrap_or(i64::from(default))
    };

    PageRequest::clamped(number(page, DEFAULT_PAGE), number(limit, DEFAULT_LIMIT))
}

/// Page numbers travel as `i32` on the wire.
fn wire_int(value: u32) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}
