//! API document and Swagger UI for the gateway.

use salvo::{
    basic_auth::{BasicAuth, BasicAuthValidator},
    oapi::{OpenApi, swagger_ui::SwaggerUi},
    prelude::*,
};

use crate::config::docs::DocsConfig;

/// Where the generated document is served.
pub(crate) const OPENAPI_PATH: &str = "/api-doc/openapi.json";

/// Basic auth credentials guarding the docs.
#[derive(Debug, Clone)]
struct Credentials {
    username: String,
    password: String,
}

impl BasicAuthValidator for Credentials {
    async fn validate(&self, username: &str, password: &str, _depot: &mut Depot) -> bool {
        username == self.username && password == self.password
    }
}

/// Document and UI routes describing `api`. Behind basic auth when a
/// password is configured.
pub(crate) fn router(api: &Router, settings: &DocsConfig) -> Router {
    let doc = OpenApi::new(settings.title.clone(), settings.version.clone()).merge_router(api);

    let router = match settings.credentials() {
        Some((username, password)) => Router::new().hoop(BasicAuth::new(Credentials {
            username: username.to_string(),
            password: password.to_string(),
        })),
        None => Router::new(),
    };

    router
        .push(doc.into_router(OPENAPI_PATH))
        .push(SwaggerUi::new(OPENAPI_PATH).into_router("swagger"))
}
