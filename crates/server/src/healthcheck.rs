//! Liveness Handlers

use salvo::{oapi::ToSchema, prelude::*};
use serde::{Deserialize, Serialize};

use crate::gateway::response::ApiReply;

/// Healthcheck payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub(crate) struct HealthResponse {
    /// Tier reporting
    pub service: String,

    /// Service status
    pub status: String,
}

impl HealthResponse {
    fn ok(name: &str) -> Self {
        Self {
            service: name.to_string(),
            status: "ok".to_string(),
        }
    }
}

/// Gateway liveness, wrapped in the API envelope.
#[endpoint(tags("health"), summary = "Gateway Health")]
pub(crate) async fn gateway() -> ApiReply<HealthResponse> {
    ApiReply::ok("Gateway is healthy", HealthResponse::ok("gateway"))
}

/// Domain service liveness.
#[handler]
pub(crate) async fn service(depot: &mut Depot) -> Json<HealthResponse> {
    let name = depot
        .get::<&'static str>(SERVICE_NAME_KEY)
        .copied()
        .unwrap_or("service");

    Json(HealthResponse::ok(name))
}

/// Depot key holding the name reported by [`service`].
pub(crate) const SERVICE_NAME_KEY: &str = "service_name";
