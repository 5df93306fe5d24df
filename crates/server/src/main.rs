//! Mesh Server
//!
//! One binary for all three tiers: the HTTP gateway and the user and
//! product RPC services it relays to.

use std::process;

use salvo::{prelude::*, trailing_slash::remove_slash};
use thiserror::Error;
use tracing::{error, info};

use mesh_app::{
    context::{AppContext, AppInitError},
    rpc::{products::ProductRpcHandler, users::UserRpcHandler},
};

use crate::{
    config::{Command, ConfigError, ServerConfig, ServiceConfig},
    gateway::GatewayState,
};

mod config;
mod extensions;
mod gateway;
mod healthcheck;
mod observability;
mod rpc;
mod shutdown;
#[cfg(test)]
mod test_helpers;

#[derive(Debug, Error)]
enum ServerError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to initialize app context: {0}")]
    App(#[from] AppInitError),

    #[error("failed to build rpc client: {0}")]
    Client(#[from] reqwest::Error),
}

/// Mesh server entry point
#[tokio::main]
pub async fn main() {
    // Load configuration from .env and CLI arguments
    let config = ServerConfig::load().unwrap_or_else(|e| e.exit());

    if let Err(e) = observability::init_subscriber(&config.logging) {
        #[expect(
            clippy::print_stderr,
            reason = "logging not initialized yet, must use eprintln for setup errors"
        )]
        {
            eprintln!("Logging error: {e}");
        }

        process::exit(1);
    }

    let service = config.service_name();

    if let Err(run_error) = run(config).await {
        error!(service, "{run_error}");

        process::exit(1);
    }
}

async fn run(config: ServerConfig) -> Result<(), ServerError> {
    let service = config.service_name();
    let upstream = config.upstream;

    match config.command {
        Command::Gateway(gateway) => {
            let state = GatewayState::connect(&upstream)?;

            info!(
                users = %upstream.user_service_url(),
                products = %upstream.product_service_url(),
                "relaying to domain services"
            );

            let routes = gateway::routes(state, &gateway.docs);

            if gateway.docs.enabled {
                info!(
                    service,
                    protected = gateway.docs.credentials().is_some(),
                    "serving API docs at /swagger"
                );
            }

            serve(
                gateway::with_cors(layered(routes)),
                gateway.socket_addr(),
                service,
            )
            .await;
        }
        Command::Users(settings) => {
            let app = connect(&settings).await?;
            let router =
                rpc::server::user_router(UserRpcHandler::new(app.users), upstream.rpc_timeout());

            serve(
                Service::new(layered(router)),
                upstream.user_service_addr(),
                service,
            )
            .await;
        }
        Command::Products(settings) => {
            let app = connect(&settings).await?;
            let router = rpc::server::product_router(
                ProductRpcHandler::new(app.products),
                upstream.rpc_timeout(),
            );

            serve(
                Service::new(layered(router)),
                upstream.product_service_addr(),
                service,
            )
            .await;
        }
    }

    Ok(())
}

async fn connect(settings: &ServiceConfig) -> Result<AppContext, ServerError> {
    let store = settings.database.store_settings()?;

    Ok(AppContext::connect(&store, &settings.cache.settings(), settings.cache.policy()).await?)
}

/// Hoops shared by every tier.
fn layered(routes: Router) -> Router {
    Router::new()
        .hoop(CatchPanic::new())
        .hoop(remove_slash())
        .hoop(observability::request_logging)
        .push(routes)
}

/// Serve `app` on `addr` until a shutdown signal arrives.
async fn serve(app: Service, addr: String, service: &'static str) {
    info!(service, "starting server on {addr}");

    // Bind server
    let listener = TcpListener::new(addr).bind().await;

    let server = Server::new(listener);

    let handle = server.handle();

    // Listen for shutdown signal
    tokio::spawn(async move {
        if let Err(error) = shutdown::listen(handle, service).await {
            error!(service, "failed to listen for shutdown signal: {error}");
        }
    });

    // Start serving requests
    server.serve(app).await;

    info!(service, "server stopped");
}
