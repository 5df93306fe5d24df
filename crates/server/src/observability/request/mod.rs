//! Request-level logging and request IDs.

mod request_ids;

use std::time::Instant;

use salvo::{
    Request, handler,
    prelude::{Depot, FlowCtrl, Response},
};
use tracing::Instrument as _;
use tracing::{error, info, warn};

use request_ids::REQUEST_ID_HEADER;

const REQUEST_ID_DEPOT_KEY: &str = "request_id";

/// Wrap each request in a span tagged with its request ID and log the outcome.
#[handler]
pub(crate) async fn request_logging(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    let started = Instant::now();

    let request_id = request_ids::resolve_request_id(req.header::<String>(REQUEST_ID_HEADER));

    depot.insert(REQUEST_ID_DEPOT_KEY, request_id.clone());

    request_ids::set_request_id_header(res, &request_id);

    let method = req.method().to_string();
    let path = req.uri().path().to_owned();
    let remote_addr = req.remote_addr().to_string();

    let span = tracing::info_span!(
        "http.request",
        request_id = %request_id,
        method = %method,
        path = %path,
        remote_addr = %remote_addr,
        status = tracing::field::Empty,
        duration_ms = tracing::field::Empty
    );

    ctrl.call_next(req, depot, res)
        .instrument(span.clone())
        .await;

    let status = request_ids::response_status_or_ok(res.status_code);
    let duration_ms = started.elapsed().as_millis();

    span.record("status", status.as_u16());
    span.record("duration_ms", duration_ms);

    span.in_scope(|| {
        if status.is_server_error() {
            error!(status = status.as_u16(), duration_ms, "server error response");
        } else if status.is_client_error() {
            warn!(status = status.as_u16(), duration_ms, "client error response");
        } else {
            info!(status = status.as_u16(), duration_ms, "request.completed");
        }
    });
}
