//! JSON-over-HTTP transport for the RPC contracts.
//!
//! Every method is `POST /rpc/<Service>/<Method>` with the request message as
//! the body. The reply body is always the response message; a status raised
//! by the handler also travels in the `x-rpc-code` and `x-rpc-message`
//! headers.

pub(crate) mod client;
pub(crate) mod server;
pub(crate) mod wire;
