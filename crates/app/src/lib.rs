//! User and product domain services with cache-aside storage and the RPC
//! handlers that expose them.

pub mod cache;
pub mod context;
pub mod database;
pub mod domain;
pub mod pagination;
pub mod rpc;
pub mod status;

#[cfg(test)]
mod test;

pub mod uuids;
