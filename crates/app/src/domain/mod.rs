//! Mesh Domain Concerns

pub mod products;
pub mod store;
pub mod users;
