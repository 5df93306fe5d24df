//! Users

pub mod errors;
pub mod models;
mod password;
pub mod repository;
pub mod service;

pub use errors::UsersServiceError;
pub use service::*;
