//! RPC contracts and the handlers serving them.
//!
//! A handler produces a [`Reply`]: the response message, whose embedded
//! [`StatusEnvelope`] always describes the outcome, plus an [`RpcStatus`]
//! on the error channel when the call failed.

use thiserror::Error;

use crate::status::{StatusClass, StatusEnvelope};

pub mod products;
pub mod users;
pub mod validation;

/// Status raised on the transport's error channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RpcStatus {
    pub class: StatusClass,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RpcError {
    /// The server answered with a failure status.
    #[error("{} (code {})", .0.message, .0.class)]
    Status(RpcStatus),

    /// The server could not be reached or its reply could not be read.
    #[error("service unavailable: {0}")]
    Unavailable(String),
}

/// A response message that carries a status envelope.
pub trait RpcMessage: Sized {
    /// A message holding nothing but `status`.
    fn from_status(status: StatusEnvelope) -> Self;

    fn status(&self) -> &StatusEnvelope;
}

impl RpcMessage for StatusEnvelope {
    fn from_status(status: StatusEnvelope) -> Self {
        status
    }

    fn status(&self) -> &StatusEnvelope {
        self
    }
}

/// Handler output.
#[derive(Debug, Clone, PartialEq)]
pub struct Reply<T> {
    pub body: T,
    pub status: Option<RpcStatus>,
}

impl<T: RpcMessage> Reply<T> {
    pub fn ok(body: T) -> Self {
        Self { body, status: None }
    }

    /// A failure reported both in the body and on the error channel.
    pub fn failed(class: StatusClass, message: impl Into<String>) -> Self {
        let message = message.into();

        Self {
            body: T::from_status(StatusEnvelope::failure(class, message.clone())),
            status: Some(RpcStatus { class, message }),
        }
    }

    /// Collapse into the client-side view: a raised status wins over the body.
    ///
    /// # Errors
    ///
    /// Returns [`RpcError::Status`] when the handler raised one.
    pub fn into_result(self) -> Result<T, RpcError> {
        match self.status {
            Some(status) => Err(RpcError::Status(status)),
            None => Ok(self.body),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failed_replies_carry_the_status_twice() {
        let reply = Reply::<StatusEnvelope>::failed(StatusClass::NotFound, "user not found");

        assert_eq!(reply.body.code, 404);
        assert!(!reply.body.success);
        assert_eq!(
            reply.status,
            Some(RpcStatus {
                class: StatusClass::NotFound,
                message: "user not found".to_string(),
            })
        );
    }

    #[test]
    fn raised_status_wins_over_the_body() {
        let reply = Reply::<StatusEnvelope>::failed(StatusClass::Conflict, "taken");

        assert_eq!(
            reply.into_result(),
            Err(RpcError::Status(RpcStatus {
                class: StatusClass::Conflict,
                message: "taken".to_string(),
            }))
        );
    }

    #[test]
    fn ok_replies_pass_the_body_through() {
        let envelope = StatusEnvelope::ok("User deleted successfully");

        assert_eq!(Reply::ok(envelope.clone()).into_result(), Ok(envelope));
    }
}
