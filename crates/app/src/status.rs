//! Status envelope carried on every RPC reply.

use std::fmt::{Display, Formatter, Result as FmtResult};

use serde::{Deserialize, Serialize};

/// Outcome classes an RPC reply can report, numbered with the HTTP vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusClass {
    Ok,
    InvalidInput,
    NotFound,
    Conflict,
    Internal,
}

impl StatusClass {
    /// Numeric code placed on the wire.
    pub const fn code(self) -> i32 {
        match self {
            Self::Ok => 200,
            Self::InvalidInput => 400,
            Self::NotFound => 404,
            Self::Conflict => 409,
            Self::Internal => 500,
        }
    }

    /// Classify a numeric code. Anything unrecognised is treated as internal.
    pub const fn from_code(code: i32) -> Self {
        match code {
            200 => Self::Ok,
            400 => Self::InvalidInput,
            404 => Self::NotFound,
            409 => Self::Conflict,
            _ => Self::Internal,
        }
    }
}

impl Display for StatusClass {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        Display::fmt(&self.code(), f)
    }
}

/// `{code, message, success}` triple embedded in every reply body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusEnvelope {
    pub code: i32,
    pub message: String,
    pub success: bool,
}

impl StatusEnvelope {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            code: StatusClass::Ok.code(),
            message: message.into(),
            success: true,
        }
    }

    pub fn failure(class: StatusClass, message: impl Into<String>) -> Self {
        Self {
            code: class.code(),
            message: message.into(),
            success: false,
        }
    }

    pub const fn class(&self) -> StatusClass {
        StatusClass::from_code(self.code)
    }
}

impl Default for StatusEnvelope {
    fn default() -> Self {
        Self::failure(StatusClass::Internal, "missing status")
    }
}
