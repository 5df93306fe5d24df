//! User Models

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use crate::uuids::TypedUuid;

/// User UUID
pub type UserUuid = TypedUuid<User>;

/// User Model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub uuid: UserUuid,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub password_hash: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// New User Model, as submitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub password: String,
}

/// New User Record, ready to persist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUserRecord {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub password_hash: String,
}

/// User Update Model
///
/// Empty fields leave the stored value unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserUpdate {
    pub name: String,
    pub email: String,
    pub phone: String,
}

impl UserUpdate {
    /// Overlay the populated fields onto `user`.
    pub(crate) fn apply(self, user: &mut User) {
        if !self.name.is_empty() {
            user.name = self.name;
        }

        if !self.email.is_empty() {
            user.email = self.email;
        }

        if !self.phone.is_empty() {
            user.phone = self.phone;
        }
    }
}

/// User listing filters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserFilter {
    /// Substring of name or email.
    pub search: String,
}

/// User listing request, before page clamping.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserQuery {
    pub page: i64,
    pub limit: i64,
    pub filter: UserFilter,
}
