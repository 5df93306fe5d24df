//! User service wire messages.

use serde::{Deserialize, Serialize};

use crate::{
    domain::users::models::{NewUser, User, UserUpdate},
    rpc::RpcMessage,
    status::StatusEnvelope,
};

/// A user as it crosses the wire. The password hash never leaves the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserMessage {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    /// Seconds since the Unix epoch.
    pub created_at: i64,
    pub updated_at: i64,
}

impl From<User> for UserMessage {
    fn from(user: User) -> Self {
        Self {
            id: user.uuid.to_string(),
            name: user.name,
            email: user.email,
            phone: user.phone,
            created_at: user.created_at.as_second(),
            updated_at: user.updated_at.as_second(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CreateUserRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub phone: String,
}

impl From<CreateUserRequest> for NewUser {
    fn from(request: CreateUserRequest) -> Self {
        Self {
            name: request.name,
            email: request.email,
            phone: request.phone,
            password: request.password,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetUserRequest {
    pub id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UpdateUserRequest {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
}

impl From<UpdateUserRequest> for UserUpdate {
    fn from(request: UpdateUserRequest) -> Self {
        Self {
            name: request.name,
            email: request.email,
            phone: request.phone,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteUserRequest {
    pub id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListUsersRequest {
    pub page: i32,
    pub limit: i32,
    pub search: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserResponse {
    pub user: Option<UserMessage>,
    #[serde(default)]
    pub status: StatusEnvelope,
}

impl RpcMessage for UserResponse {
    fn from_status(status: StatusEnvelope) -> Self {
        Self { user: None, status }
    }

    fn status(&self) -> &StatusEnvelope {
        &self.status
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListUsersResponse {
    #[serde(default)]
    pub users: Vec<UserMessage>,
    #[serde(default)]
    pub total: i64,
    #[serde(default)]
    pub status: StatusEnvelope,
}

impl RpcMessage for ListUsersResponse {
    fn from_status(status: StatusEnvelope) -> Self {
        Self {
            users: Vec::new(),
            total: 0,
            status,
        }
    }

    fn status(&self) -> &StatusEnvelope {
        &self.status
    }
}
