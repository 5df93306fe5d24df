//! User RPC handler: maps domain outcomes onto replies and status codes.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::warn;

use crate::{
    domain::users::{
        UsersService, UsersServiceError,
        models::{UserFilter, UserQuery, UserUuid},
    },
    rpc::{
        Reply, RpcError, RpcMessage, validation,
        users::{
            UserRpc,
            messages::{
                CreateUserRequest, DeleteUserRequest, GetUserRequest, ListUsersRequest,
                ListUsersResponse, UpdateUserRequest, UserResponse,
            },
        },
    },
    status::{StatusClass, StatusEnvelope},
};

/// Serves the user RPC contract on top of a [`UsersService`].
#[derive(Clone)]
pub struct UserRpcHandler {
    service: Arc<dyn UsersService>,
}

impl std::fmt::Debug for UserRpcHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserRpcHandler").finish_non_exhaustive()
    }
}

fn classify(error: &UsersServiceError) -> StatusClass {
    match error {
        UsersServiceError::NotFound => StatusClass::NotFound,
        UsersServiceError::AlreadyExists(_) => StatusClass::Conflict,
        UsersServiceError::Repository { .. } | UsersServiceError::PasswordHash(_) => {
            StatusClass::Internal
        }
    }
}

fn failed<T: RpcMessage>(operation: &str, error: &UsersServiceError) -> Reply<T> {
    let class = classify(error);

    if class == StatusClass::Internal {
        warn!(operation, %error, "user rpc failed");
    }

    Reply::failed(class, error.to_string())
}

fn parse_id<T: RpcMessage>(id: &str) -> Result<UserUuid, Reply<T>> {
    id.parse().map_err(|error| {
        Reply::failed(
            StatusClass::InvalidInput,
            format!("invalid user id {id:?}: {error}"),
        )
    })
}

impl UserRpcHandler {
    #[must_use]
    pub fn new(service: Arc<dyn UsersService>) -> Self {
        Self { service }
    }

    pub async fn handle_create(&self, request: CreateUserRequest) -> Reply<UserResponse> {
        if let Err(error) = validation::create_user(&request) {
            return Reply::failed(StatusClass::InvalidInput, error.to_string());
        }

        match self.service.create_user(request.into()).await {
            Ok(user) => Reply::ok(UserResponse {
                user: Some(user.into()),
                status: StatusEnvelope::ok("User created successfully"),
            }),
            Err(error) => failed("create", &error),
        }
    }

    pub async fn handle_get(&self, request: GetUserRequest) -> Reply<UserResponse> {
        let user = match parse_id(&request.id) {
            Ok(user) => user,
            Err(reply) => return reply,
        };

        match self.service.get_user(user).await {
            Ok(user) => Reply::ok(UserResponse {
                user: Some(user.into()),
                status: StatusEnvelope::ok("User retrieved successfully"),
            }),
            Err(error) => failed("get", &error),
        }
    }

    pub async fn handle_update(&self, request: UpdateUserRequest) -> Reply<UserResponse> {
        let user = match parse_id(&request.id) {
            Ok(user) => user,
            Err(reply) => return reply,
        };

        if let Err(error) = validation::update_user(&request) {
            return Reply::failed(StatusClass::InvalidInput, error.to_string());
        }

        match self.service.update_user(user, request.into()).await {
            Ok(user) => Reply::ok(UserResponse {
                user: Some(user.into()),
                status: StatusEnvelope::ok("User updated successfully"),
            }),
            Err(error) => failed("update", &error),
        }
    }

    pub async fn handle_delete(&self, request: DeleteUserRequest) -> Reply<StatusEnvelope> {
        let user = match parse_id(&request.id) {
            Ok(user) => user,
            Err(reply) => return reply,
        };

        match self.service.delete_user(user).await {
            Ok(()) => Reply::ok(StatusEnvelope::ok("User deleted successfully")),
            Err(error) => failed("delete", &error),
        }
    }

    pub async fn handle_list(&self, request: ListUsersRequest) -> Reply<ListUsersResponse> {
        let query = UserQuery {
            page: i64::from(request.page),
            limit: i64::from(request.limit),
            filter: UserFilter {
                search: request.search,
            },
        };

        match self.service.list_users(query).await {
            Ok(page) => Reply::ok(ListUsersResponse {
                total: i64::try_from(page.total).unwrap_or(i64::MAX),
                users: page.items.into_iter().map(Into::into).collect(),
                status: StatusEnvelope::ok("Users retrieved successfully"),
            }),
            Err(error) => failed("list", &error),
        }
    }
}

#[async_trait]
impl UserRpc for UserRpcHandler {
    async fn create_user(&self, request: CreateUserRequest) -> Result<UserResponse, RpcError> {
        self.handle_create(request).await.into_result()
    }

    async fn get_user(&self, request: GetUserRequest) -> Result<UserResponse, RpcError> {
        self.handle_get(request).await.into_result()
    }

    async fn update_user(&self, request: UpdateUserRequest) -> Result<UserResponse, RpcError> {
        self.handle_update(request).await.into_result()
    }

    async fn delete_user(&self, request: DeleteUserRequest) -> Result<StatusEnvelope, RpcError> {
        self.handle_delete(request).await.into_result()
    }

    async fn list_users(&self, request: ListUsersRequest) -> Result<ListUsersResponse, RpcError> {
        self.handle_list(request).await.into_result()
    }
}

#[cfg(test)]
mod tests {
    use jiff::Timestamp;
    use testresult::TestResult;

    use super::*;
    use crate::{
        domain::{
            store::RepositoryError,
            users::{MockUsersService, models::User},
        },
        pagination::{Page, PageRequest},
        rpc::RpcStatus,
    };

    fn user() -> User {
        User {
            uuid: UserUuid::new(),
            name: "Ann".to_string(),
            email: "ann@example.com".to_string(),
            phone: String::new(),
            password_hash: "$argon2id$secret".to_string(),
            created_at: Timestamp::from_second(1_700_000_000).unwrap_or(Timestamp::UNIX_EPOCH),
            updated_at: Timestamp::from_second(1_700_000_100).unwrap_or(Timestamp::UNIX_EPOCH),
        }
    }

    fn handler(service: MockUsersService) -> UserRpcHandler {
        UserRpcHandler::new(Arc::new(service))
    }

    #[tokio::test]
    async fn get_maps_the_entity_without_the_password() -> TestResult {
        let stored = user();
        let id = stored.uuid;
        let mut service = MockUsersService::new();

        service
            .expect_get_user()
            .once()
            .withf(move |user| *user == id)
            .return_once(move |_| Ok(stored));

        let reply = handler(service)
            .handle_get(GetUserRequest { id: id.to_string() })
            .await;

        assert_eq!(reply.status, None);
        assert_eq!(reply.body.status, StatusEnvelope::ok("User retrieved successfully"));

        let message = reply.body.user.ok_or("missing user")?;
        assert_eq!(message.id, id.to_string());
        assert_eq!(message.created_at, 1_700_000_000);
        assert_eq!(message.updated_at, 1_700_000_100);

        let json = serde_json::to_string(&message)?;
        assert!(!json.contains("argon2"), "password hash leaked: {json}");

        Ok(())
    }

    #[tokio::test]
    async fn not_found_becomes_404_on_both_channels() -> TestResult {
        let mut service = MockUsersService::new();

        service
            .expect_get_user()
            .once()
            .return_once(|_| Err(UsersServiceError::NotFound));

        let reply = handler(service)
            .handle_get(GetUserRequest {
                id: UserUuid::new().to_string(),
            })
            .await;

        assert_eq!(
            reply.body.status,
            StatusEnvelope::failure(StatusClass::NotFound, "user not found")
        );
        assert_eq!(reply.body.user, None);
        assert_eq!(
            reply.status,
            Some(RpcStatus {
                class: StatusClass::NotFound,
                message: "user not found".to_string(),
            })
        );

        Ok(())
    }

    #[tokio::test]
    async fn conflicts_become_409() -> TestResult {
        let mut service = MockUsersService::new();

        service
            .expect_create_user()
            .once()
            .return_once(|user| Err(UsersServiceError::AlreadyExists(user.email)));

        let reply = handler(service)
            .handle_create(CreateUserRequest {
                name: "Ann".to_string(),
                email: "ann@example.com".to_string(),
                password: "secret1".to_string(),
                phone: String::new(),
            })
            .await;

        assert_eq!(reply.body.status.code, 409);
        assert_eq!(
            reply.body.status.message,
            "user with email ann@example.com already exists"
        );

        Ok(())
    }

    #[tokio::test]
    async fn storage_failures_become_500() -> TestResult {
        let mut service = MockUsersService::new();

        service.expect_delete_user().once().return_once(|_| {
            Err(UsersServiceError::Repository {
                operation: "delete",
                source: RepositoryError::Storage(sqlx::Error::PoolTimedOut),
            })
        });

        let reply = handler(service)
            .handle_delete(DeleteUserRequest {
                id: UserUuid::new().to_string(),
            })
            .await;

        assert_eq!(reply.body.code, 500);
        assert!(reply.body.message.starts_with("failed to delete user: "));

        Ok(())
    }

    #[tokio::test]
    async fn invalid_ids_and_input_never_reach_the_service() -> TestResult {
        let mut service = MockUsersService::new();
        service.expect_get_user().never();
        service.expect_create_user().never();
        let handler = handler(service);

        let reply = handler
            .handle_get(GetUserRequest {
                id: "not-a-uuid".to_string(),
            })
            .await;
        assert_eq!(reply.body.status.code, 400);

        let reply = handler
            .handle_create(CreateUserRequest {
                name: "Ann".to_string(),
                email: "not-an-email".to_string(),
                password: "secret1".to_string(),
                phone: String::new(),
            })
            .await;
        assert_eq!(reply.body.status.code, 400);
        assert_eq!(reply.body.status.message, "invalid email format");

        Ok(())
    }

    #[tokio::test]
    async fn list_carries_items_and_raw_total() -> TestResult {
        let mut service = MockUsersService::new();

        service
            .expect_list_users()
            .once()
            .withf(|query| query.page == 2 && query.limit == 1 && query.filter.search == "ann")
            .return_once(|_| Ok(Page::new(vec![user()], 7, PageRequest::clamped(2, 1))));

        let response = handler(service)
            .list_users(ListUsersRequest {
                page: 2,
                limit: 1,
                search: "ann".to_string(),
            })
            .await?;

        assert_eq!(response.users.len(), 1);
        assert_eq!(response.total, 7);
        assert_eq!(response.status.message, "Users retrieved successfully");

        Ok(())
    }

    #[tokio::test]
    async fn in_process_contract_raises_failures() -> TestResult {
        let mut service = MockUsersService::new();

        service
            .expect_delete_user()
            .once()
            .return_once(|_| Err(UsersServiceError::NotFound));

        let result = handler(service)
            .delete_user(DeleteUserRequest {
                id: UserUuid::new().to_string(),
            })
            .await;

        assert!(matches!(
            result,
            Err(RpcError::Status(RpcStatus {
                class: StatusClass::NotFound,
                ..
            }))
        ));

        Ok(())
    }
}
