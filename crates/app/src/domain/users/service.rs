//! Users service.

use std::sync::Arc;

use async_trait::async_trait;
use mockall::automock;
use tracing::{debug, warn};

use crate::{
    cache::{Cache, CachePolicy, keys},
    domain::users::{
        errors::UsersServiceError,
        models::{NewUser, NewUserRecord, User, UserQuery, UserUpdate, UserUuid},
        password::hash_password,
        repository::UsersRepository,
    },
    pagination::{Page, PageRequest},
};

/// Cache-aside users service: the repository is the source of truth and
/// cache failures are logged, never surfaced.
#[derive(Clone)]
pub struct CachedUsersService {
    repository: Arc<dyn UsersRepository>,
    cache: Arc<dyn Cache<User>>,
    policy: CachePolicy,
}

impl std::fmt::Debug for CachedUsersService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CachedUsersService")
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

impl CachedUsersService {
    #[must_use]
    pub fn new(
        repository: Arc<dyn UsersRepository>,
        cache: Arc<dyn Cache<User>>,
        policy: CachePolicy,
    ) -> Self {
        Self {
            repository,
            cache,
            policy,
        }
    }

    async fn ensure_email_free(
        &self,
        email: &str,
        owner: Option<UserUuid>,
    ) -> Result<(), UsersServiceError> {
        let existing = self
            .repository
            .get_by_email(email)
            .await
            .map_err(UsersServiceError::repository("check"))?;

        match existing {
            Some(user) if Some(user.uuid) != owner => {
                Err(UsersServiceError::AlreadyExists(email.to_string()))
            }
            _ => Ok(()),
        }
    }

    async fn remember(&self, user: &User) {
        let key = keys::entity(keys::USER_PREFIX, user.uuid);

        if let Err(error) = self.cache.set(&key, user, self.policy.ttl).await {
            warn!(%key, %error, "failed to cache user");
        }
    }

    async fn forget(&self, user: UserUuid) {
        let key = keys::entity(keys::USER_PREFIX, user);

        if let Err(error) = self.cache.delete(&key).await {
            warn!(%key, %error, "failed to evict user from cache");
        }
    }

    async fn invalidate_lists(&self) {
        if self.policy.list_ttl.is_none() {
            return;
        }

        let pattern = keys::list_pattern(keys::USER_PREFIX);

        if let Err(error) = self.cache.invalidate_pattern(&pattern).await {
            warn!(%pattern, %error, "failed to invalidate cached user lists");
        }
    }
}

#[async_trait]
impl UsersService for CachedUsersService {
    async fn create_user(&self, user: NewUser) -> Result<User, UsersServiceError> {
        self.ensure_email_free(&user.email, None).await?;

        let record = NewUserRecord {
            password_hash: hash_password(&user.password)?,
            name: user.name,
            email: user.email,
            phone: user.phone,
        };
        let email = record.email.clone();

        let created = self
            .repository
            .create(record)
            .await
            .map_err(UsersServiceError::write("create", email))?;

        self.remember(&created).await;
        self.invalidate_lists().await;

        Ok(created)
    }

    async fn get_user(&self, user: UserUuid) -> Result<User, UsersServiceError> {
        let key = keys::entity(keys::USER_PREFIX, user);

        match self.cache.get(&key).await {
            Ok(Some(cached)) => {
                debug!(%key, "user cache hit");
                return Ok(cached);
            }
            Ok(None) => debug!(%key, "user cache miss"),
            Err(error) => warn!(%key, %error, "user cache read failed"),
        }

        let found = self
            .repository
            .get_by_id(user)
            .await
            .map_err(UsersServiceError::repository("get"))?
            .ok_or(UsersServiceError::NotFound)?;

        self.remember(&found).await;

        Ok(found)
    }

    async fn update_user(
        &self,
        user: UserUuid,
        update: UserUpdate,
    ) -> Result<User, UsersServiceError> {
        let mut current = self.get_user(user).await?;

        if !update.email.is_empty() && update.email != current.email {
            self.ensure_email_free(&update.email, Some(user)).await?;
        }

        update.apply(&mut current);
        let email = current.email.clone();

        let updated = self
            .repository
            .update(current)
            .await
            .map_err(UsersServiceError::write("update", email))?;

        self.remember(&updated).await;
        self.invalidate_lists().await;

        Ok(updated)
    }

    async fn delete_user(&self, user: UserUuid) -> Result<(), UsersServiceError> {
        self.repository
            .delete(user)
            .await
            .map_err(UsersServiceError::repository("delete"))?;

        self.forget(user).await;
        self.invalidate_lists().await;

        Ok(())
    }

    async fn list_users(&self, query: UserQuery) -> Result<Page<User>, UsersServiceError> {
        let request = PageRequest::clamped(query.page, query.limit);
        let filter = query.filter;

        let key = keys::list(keys::USER_PREFIX, request, &[filter.search.as_str()]);

        if self.policy.list_ttl.is_some() {
            match self.cache.get_list(&key).await {
                Ok(Some(page)) => return Ok(page),
                Ok(None) => {}
                Err(error) => warn!(%key, %error, "user list cache read failed"),
            }
        }

        let (users, total) = self
            .repository
            .list(request, &filter)
            .await
            .map_err(UsersServiceError::repository("list"))?;

        let page = Page::new(users, total, request);

        if let Some(ttl) = self.policy.list_ttl
            && let Err(error) = self.cache.set_list(&key, &page, ttl).await
        {
            warn!(%key, %error, "failed to cache user list");
        }

        Ok(page)
    }
}

#[automock]
#[async_trait]
pub trait UsersService: Send + Sync {
    /// Register a user. Fails with `AlreadyExists` when the email is taken.
    async fn create_user(&self, user: NewUser) -> Result<User, UsersServiceError>;

    /// Retrieve a single user, from cache when possible.
    async fn get_user(&self, user: UserUuid) -> Result<User, UsersServiceError>;

    /// Merge the populated fields of `update` into the stored user.
    async fn update_user(&self, user: UserUuid, update: UserUpdate)
    -> Result<User, UsersServiceError>;

    /// Delete a user.
    async fn delete_user(&self, user: UserUuid) -> Result<(), UsersServiceError>;

    /// List users newest first.
    async fn list_users(&self, query: UserQuery) -> Result<Page<User>, UsersServiceError>;
}
