use std::{cmp::Reverse, collections::HashMap, sync::Arc};

use async_trait::async_trait;
use jiff::Timestamp;
use parking_lot::RwLock;

use crate::{
    domain::{
        store::{RepositoryError, contains_ignore_case, next_timestamp},
        users::{
            models::{NewUserRecord, User, UserFilter, UserUuid},
            repository::UsersRepository,
        },
    },
    pagination::PageRequest,
};

/// Users held in a process-local map. Emails are unique, mirroring the
/// Postgres index.
#[derive(Debug, Clone, Default)]
pub struct MemoryUsersRepository {
    rows: Arc<RwLock<HashMap<UserUuid, User>>>,
}

impl MemoryUsersRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn matches(filter: &UserFilter, user: &User) -> bool {
    filter.search.is_empty()
        || contains_ignore_case(&user.name, &filter.search)
        || contains_ignore_case(&user.email, &filter.search)
}

#[async_trait]
impl UsersRepository for MemoryUsersRepository {
    async fn create(&self, user: NewUserRecord) -> Result<User, RepositoryError> {
        let mut rows = self.rows.write();

        if rows.values().any(|existing| existing.email == user.email) {
            return Err(RepositoryError::AlreadyExists("email"));
        }

        let now = Timestamp::now();
        let created = User {
            uuid: UserUuid::new(),
            name: user.name,
            email: user.email,
            phone: user.phone,
            password_hash: user.password_hash,
            created_at: now,
            updated_at: now,
        };

        rows.insert(created.uuid, created.clone());

        Ok(created)
    }

    async fn get_by_id(&self, user: UserUuid) -> Result<Option<User>, RepositoryError> {
        Ok(self.rows.read().get(&user).cloned())
    }

    async fn get_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError> {
        Ok(self
            .rows
            .read()
            .values()
            .find(|user| user.email == email)
            .cloned())
    }

    async fn update(&self, user: User) -> Result<User, RepositoryError> {
        let mut rows = self.rows.write();

        if rows
            .values()
            .any(|existing| existing.uuid != user.uuid && existing.email == user.email)
        {
            return Err(RepositoryError::AlreadyExists("email"));
        }

        let stored = rows.get_mut(&user.uuid).ok_or(RepositoryError::NotFound)?;

        stored.name = user.name;
        stored.email = user.email;
        stored.phone = user.phone;
        stored.updated_at = next_timestamp(stored.updated_at);

        Ok(stored.clone())
    }

    async fn delete(&self, user: UserUuid) -> Result<(), RepositoryError> {
        self.rows
            .write()
            .remove(&user)
            .map(|_| ())
            .ok_or(RepositoryError::NotFound)
    }

    async fn list(
        &self,
        page: PageRequest,
        filter: &UserFilter,
    ) -> Result<(Vec<User>, u64), RepositoryError> {
        let mut matching: Vec<User> = self
            .rows
            .read()
            .values()
            .filter(|user| matches(filter, user))
            .cloned()
            .collect();

        matching.sort_by_key(|user| Reverse((user.created_at, user.uuid)));

        let total = matching.len() as u64;
        let skip = usize::try_from(page.offset()).unwrap_or(usize::MAX);
        let take = usize::try_from(page.limit()).unwrap_or(usize::MAX);

        Ok((matching.into_iter().skip(skip).take(take).collect(), total))
    }
}
