//! Users Repository

use async_trait::async_trait;
use mockall::automock;

use crate::{
    domain::{
        store::RepositoryError,
        users::models::{NewUserRecord, User, UserFilter, UserUuid},
    },
    pagination::PageRequest,
};

mod memory;
mod pg;

pub use memory::MemoryUsersRepository;
pub use pg::PgUsersRepository;

#[automock]
#[async_trait]
pub trait UsersRepository: Send + Sync {
    /// Persist a new user, assigning its id and timestamps.
    async fn create(&self, user: NewUserRecord) -> Result<User, RepositoryError>;

    async fn get_by_id(&self, user: UserUuid) -> Result<Option<User>, RepositoryError>;

    async fn get_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError>;

    /// Write back name, email and phone and bump `updated_at`.
    async fn update(&self, user: User) -> Result<User, RepositoryError>;

    async fn delete(&self, user: UserUuid) -> Result<(), RepositoryError>;

    /// Newest first, with the unpaged match count.
    async fn list(
        &self,
        page: PageRequest,
        filter: &UserFilter,
    ) -> Result<(Vec<User>, u64), RepositoryError>;
}
