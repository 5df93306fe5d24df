//! Users service errors.

use thiserror::Error;

use crate::domain::store::RepositoryError;

#[derive(Debug, Error)]
pub enum UsersServiceError {
    #[error("user with email {0} already exists")]
    AlreadyExists(String),

    #[error("user not found")]
    NotFound,

    #[error("failed to {operation} user: {source}")]
    Repository {
        operation: &'static str,
        #[source]
        source: RepositoryError,
    },

    #[error("failed to hash password: {0}")]
    PasswordHash(String),
}

impl UsersServiceError {
    /// Wrap a repository failure, keeping "not found" distinct.
    pub(crate) fn repository(operation: &'static str) -> impl FnOnce(RepositoryError) -> Self {
        move |source| match source {
            RepositoryError::NotFound => Self::NotFound,
            source => Self::Repository { operation, source },
        }
    }

    /// Like [`Self::repository`], but a unique violation names the email.
    pub(crate) fn write(
        operation: &'static str,
        email: String,
    ) -> impl FnOnce(RepositoryError) -> Self {
        move |source| match source {
            RepositoryError::AlreadyExists(_) => Self::AlreadyExists(email),
            source => Self::repository(operation)(source),
        }
    }
}
