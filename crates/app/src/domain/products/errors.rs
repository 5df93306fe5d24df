//! Products service errors.

use thiserror::Error;

use crate::domain::store::RepositoryError;

#[derive(Debug, Error)]
pub enum ProductsServiceError {
    #[error("product with SKU {0} already exists")]
    AlreadyExists(String),

    #[error("product not found")]
    NotFound,

    #[error("failed to {operation} product: {source}")]
    Repository {
        operation: &'static str,
        #[source]
        source: RepositoryError,
    },
}

impl ProductsServiceError {
    /// Wrap a repository failure, keeping "not found" distinct.
    pub(crate) fn repository(operation: &'static str) -> impl FnOnce(RepositoryError) -> Self {
        move |source| match source {
            RepositoryError::NotFound => Self::NotFound,
            source => Self::Repository { operation, source },
        }
    }
}
