//! Depot helper extensions.

use std::any::{Any, type_name};

use salvo::prelude::Depot;
use thiserror::Error;

/// Injected state was not found in the depot.
#[derive(Debug, Error)]
#[error("{0} missing from depot")]
pub(crate) struct MissingState(&'static str);

/// Typed depot lookups whose failure callers turn into a 500.
pub(crate) trait DepotExt {
    fn obtain_or_500<T: Any + Send + Sync>(&self) -> Result<&T, MissingState>;
}

impl DepotExt for Depot {
    fn obtain_or_500<T: Any + Send + Sync>(&self) -> Result<&T, MissingState> {
        self.obtain::<T>()
            .map_err(|_ignored| MissingState(type_name::<T>()))
    }
}
