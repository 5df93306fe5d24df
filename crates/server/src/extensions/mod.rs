//! Extension traits

mod depot;

pub(crate) use depot::{DepotExt as _, MissingState};
