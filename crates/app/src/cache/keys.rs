//! Cache key layout.

use std::fmt::Display;

use crate::pagination::PageRequest;

pub const USER_PREFIX: &str = "user";
pub const PRODUCT_PREFIX: &str = "product";

/// `<prefix>:<id>`
pub fn entity(prefix: &str, id: impl Display) -> String {
    format!("{prefix}:{id}")
}

/// `<prefix>:list:<page>:<limit>:<filters joined by ':'>`
///
/// Filters are percent-encoded so a `:` inside one cannot shift it into
/// the next slot.
pub fn list(prefix: &str, request: PageRequest, filters: &[&str]) -> String {
    let mut key = format!("{prefix}:list:{}:{}", request.page(), request.limit());

    for filter in filters {
        key.push(':');
        key.push_str(&urlencoding::encode(filter));
    }

    key
}

/// Pattern matching every list page cached for `prefix`.
pub fn list_pattern(prefix: &str) -> String {
    format!("{prefix}:list:*")
}
