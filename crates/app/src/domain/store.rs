//! Helpers shared by the repository adapters.

use jiff::{SignedDuration, Timestamp};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("record not found")]
    NotFound,

    #[error("record conflicts with an existing {0}")]
    AlreadyExists(&'static str),

    #[error(transparent)]
    Storage(#[from] sqlx::Error),
}

impl RepositoryError {
    /// Map a Postgres unique violation onto [`Self::AlreadyExists`].
    pub(crate) fn from_sqlx(error: sqlx::Error, natural_key: &'static str) -> Self {
        match &error {
            sqlx::Error::RowNotFound => Self::NotFound,
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                Self::AlreadyExists(natural_key)
            }
            _ => Self::Storage(error),
        }
    }
}

/// Escape `LIKE` metacharacters so a search term matches literally.
pub(crate) fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());

    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }

    escaped
}

/// Case-insensitive substring test used by the in-memory adapters.
pub(crate) fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// The next `updated_at` for a record: the current time, nudged forward when
/// the clock has not moved past the previous value.
pub(crate) fn next_timestamp(previous: Timestamp) -> Timestamp {
    let floor = previous
        .checked_add(SignedDuration::from_micros(1))
        .unwrap_or(Timestamp::MAX);

    Timestamp::now().max(floor)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_like_metacharacters() {
        assert_eq!(escape_like("50%_off\\"), "50\\%\\_off\\\\");
        assert_eq!(escape_like("plain"), "plain");
    }

    #[test]
    fn substring_match_ignores_case() {
        assert!(contains_ignore_case("Ann Example", "ann"));
        assert!(contains_ignore_case("ann@example.com", "EXAMPLE"));
        assert!(!contains_ignore_case("Bob", "ann"));
    }

    #[test]
    fn next_timestamp_is_strictly_later() {
        let future = Timestamp::now() + SignedDuration::from_hours(1);

        assert!(next_timestamp(future) > future);
        assert!(next_timestamp(Timestamp::UNIX_EPOCH) > Timestamp::UNIX_EPOCH);
    }
}
