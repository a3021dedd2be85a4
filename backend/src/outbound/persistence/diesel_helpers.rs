//! Shared helpers for Diesel repository implementations.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use super::pool::PoolError;

/// Extract a readable message from a pool error.
pub fn map_pool_error_message(error: PoolError) -> String {
    match error {
        PoolError::Checkout { message } | PoolError::Open { message } => message,
    }
}

/// Classified Diesel failure: connection loss or anything else.
pub enum DieselFailure {
    /// The connection dropped mid-operation.
    Connection(String),
    /// The statement failed.
    Query(String),
}

/// Classify a Diesel error and emit debug context for `operation`.
pub fn classify_diesel_error(error: DieselError, operation: &str) -> DieselFailure {
    let message = error.to_string();
    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, detail = info.message(), %operation, "diesel operation failed");
        }
        _ => debug!(error = %message, %operation, "diesel operation failed"),
    }
    match error {
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            DieselFailure::Connection(message)
        }
        _ => DieselFailure::Query(message),
    }
}

/// Collect converted rows, mapping the first conversion failure.
pub fn collect_rows<T, R, E>(
    rows: impl IntoIterator<Item = R>,
    map_err: impl Fn(String) -> E,
) -> Result<Vec<T>, E>
where
    T: TryFrom<R, Error = String>,
{
    rows.into_iter()
        .map(|row| T::try_from(row).map_err(&map_err))
        .collect()
}

/// Build a case-insensitive `ILIKE` pattern matching `needle` literally.
pub fn contains_pattern(needle: &str) -> String {
    let mut pattern = String::with_capacity(needle.len() + 2);
    pattern.push('%');
    for ch in needle.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("pasta", "%pasta%")]
    #[case("50%", "%50\\%%")]
    #[case("a_b", "%a\\_b%")]
    #[case("c:\\dir", "%c:\\\\dir%")]
    #[case("", "%%")]
    fn escapes_like_wildcards(#[case] needle: &str, #[case] expected: &str) {
        assert_eq!(contains_pattern(needle), expected);
    }

    #[rstest]
    fn closed_connections_are_connection_failures() {
        let failure = classify_diesel_error(
            DieselError::DatabaseError(
                DatabaseErrorKind::ClosedConnection,
                Box::new("server closed the connection".to_owned()),
            ),
            "test",
        );
        assert!(matches!(failure, DieselFailure::Connection(_)));
    }

    #[rstest]
    fn other_errors_are_query_failures() {
        assert!(matches!(
            classify_diesel_error(DieselError::NotFound, "test"),
            DieselFailure::Query(_)
        ));
    }

    #[rstest]
    fn pool_messages_are_unwrapped() {
        assert_eq!(map_pool_error_message(PoolError::checkout("timed out")), "timed out");
    }
}
