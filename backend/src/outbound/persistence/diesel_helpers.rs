//! Shared helpers for Diesel repository implementations.
//!
//! - Error mapping from pool and Diesel errors to port errors
//! - Row collection with fallible domain conversion

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use crate::domain::ports::ContentRepositoryError;

use super::pool::PoolError;

/// Extract a readable message from a pool error.
pub fn map_pool_error_message(error: PoolError) -> String {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => message,
    }
}

fn log_diesel_error(error: &DieselError) {
    match error {
        DieselError::DatabaseError(kind, info) => {
            debug!(
                ?kind,
                message = info.message(),
                constraint = info.constraint_name(),
                "diesel operation failed"
            );
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(error),
            "diesel operation failed"
        ),
    }
}

/// Map common Diesel error variants into query/connection constructors.
///
/// Used by repositories whose ports only distinguish connection failures from
/// everything else.
pub fn map_basic_diesel_error<E, Q, C>(error: DieselError, query: Q, connection: C) -> E
where
    Q: Fn(&'static str) -> E,
    C: Fn(&'static str) -> E,
{
    log_diesel_error(&error);

    match error {
        DieselError::NotFound => query("record not found"),
        DieselError::QueryBuilderError(_) => query("database query error"),
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            connection("database connection error")
        }
        _ => query("database error"),
    }
}

/// Map Diesel errors to content repository errors, keeping the constraint
/// name for foreign key and check violations.
pub fn map_content_diesel_error(error: DieselError) -> ContentRepositoryError {
    log_diesel_error(&error);

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, info) => {
            ContentRepositoryError::foreign_key(
                info.constraint_name()
                    .unwrap_or("foreign key violation")
                    .to_owned(),
            )
        }
        DieselError::DatabaseError(DatabaseErrorKind::CheckViolation, info) => {
            ContentRepositoryError::constraint(
                info.constraint_name().unwrap_or("check violation").to_owned(),
            )
        }
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            ContentRepositoryError::connection("database connection error")
        }
        DieselError::NotFound => ContentRepositoryError::query("record not found"),
        DieselError::QueryBuilderError(_) => ContentRepositoryError::query("database query error"),
        _ => ContentRepositoryError::query("database error"),
    }
}

/// Convert rows into domain values, mapping the first failure through
/// `map_err`.
pub fn collect_rows<R, T, E>(
    rows: impl IntoIterator<Item = R>,
    map_err: impl FnOnce(String) -> E,
) -> Result<Vec<T>, E>
where
    T: TryFrom<R, Error = String>,
{
    rows.into_iter()
        .map(T::try_from)
        .collect::<Result<Vec<_>, _>>()
        .map_err(map_err)
}

#[cfg(test)]
mod tests {
    //! Error mapping coverage.
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn not_found_maps_to_query_error() {
        let mapped = map_content_diesel_error(DieselError::NotFound);
        assert_eq!(mapped, ContentRepositoryError::query("record not found"));
    }

    #[rstest]
    fn basic_mapping_uses_query_constructor() {
        let mapped: String = map_basic_diesel_error(
            DieselError::NotFound,
            |message| format!("query: {message}"),
            |message| format!("connection: {message}"),
        );
        assert_eq!(mapped, "query: record not found");
    }

    #[rstest]
    fn pool_messages_are_preserved() {
        assert_eq!(
            map_pool_error_message(PoolError::checkout("timed out")),
            "timed out"
        );
    }

    #[rstest]
    fn collect_rows_reports_first_failure() {
        #[derive(Debug)]
        struct Even(i64);
        impl TryFrom<i64> for Even {
            type Error = String;
            fn try_from(value: i64) -> Result<Self, Self::Error> {
                if value % 2 == 0 {
                    Ok(Self(value))
                } else {
                    Err(format!("{value} is odd"))
                }
            }
        }

        let ok: Result<Vec<Even>, String> = collect_rows([2, 4], |m| m);
        let err: Result<Vec<Even>, String> = collect_rows([2, 3, 5], |m| m);

        assert_eq!(ok.map(|v| v.len()), Ok(2));
        assert_eq!(err.map(|v| v.len()), Err("3 is odd".to_owned()));
    }
}
