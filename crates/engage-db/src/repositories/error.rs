//! Error handling utilities for repositories

use sqlx::Error as SqlxError;
use uuid::Uuid;

use engage_core::error::DomainError;

/// Convert SQLx error to DomainError
pub fn map_db_error(e: SqlxError) -> DomainError {
    DomainError::DatabaseError(e.to_string())
}

/// Check for unique violation and return appropriate error or fallback
pub fn map_unique_violation<F>(e: SqlxError, on_unique: F) -> DomainError
where
    F: FnOnce() -> DomainError,
{
    if let Some(db_err) = e.as_database_error() {
        if db_err.is_unique_violation() {
            return on_unique();
        }
    }
    DomainError::DatabaseError(e.to_string())
}

/// Map a failed reaction insert
///
/// The unique index on the natural key reports a duplicate; the users foreign
/// key reports an unknown reacting user.
pub fn map_insert_error(e: SqlxError, user_id: Uuid) -> DomainError {
    if let Some(db_err) = e.as_database_error() {
        if db_err.is_foreign_key_violation() {
            return user_not_found(user_id);
        }
    }
    map_unique_violation(e, || DomainError::ReactionAlreadyExists)
}

/// Any storage fault while touching a target counter
pub fn map_counter_error(e: SqlxError) -> DomainError {
    DomainError::CounterUpdateFailed(e.to_string())
}

/// Create a "user not found" error
pub fn user_not_found(id: Uuid) -> DomainError {
    DomainError::UserNotFound(id)
}

/// Create a "reaction not found" error
pub fn reaction_not_found(id: Uuid) -> DomainError {
    DomainError::reaction_not_found(id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_database_errors_fall_through() {
        let err = map_insert_error(SqlxError::RowNotFound, Uuid::nil());
        assert!(matches!(err, DomainError::DatabaseError(_)));

        let err = map_counter_error(SqlxError::PoolTimedOut);
        assert!(matches!(err, DomainError::CounterUpdateFailed(_)));
        assert!(err.is_retryable());
    }
}
