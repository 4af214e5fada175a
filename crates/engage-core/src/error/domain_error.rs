//! Domain errors - error types for the domain layer

use thiserror::Error;
use uuid::Uuid;

use crate::entities::TargetRef;

/// Domain layer errors
#[derive(Debug, Error)]
pub enum DomainError {
    // =========================================================================
    // Not Found Errors
    // =========================================================================
    #[error("User not found: {0}")]
    UserNotFound(Uuid),

    #[error("Target not found: {0}")]
    TargetNotFound(TargetRef),

    #[error("Reaction not found: {0}")]
    ReactionNotFound(String),

    // =========================================================================
    // Validation Errors
    // =========================================================================
    #[error("Validation error: {0}")]
    ValidationError(String),

    // =========================================================================
    // Authorization Errors
    // =========================================================================
    #[error("Not reaction owner")]
    NotReactionOwner,

    // =========================================================================
    // Conflict Errors
    // =========================================================================
    #[error("Reaction already exists")]
    ReactionAlreadyExists,

    // =========================================================================
    // Infrastructure Errors (wrapped)
    // =========================================================================
    #[error("Counter update failed: {0}")]
    CounterUpdateFailed(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl DomainError {
    /// Reaction lookup by id failed
    pub fn reaction_not_found(id: Uuid) -> Self {
        Self::ReactionNotFound(id.to_string())
    }

    /// Get an error code string for API responses
    pub fn code(&self) -> &'static str {
        match self {
            // Not Found
            Self::UserNotFound(_) => "UNKNOWN_USER",
            Self::TargetNotFound(_) => "UNKNOWN_TARGET",
            Self::ReactionNotFound(_) => "UNKNOWN_REACTION",

            // Validation
            Self::ValidationError(_) => "VALIDATION_ERROR",

            // Authorization
            Self::NotReactionOwner => "NOT_REACTION_OWNER",

            // Conflict
            Self::ReactionAlreadyExists => "REACTION_ALREADY_EXISTS",

            // Infrastructure
            Self::CounterUpdateFailed(_) => "COUNTER_UPDATE_FAILED",
            Self::DatabaseError(_) => "DATABASE_ERROR",
            Self::InternalError(_) => "INTERNAL_ERROR",
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::UserNotFound(_) | Self::TargetNotFound(_) | Self::ReactionNotFound(_)
        )
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::ValidationError(_))
    }

    /// Check if this is an authorization error
    pub fn is_authorization(&self) -> bool {
        matches!(self, Self::NotReactionOwner)
    }

    /// Check if this is a conflict error
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::ReactionAlreadyExists)
    }

    /// Infrastructure faults; the aborted operation left no trace and may be retried
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::CounterUpdateFailed(_) | Self::DatabaseError(_) | Self::InternalError(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::TargetKind;

    #[test]
    fn test_error_codes() {
        let err = DomainError::UserNotFound(Uuid::nil());
        assert_eq!(err.code(), "UNKNOWN_USER");

        let err = DomainError::ReactionAlreadyExists;
        assert_eq!(err.code(), "REACTION_ALREADY_EXISTS");

        let err = DomainError::CounterUpdateFailed("timeout".to_string());
        assert_eq!(err.code(), "COUNTER_UPDATE_FAILED");
    }

    #[test]
    fn test_is_not_found() {
        let target = TargetRef::new(TargetKind::Article, Uuid::nil());
        assert!(DomainError::TargetNotFound(target).is_not_found());
        assert!(DomainError::reaction_not_found(Uuid::nil()).is_not_found());
        assert!(!DomainError::ReactionAlreadyExists.is_not_found());
    }

    #[test]
    fn test_conflict_is_not_retryable() {
        assert!(DomainError::ReactionAlreadyExists.is_conflict());
        assert!(!DomainError::ReactionAlreadyExists.is_retryable());
        assert!(!DomainError::NotReactionOwner.is_retryable());
    }

    #[test]
    fn test_infrastructure_is_retryable() {
        assert!(DomainError::CounterUpdateFailed("down".to_string()).is_retryable());
        assert!(DomainError::DatabaseError("down".to_string()).is_retryable());
        assert!(!DomainError::UserNotFound(Uuid::nil()).is_retryable());
    }

    #[test]
    fn test_error_display() {
        let id = Uuid::nil();
        let target = TargetRef::new(TargetKind::Business, id);
        let err = DomainError::TargetNotFound(target);
        assert_eq!(err.to_string(), format!("Target not found: business:{id}"));

        assert!(DomainError::NotReactionOwner.is_authorization());
    }
}
