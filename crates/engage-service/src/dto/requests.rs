//! Request DTOs for API endpoints
//!
//! All request DTOs implement `Deserialize` and `Validate` for input validation.

use serde::Deserialize;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use engage_core::entities::{ReactionKey, ReactionKind, TargetKind, TargetRef};

fn validate_entity_id(id: &Uuid) -> Result<(), ValidationError> {
    if id.is_nil() {
        let mut err = ValidationError::new("nil_uuid");
        err.message = Some("entity_id must not be the nil UUID".into());
        return Err(err);
    }
    Ok(())
}

// ============================================================================
// Reaction Requests
// ============================================================================

/// Create reaction request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateReactionRequest {
    pub entity_type: TargetKind,

    #[validate(custom(function = "validate_entity_id"))]
    pub entity_id: Uuid,

    pub reaction_type: ReactionKind,
}

impl CreateReactionRequest {
    /// Natural key of the caller's reaction
    pub fn key(&self, user_id: Uuid) -> ReactionKey {
        ReactionKey::new(
            user_id,
            TargetRef::new(self.entity_type, self.entity_id),
            self.reaction_type,
        )
    }
}

/// Toggle reaction request; same shape as a create
pub type ToggleReactionRequest = CreateReactionRequest;

/// Change the kind of an existing reaction
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateReactionRequest {
    pub reaction_type: ReactionKind,
}
