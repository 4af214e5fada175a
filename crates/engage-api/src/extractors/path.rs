//! Path parameter extractors
//!
//! Type-safe extraction of reaction ids and target references from path parameters.

use axum::{
    async_trait,
    extract::{FromRequestParts, Path},
    http::request::Parts,
};
use engage_core::entities::{ReactionKind, TargetKind, TargetRef};
use serde::de::DeserializeOwned;
use uuid::Uuid;

use crate::response::ApiError;

/// Path extractor whose rejection is an [`ApiError`]
#[derive(Debug, Clone)]
pub struct ApiPath<T>(pub T);

#[async_trait]
impl<S, T> FromRequestParts<S> for ApiPath<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Send,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(inner) = Path::<T>::from_request_parts(parts, state)
            .await
            .map_err(|e| ApiError::invalid_path(e.body_text()))?;

        Ok(ApiPath(inner))
    }
}

fn parse_uuid(value: &str, name: &str) -> Result<Uuid, ApiError> {
    value
        .parse()
        .map_err(|_| ApiError::invalid_path(format!("Invalid {name} format")))
}

/// Path parameters with reaction_id
#[derive(Debug, serde::Deserialize)]
pub struct ReactionIdPath {
    pub reaction_id: String,
}

impl ReactionIdPath {
    /// Parse reaction_id as UUID
    pub fn reaction_id(&self) -> Result<Uuid, ApiError> {
        parse_uuid(&self.reaction_id, "reaction_id")
    }
}

/// Path parameters with user_id
#[derive(Debug, serde::Deserialize)]
pub struct UserIdPath {
    pub user_id: String,
}

impl UserIdPath {
    /// Parse user_id as UUID
    pub fn user_id(&self) -> Result<Uuid, ApiError> {
        parse_uuid(&self.user_id, "user_id")
    }
}

/// Path parameters addressing a target entity
#[derive(Debug, serde::Deserialize)]
pub struct EntityPath {
    pub entity_type: String,
    pub entity_id: String,
}

impl EntityPath {
    /// Parse entity_type and entity_id into a target reference
    pub fn target(&self) -> Result<TargetRef, ApiError> {
        target_ref(&self.entity_type, &self.entity_id)
    }
}

/// Path parameters addressing one of the caller's reactions on a target
#[derive(Debug, serde::Deserialize)]
pub struct EntityReactionPath {
    pub entity_type: String,
    pub entity_id: String,
    pub reaction_type: String,
}

impl EntityReactionPath {
    pub fn target(&self) -> Result<TargetRef, ApiError> {
        target_ref(&self.entity_type, &self.entity_id)
    }

    /// Parse reaction_type as a reaction kind
    pub fn reaction_kind(&self) -> Result<ReactionKind, ApiError> {
        self.reaction_type
            .parse()
            .map_err(|e: engage_core::ParseKindError| ApiError::invalid_path(e.to_string()))
    }
}

fn target_ref(entity_type: &str, entity_id: &str) -> Result<TargetRef, ApiError> {
    let kind: TargetKind = entity_type
        .parse()
        .map_err(|e: engage_core::ParseKindError| ApiError::invalid_path(e.to_string()))?;
    let id = parse_uuid(entity_id, "entity_id")?;
    Ok(TargetRef::new(kind, id))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_path_parses_target() {
        let id = Uuid::new_v4();
        let path = EntityPath {
            entity_type: "event".to_string(),
            entity_id: id.to_string(),
        };
        assert_eq!(path.target().unwrap(), TargetRef::new(TargetKind::Event, id));
    }

    #[test]
    fn test_entity_path_rejects_unknown_kind() {
        let path = EntityPath {
            entity_type: "comment".to_string(),
            entity_id: Uuid::new_v4().to_string(),
        };
        let err = path.target().unwrap_err();
        assert_eq!(err.error_code(), "INVALID_PATH_PARAMETER");
    }

    #[test]
    fn test_reaction_path_parses_kind() {
        let path = EntityReactionPath {
            entity_type: "article".to_string(),
            entity_id: Uuid::new_v4().to_string(),
            reaction_type: "favorite".to_string(),
        };
        assert_eq!(path.reaction_kind().unwrap(), ReactionKind::Favorite);

        let bad = ReactionIdPath {
            reaction_id: "not-a-uuid".to_string(),
        };
        assert!(bad.reaction_id().is_err());
    }
}
