//! Reaction query service
//!
//! Read-only projections; these never open a ledger transaction.

use tracing::instrument;
use uuid::Uuid;

use engage_core::entities::{ReactionRecord, TargetRef};
use engage_core::error::DomainError;

use super::context::ServiceContext;
use super::error::ServiceResult;

/// Reaction query service
pub struct ReactionQueryService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> ReactionQueryService<'a> {
    /// Create a new ReactionQueryService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Get one reaction by id
    #[instrument(skip(self))]
    pub async fn find_one(&self, id: Uuid) -> ServiceResult<ReactionRecord> {
        self.ctx
            .query_repo()
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::reaction_not_found(id).into())
    }

    /// List every reaction, newest first
    #[instrument(skip(self))]
    pub async fn find_all(&self) -> ServiceResult<Vec<ReactionRecord>> {
        Ok(self.ctx.query_repo().find_all().await?)
    }

    /// List reactions made by a user
    #[instrument(skip(self))]
    pub async fn find_by_user(&self, user_id: Uuid) -> ServiceResult<Vec<ReactionRecord>> {
        Ok(self.ctx.query_repo().find_by_user(user_id).await?)
    }

    /// List reactions on a target
    #[instrument(skip(self))]
    pub async fn find_by_entity(&self, target: TargetRef) -> ServiceResult<Vec<ReactionRecord>> {
        Ok(self.ctx.query_repo().find_by_target(target).await?)
    }
}
