//! Service context - dependency container for services
//!
//! Holds the ledger, the read-side repository and the JWT service.

use std::sync::Arc;

use engage_common::auth::JwtService;
use engage_core::traits::{ReactionLedger, ReactionQueryRepository};
use engage_db::{MemoryLedger, PgPool, PgReactionLedger, PgReactionQueryRepository};

use super::error::{ServiceError, ServiceResult};

/// Service context containing all dependencies
#[derive(Clone)]
pub struct ServiceContext {
    ledger: Arc<dyn ReactionLedger>,
    query_repo: Arc<dyn ReactionQueryRepository>,
    jwt_service: Arc<JwtService>,
}

impl ServiceContext {
    /// Create a new service context
    pub fn new(
        ledger: Arc<dyn ReactionLedger>,
        query_repo: Arc<dyn ReactionQueryRepository>,
        jwt_service: Arc<JwtService>,
    ) -> Self {
        Self {
            ledger,
            query_repo,
            jwt_service,
        }
    }

    /// Get the transactional reaction ledger
    pub fn ledger(&self) -> &dyn ReactionLedger {
        self.ledger.as_ref()
    }

    /// Get the read-side reaction repository
    pub fn query_repo(&self) -> &dyn ReactionQueryRepository {
        self.query_repo.as_ref()
    }

    /// Get the JWT service
    pub fn jwt_service(&self) -> &JwtService {
        self.jwt_service.as_ref()
    }
}

impl std::fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContext")
            .field("ledger", &"dyn ReactionLedger")
            .field("query_repo", &"dyn ReactionQueryRepository")
            .field("jwt_service", &self.jwt_service)
            .finish()
    }
}

/// Builder for creating ServiceContext with custom configuration
#[derive(Default)]
pub struct ServiceContextBuilder {
    ledger: Option<Arc<dyn ReactionLedger>>,
    query_repo: Option<Arc<dyn ReactionQueryRepository>>,
    jwt_service: Option<Arc<JwtService>>,
}

impl ServiceContextBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ledger(mut self, ledger: Arc<dyn ReactionLedger>) -> Self {
        self.ledger = Some(ledger);
        self
    }

    pub fn query_repo(mut self, repo: Arc<dyn ReactionQueryRepository>) -> Self {
        self.query_repo = Some(repo);
        self
    }

    /// Use PostgreSQL for both the ledger and the queries
    pub fn postgres(self, pool: PgPool) -> Self {
        self.ledger(Arc::new(PgReactionLedger::new(pool.clone())))
            .query_repo(Arc::new(PgReactionQueryRepository::new(pool)))
    }

    /// Use one in-memory backend for both the ledger and the queries
    pub fn memory(self, ledger: MemoryLedger) -> Self {
        self.ledger(Arc::new(ledger.clone()))
            .query_repo(Arc::new(ledger))
    }

    pub fn jwt_service(mut self, service: Arc<JwtService>) -> Self {
        self.jwt_service = Some(service);
        self
    }

    /// Build the ServiceContext
    ///
    /// # Errors
    /// Returns `ServiceError::Validation` if any required dependency is missing
    pub fn build(self) -> ServiceResult<ServiceContext> {
        Ok(ServiceContext::new(
            self.ledger
                .ok_or_else(|| ServiceError::validation("ledger is required"))?,
            self.query_repo
                .ok_or_else(|| ServiceError::validation("query_repo is required"))?,
            self.jwt_service
                .ok_or_else(|| ServiceError::validation("jwt_service is required"))?,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_requires_every_dependency() {
        let err = ServiceContextBuilder::new()
            .memory(MemoryLedger::new())
            .build()
            .unwrap_err();
        assert!(matches!(err, ServiceError::Validation(msg) if msg.contains("jwt_service")));

        let ctx = ServiceContextBuilder::new()
            .memory(MemoryLedger::new())
            .jwt_service(Arc::new(JwtService::new("secret", 60)))
            .build();
        assert!(ctx.is_ok());
    }
}
