//! # engage-db
//!
//! Persistence for the reaction ledger.
//!
//! ## Overview
//!
//! - PostgreSQL connection pool and runtime migrations
//! - Database models with SQLx `FromRow` derives and entity mappers
//! - [`PgReactionLedger`]: transactional reaction store and counter gateway
//! - One counter adapter per target kind ([`counters`])
//! - [`MemoryLedger`]: in-process backend used by service and API tests
//!
//! ## Usage
//!
//! ```rust,ignore
//! use engage_db::pool::{create_pool, run_migrations, DatabaseConfig};
//! use engage_db::{PgReactionLedger, PgReactionQueryRepository};
//!
//! async fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let pool = create_pool(&DatabaseConfig::from_env()).await?;
//!     run_migrations(&pool).await?;
//!
//!     let ledger = PgReactionLedger::new(pool.clone());
//!     let queries = PgReactionQueryRepository::new(pool);
//!     Ok(())
//! }
//! ```

pub mod counters;
pub mod mappers;
pub mod memory;
pub mod models;
pub mod pool;
pub mod repositories;

// Re-export commonly used types
pub use memory::MemoryLedger;
pub use pool::{create_pool, create_pool_from_env, run_migrations, DatabaseConfig, PgPool};
pub use repositories::{PgLedgerTransaction, PgReactionLedger, PgReactionQueryRepository};
