//! # engage-service
//!
//! Application layer: the reaction ledger use cases, read-side queries and DTOs.

pub mod dto;
pub mod services;

pub use services::{
    ReactionLedgerService, ReactionQueryService, ReactionSelector, ServiceContext,
    ServiceContextBuilder, ServiceError, ServiceResult,
};
