//! Route definitions
//!
//! Reaction routes are mounted under /api/v1; health routes stay at the root.

use axum::{
    routing::{delete, get, post},
    Router,
};

use crate::handlers::{health, reactions};
use crate::state::AppState;

/// Create the main API router (excluding health for separate middleware handling)
pub fn create_router() -> Router<AppState> {
    Router::new().nest("/api/v1", api_v1_routes())
}

/// Health check routes (exported separately to bypass rate limiting)
pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
}

/// API v1 routes
fn api_v1_routes() -> Router<AppState> {
    Router::new().merge(reaction_routes())
}

/// User reaction routes
fn reaction_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/user-reactions",
            post(reactions::create_reaction).get(reactions::list_reactions),
        )
        .route("/user-reactions/toggle", post(reactions::toggle_reaction))
        .route(
            "/user-reactions/:reaction_id",
            get(reactions::get_reaction)
                .patch(reactions::update_reaction)
                .delete(reactions::delete_reaction),
        )
        .route(
            "/user-reactions/user/:user_id",
            get(reactions::get_user_reactions),
        )
        // Per-target reactions and counters
        .route(
            "/user-reactions/entity/:entity_type/:entity_id",
            get(reactions::get_entity_reactions),
        )
        .route(
            "/user-reactions/entity/:entity_type/:entity_id/counters",
            get(reactions::get_entity_counters),
        )
        .route(
            "/user-reactions/entity/:entity_type/:entity_id/counters/reconcile",
            post(reactions::reconcile_entity_counters),
        )
        .route(
            "/user-reactions/entity/:entity_type/:entity_id/:reaction_type",
            delete(reactions::delete_entity_reaction),
        )
}
