//! Reaction handlers
//!
//! Endpoints for user reactions and the counters they maintain.

use axum::{extract::State, Json};
use engage_service::dto::{
    CounterAuditResponse, CreateReactionRequest, ReactionResponse, ToggleReactionRequest,
    ToggleResponse, UpdateReactionRequest,
};
use engage_service::{ReactionLedgerService, ReactionQueryService, ReactionSelector};

use crate::extractors::{
    ApiPath, AuthUser, EntityPath, EntityReactionPath, ReactionIdPath, UserIdPath, ValidatedJson,
};
use crate::response::{ApiResult, Created, NoContent};
use crate::state::AppState;

fn to_responses(records: Vec<engage_core::ReactionRecord>) -> Vec<ReactionResponse> {
    records.into_iter().map(ReactionResponse::from).collect()
}

/// Create a reaction
///
/// POST /user-reactions
pub async fn create_reaction(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(req): ValidatedJson<CreateReactionRequest>,
) -> ApiResult<Created<Json<ReactionResponse>>> {
    let service = ReactionLedgerService::new(state.service_context());
    let record = service.create(req.key(auth.user_id)).await?;
    Ok(Created(Json(record.into())))
}

/// List every reaction
///
/// GET /user-reactions
pub async fn list_reactions(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<ReactionResponse>>> {
    let service = ReactionQueryService::new(state.service_context());
    let records = service.find_all().await?;
    Ok(Json(to_responses(records)))
}

/// Toggle a reaction on or off
///
/// POST /user-reactions/toggle
pub async fn toggle_reaction(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(req): ValidatedJson<ToggleReactionRequest>,
) -> ApiResult<Json<ToggleResponse>> {
    let service = ReactionLedgerService::new(state.service_context());
    let outcome = service.toggle(req.key(auth.user_id)).await?;
    Ok(Json(outcome.into()))
}

/// Get a reaction by id
///
/// GET /user-reactions/{reaction_id}
pub async fn get_reaction(
    State(state): State<AppState>,
    ApiPath(path): ApiPath<ReactionIdPath>,
) -> ApiResult<Json<ReactionResponse>> {
    let service = ReactionQueryService::new(state.service_context());
    let record = service.find_one(path.reaction_id()?).await?;
    Ok(Json(record.into()))
}

/// Change the kind of one of the caller's reactions
///
/// PATCH /user-reactions/{reaction_id}
pub async fn update_reaction(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(path): ApiPath<ReactionIdPath>,
    ValidatedJson(req): ValidatedJson<UpdateReactionRequest>,
) -> ApiResult<Json<ReactionResponse>> {
    let selector = ReactionSelector::Id(path.reaction_id()?);

    let service = ReactionLedgerService::new(state.service_context());
    let record = service
        .update(auth.user_id, selector, req.reaction_type)
        .await?;
    Ok(Json(record.into()))
}

/// Delete one of the caller's reactions by id
///
/// DELETE /user-reactions/{reaction_id}
pub async fn delete_reaction(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(path): ApiPath<ReactionIdPath>,
) -> ApiResult<NoContent> {
    let selector = ReactionSelector::Id(path.reaction_id()?);

    let service = ReactionLedgerService::new(state.service_context());
    service.delete(auth.user_id, selector).await?;
    Ok(NoContent)
}

/// List a user's reactions
///
/// GET /user-reactions/user/{user_id}
pub async fn get_user_reactions(
    State(state): State<AppState>,
    _auth: AuthUser,
    ApiPath(path): ApiPath<UserIdPath>,
) -> ApiResult<Json<Vec<ReactionResponse>>> {
    let service = ReactionQueryService::new(state.service_context());
    let records = service.find_by_user(path.user_id()?).await?;
    Ok(Json(to_responses(records)))
}

/// List the reactions on a target
///
/// GET /user-reactions/entity/{entity_type}/{entity_id}
pub async fn get_entity_reactions(
    State(state): State<AppState>,
    ApiPath(path): ApiPath<EntityPath>,
) -> ApiResult<Json<Vec<ReactionResponse>>> {
    let service = ReactionQueryService::new(state.service_context());
    let records = service.find_by_entity(path.target()?).await?;
    Ok(Json(to_responses(records)))
}

/// Delete the caller's reaction of a given kind on a target
///
/// DELETE /user-reactions/entity/{entity_type}/{entity_id}/{reaction_type}
pub async fn delete_entity_reaction(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(path): ApiPath<EntityReactionPath>,
) -> ApiResult<NoContent> {
    let selector = ReactionSelector::Key {
        target: path.target()?,
        kind: path.reaction_kind()?,
    };

    let service = ReactionLedgerService::new(state.service_context());
    service.delete(auth.user_id, selector).await?;
    Ok(NoContent)
}

/// Compare a target's stored counters with its reactions
///
/// GET /user-reactions/entity/{entity_type}/{entity_id}/counters
pub async fn get_entity_counters(
    State(state): State<AppState>,
    ApiPath(path): ApiPath<EntityPath>,
) -> ApiResult<Json<CounterAuditResponse>> {
    let service = ReactionLedgerService::new(state.service_context());
    let audit = service.audit(path.target()?).await?;
    Ok(Json(audit.into()))
}

/// Rewrite a target's stored counters from its reactions
///
/// POST /user-reactions/entity/{entity_type}/{entity_id}/counters/reconcile
pub async fn reconcile_entity_counters(
    State(state): State<AppState>,
    _auth: AuthUser,
    ApiPath(path): ApiPath<EntityPath>,
) -> ApiResult<Json<CounterAuditResponse>> {
    let service = ReactionLedgerService::new(state.service_context());
    let audit = service.reconcile(path.target()?).await?;
    Ok(Json(audit.into()))
}
