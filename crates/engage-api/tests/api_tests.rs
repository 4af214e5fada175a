//! HTTP API tests
//!
//! Drive the router in-process against the in-memory ledger.
//!
//! Run with: cargo test -p engage-api --test api_tests

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

use engage_api::{create_app, AppState};
use engage_common::{
    AppConfig, AppSettings, CorsConfig, DatabaseConfig, Environment, JwtConfig, JwtService,
    LogFormat, RateLimitConfig, ServerConfig,
};
use engage_core::entities::{ReactionTally, TargetKind, TargetRef};
use engage_db::MemoryLedger;
use engage_service::ServiceContextBuilder;

const JWT_SECRET: &str = "api-test-secret-that-is-long-enough";

// ============================================================================
// Test Harness
// ============================================================================

fn test_config() -> AppConfig {
    AppConfig {
        app: AppSettings {
            name: "engagement-ledger-test".to_string(),
            env: Environment::Development,
            log_format: LogFormat::Pretty,
        },
        api: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
        },
        database: DatabaseConfig {
            url: "postgres://unused".to_string(),
            max_connections: 1,
            min_connections: 0,
            run_migrations: false,
        },
        jwt: JwtConfig {
            secret: JWT_SECRET.to_string(),
            access_token_expiry: 900,
        },
        rate_limit: RateLimitConfig::default(),
        cors: CorsConfig::default(),
    }
}

struct TestApp {
    router: Router,
    ledger: MemoryLedger,
    jwt: Arc<JwtService>,
}

impl TestApp {
    fn new() -> Self {
        let ledger = MemoryLedger::new();
        let jwt = Arc::new(JwtService::new(JWT_SECRET, 900));
        let ctx = ServiceContextBuilder::new()
            .memory(ledger.clone())
            .jwt_service(Arc::clone(&jwt))
            .build()
            .unwrap();
        let router = create_app(AppState::new(ctx, test_config()));
        Self {
            router,
            ledger,
            jwt,
        }
    }

    async fn user(&self) -> (Uuid, String) {
        let id = Uuid::new_v4();
        self.ledger.add_user(id).await;
        (id, self.jwt.issue_access_token(id).unwrap())
    }

    async fn target(&self, kind: TargetKind) -> TargetRef {
        let target = TargetRef::new(kind, Uuid::new_v4());
        self.ledger.add_target(target).await;
        target
    }

    async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }
}

fn reaction_body(target: TargetRef, kind: &str) -> Value {
    json!({
        "entity_type": target.kind.as_str(),
        "entity_id": target.id,
        "reaction_type": kind,
    })
}

fn entity_uri(target: TargetRef) -> String {
    format!("/api/v1/user-reactions/entity/{}/{}", target.kind, target.id)
}

// ============================================================================
// Health
// ============================================================================

#[tokio::test]
async fn test_health_endpoints() {
    let app = TestApp::new();

    let (status, body) = app.send(Method::GET, "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");

    let (status, body) = app.send(Method::GET, "/health/ready", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["checks"]["database"], "healthy");
}

// ============================================================================
// Reactions
// ============================================================================

#[tokio::test]
async fn test_create_requires_auth() {
    let app = TestApp::new();
    let target = app.target(TargetKind::Business).await;

    let (status, body) = app
        .send(
            Method::POST,
            "/api/v1/user-reactions",
            None,
            Some(reaction_body(target, "like")),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "MISSING_AUTHORIZATION");

    let (status, _) = app
        .send(
            Method::POST,
            "/api/v1/user-reactions",
            Some("not-a-jwt"),
            Some(reaction_body(target, "like")),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_create_and_duplicate() {
    let app = TestApp::new();
    let (user, token) = app.user().await;
    let target = app.target(TargetKind::Business).await;

    let (status, body) = app
        .send(
            Method::POST,
            "/api/v1/user-reactions",
            Some(&token),
            Some(reaction_body(target, "like")),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["user_id"], user.to_string());
    assert_eq!(body["entity_type"], "business");
    assert_eq!(body["reaction_type"], "like");

    let (status, body) = app
        .send(
            Method::POST,
            "/api/v1/user-reactions",
            Some(&token),
            Some(reaction_body(target, "like")),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["code"], "REACTION_ALREADY_EXISTS");

    assert_eq!(
        app.ledger.stored_counters(target).await.unwrap(),
        ReactionTally::new(1, 0)
    );
}

#[tokio::test]
async fn test_create_rejects_bad_input() {
    let app = TestApp::new();
    let (_, token) = app.user().await;

    let (status, body) = app
        .send(
            Method::POST,
            "/api/v1/user-reactions",
            Some(&token),
            Some(json!({
                "entity_type": "comment",
                "entity_id": Uuid::new_v4(),
                "reaction_type": "like",
            })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "INVALID_REQUEST_BODY");

    let (status, body) = app
        .send(
            Method::POST,
            "/api/v1/user-reactions",
            Some(&token),
            Some(json!({
                "entity_type": "event",
                "entity_id": Uuid::nil(),
                "reaction_type": "like",
            })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_create_unknown_target() {
    let app = TestApp::new();
    let (_, token) = app.user().await;
    let missing = TargetRef::new(TargetKind::Article, Uuid::new_v4());

    let (status, body) = app
        .send(
            Method::POST,
            "/api/v1/user-reactions",
            Some(&token),
            Some(reaction_body(missing, "favorite")),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "UNKNOWN_TARGET");
    assert_eq!(app.ledger.reaction_count().await, 0);
}

#[tokio::test]
async fn test_toggle_round_trip() {
    let app = TestApp::new();
    let (_, token) = app.user().await;
    let target = app.target(TargetKind::Event).await;

    let (status, body) = app
        .send(
            Method::POST,
            "/api/v1/user-reactions/toggle",
            Some(&token),
            Some(reaction_body(target, "favorite")),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["action"], "added");
    assert_eq!(body["reaction"]["reaction_type"], "favorite");

    let (status, body) = app
        .send(
            Method::POST,
            "/api/v1/user-reactions/toggle",
            Some(&token),
            Some(reaction_body(target, "favorite")),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["action"], "removed");
    assert!(body.get("reaction").is_none());

    assert_eq!(
        app.ledger.stored_counters(target).await.unwrap(),
        ReactionTally::default()
    );
}

#[tokio::test]
async fn test_update_and_delete_by_id() {
    let app = TestApp::new();
    let (_, token) = app.user().await;
    let (_, other_token) = app.user().await;
    let target = app.target(TargetKind::Professional).await;

    let (_, created) = app
        .send(
            Method::POST,
            "/api/v1/user-reactions",
            Some(&token),
            Some(reaction_body(target, "like")),
        )
        .await;
    let uri = format!("/api/v1/user-reactions/{}", created["id"].as_str().unwrap());

    let (status, body) = app
        .send(
            Method::PATCH,
            &uri,
            Some(&other_token),
            Some(json!({ "reaction_type": "favorite" })),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"]["code"], "NOT_REACTION_OWNER");

    let (status, body) = app
        .send(
            Method::PATCH,
            &uri,
            Some(&token),
            Some(json!({ "reaction_type": "favorite" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], created["id"]);
    assert_eq!(body["reaction_type"], "favorite");
    assert_eq!(
        app.ledger.stored_counters(target).await.unwrap(),
        ReactionTally::new(0, 1)
    );

    let (status, _) = app.send(Method::DELETE, &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = app.send(Method::GET, &uri, None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "UNKNOWN_REACTION");
}

#[tokio::test]
async fn test_delete_by_entity_key() {
    let app = TestApp::new();
    let (_, token) = app.user().await;
    let target = app.target(TargetKind::Article).await;
    let uri = format!("{}/like", entity_uri(target));

    let (status, _) = app.send(Method::DELETE, &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    app.send(
        Method::POST,
        "/api/v1/user-reactions",
        Some(&token),
        Some(reaction_body(target, "like")),
    )
    .await;
    let (status, _) = app.send(Method::DELETE, &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(
        app.ledger.stored_counters(target).await.unwrap(),
        ReactionTally::default()
    );

    let bad = format!("{}/love", entity_uri(target));
    let (status, body) = app.send(Method::DELETE, &bad, Some(&token), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "INVALID_PATH_PARAMETER");
}

#[tokio::test]
async fn test_list_queries() {
    let app = TestApp::new();
    let (user, token) = app.user().await;
    let (_, other_token) = app.user().await;
    let target = app.target(TargetKind::Business).await;

    for (token, kind) in [(&token, "like"), (&token, "favorite"), (&other_token, "like")] {
        let (status, _) = app
            .send(
                Method::POST,
                "/api/v1/user-reactions",
                Some(token),
                Some(reaction_body(target, kind)),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (_, all) = app
        .send(Method::GET, "/api/v1/user-reactions", None, None)
        .await;
    assert_eq!(all.as_array().unwrap().len(), 3);

    let by_user = format!("/api/v1/user-reactions/user/{user}");
    let (status, body) = app.send(Method::GET, &by_user, None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "MISSING_AUTHORIZATION");

    let (status, mine) = app.send(Method::GET, &by_user, Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(mine.as_array().unwrap().len(), 2);

    let (_, on_target) = app
        .send(Method::GET, &entity_uri(target), None, None)
        .await;
    assert_eq!(on_target.as_array().unwrap().len(), 3);
}

// ============================================================================
// Counters
// ============================================================================

#[tokio::test]
async fn test_counter_audit_and_reconcile() {
    let app = TestApp::new();
    let (_, token) = app.user().await;
    let target = app.target(TargetKind::Event).await;
    app.send(
        Method::POST,
        "/api/v1/user-reactions",
        Some(&token),
        Some(reaction_body(target, "like")),
    )
    .await;
    app.ledger
        .set_counters(target, ReactionTally::new(4, 1))
        .await;

    let counters_uri = format!("{}/counters", entity_uri(target));
    let (status, body) = app.send(Method::GET, &counters_uri, None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["in_sync"], false);
    assert_eq!(body["stored"]["like_count"], 4);
    assert_eq!(body["live"]["like_count"], 1);

    let reconcile_uri = format!("{counters_uri}/reconcile");
    let (status, _) = app.send(Method::POST, &reconcile_uri, None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app
        .send(Method::POST, &reconcile_uri, Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = app.send(Method::GET, &counters_uri, None, None).await;
    assert_eq!(body["in_sync"], true);
    assert_eq!(body["stored"]["favorite_count"], 0);
}

#[tokio::test]
async fn test_counter_failure_surfaces_as_server_error() {
    let app = TestApp::new();
    let (_, token) = app.user().await;
    let target = app.target(TargetKind::Article).await;

    app.ledger.fail_counter_updates(true);
    let (status, body) = app
        .send(
            Method::POST,
            "/api/v1/user-reactions",
            Some(&token),
            Some(reaction_body(target, "like")),
        )
        .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"]["code"], "COUNTER_UPDATE_FAILED");
    assert_eq!(app.ledger.reaction_count().await, 0);
}
