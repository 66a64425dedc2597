mod common;

use common::{app_state, token_for, TestApp, ADMIN_EMAIL, CHEF_EMAIL, USER_EMAIL};
use marketplace_frontend::errors::GatewayError;
use marketplace_frontend::models::Role;
use marketplace_frontend::routing::LOGIN_PATH;
use marketplace_frontend::services::{AuthFailureSink, ProfileRefresh};
use marketplace_frontend::session::{KeyValueStorage, MemoryStorage, Session, TOKEN_KEY};
use reqwest::StatusCode;
use serde_json::Value;
use std::sync::Arc;

#[tokio::test]
async fn test_bearer_token_attached_when_signed_in() {
    let app = TestApp::signed_in(USER_EMAIL).await;

    let echoed: Value = app.state.api.gateway().get("/echo-auth").await.unwrap();

    assert_eq!(
        echoed["authorization"],
        format!("Bearer {}", token_for(USER_EMAIL))
    );
}

#[tokio::test]
async fn test_no_authorization_header_when_anonymous() {
    let app = TestApp::hydrated().await;

    let echoed: Value = app.state.api.gateway().get("/echo-auth").await.unwrap();

    assert!(echoed["authorization"].is_null());
}

#[tokio::test]
async fn test_token_follows_session_changes() {
    let app = TestApp::signed_in(USER_EMAIL).await;
    app.state.session.logout().await;
    app.state
        .session
        .login(CHEF_EMAIL, common::PASSWORD)
        .await
        .unwrap();

    let echoed: Value = app.state.api.gateway().get("/echo-auth").await.unwrap();
    assert_eq!(
        echoed["authorization"],
        format!("Bearer {}", token_for(CHEF_EMAIL))
    );
}

#[tokio::test]
async fn test_unauthorized_tears_down_session_and_navigates_to_login() {
    let app = TestApp::signed_in(CHEF_EMAIL).await;

    let err = app
        .state
        .api
        .gateway()
        .get::<Value>("/expired")
        .await
        .unwrap_err();

    assert!(matches!(err, GatewayError::AuthorizationFailed));
    assert_eq!(app.state.session.current(), Session::Anonymous);
    assert_eq!(app.storage.get(TOKEN_KEY).await.unwrap(), None);
    assert_eq!(app.state.navigator().current().path, LOGIN_PATH);
}

#[tokio::test]
async fn test_unauthorized_while_anonymous_still_navigates_to_login() {
    let app = TestApp::hydrated().await;

    let err = app
        .state
        .api
        .gateway()
        .get::<Value>("/expired")
        .await
        .unwrap_err();

    assert!(matches!(err, GatewayError::AuthorizationFailed));
    assert_eq!(app.state.navigator().current().path, LOGIN_PATH);
}

#[tokio::test]
async fn test_rejection_of_earlier_token_leaves_new_session_alone() {
    let app = TestApp::signed_in(USER_EMAIL).await;
    let old_token = app.state.session.current().token().cloned();

    app.state.session.logout().await;
    app.state
        .session
        .login(ADMIN_EMAIL, common::PASSWORD)
        .await
        .unwrap();
    let navigated_before = app.state.navigator().current();

    app.state.owner.authorization_failed(old_token).await;

    assert_eq!(app.state.session.current().role(), Some(Role::Admin));
    assert_eq!(app.state.navigator().current(), navigated_before);
}

#[tokio::test]
async fn test_server_error_keeps_session() {
    let app = TestApp::signed_in(USER_EMAIL).await;

    let err = app
        .state
        .api
        .gateway()
        .get::<Value>("/broken")
        .await
        .unwrap_err();

    match err {
        GatewayError::Server { status, message } => {
            assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
            assert_eq!(message, "Database unavailable");
        }
        other => panic!("unexpected error: {:?}", other),
    }
    assert_eq!(app.state.session.current().role(), Some(Role::User));
}

#[tokio::test]
async fn test_validation_payload_is_preserved() {
    let app = TestApp::signed_in(USER_EMAIL).await;

    let err = app
        .state
        .api
        .gateway()
        .get::<Value>("/invalid")
        .await
        .unwrap_err();

    assert_eq!(
        err.validation_message().as_deref(),
        Some("Quantity must be at least 1")
    );
    match err {
        GatewayError::Validation { status, payload } => {
            assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
            assert_eq!(payload["field"], "quantity");
        }
        other => panic!("unexpected error: {:?}", other),
    }
    assert!(app.state.session.current().active().is_some());
}

#[tokio::test]
async fn test_unreachable_backend_is_a_network_error() {
    let storage: Arc<dyn KeyValueStorage> = Arc::new(MemoryStorage::new());
    let settings = marketplace_frontend::config::ApiSettings {
        base_url: "http://127.0.0.1:9".to_string(),
        request_timeout_secs: 2,
    };
    let state = app_state(&settings, storage);
    state.session.hydrate().await;

    let err = state.api.meals().await.unwrap_err();
    assert!(matches!(err, GatewayError::Network(_)));
}

#[tokio::test]
async fn test_meals_decode() {
    let app = TestApp::hydrated().await;

    let meals = app.state.api.meals().await.unwrap();

    assert_eq!(meals.len(), 2);
    assert_eq!(meals[0].id, "meal-1");
    assert_eq!(meals[0].ingredients, vec!["hilsa", "mustard"]);
    assert_eq!(meals[1].food_image, None);
}

#[tokio::test]
async fn test_refresh_profile_replaces_identity_wholesale() {
    let app = TestApp::signed_in(USER_EMAIL).await;
    app.mock.backend.set_role(USER_EMAIL, "chef");

    let refreshed = app.state.api.refresh_profile().await.unwrap();

    match refreshed {
        ProfileRefresh::Updated(identity) => assert_eq!(identity.role, Role::Chef),
        other => panic!("unexpected refresh outcome: {:?}", other),
    }
    assert_eq!(app.state.session.current().role(), Some(Role::Chef));
    assert_eq!(
        app.state.session.current().token().map(|t| t.expose().to_string()),
        Some(token_for(USER_EMAIL))
    );
}

#[tokio::test]
async fn test_refresh_profile_without_session_is_discarded() {
    let app = TestApp::hydrated().await;

    let refreshed = app.state.api.refresh_profile().await.unwrap();
    assert!(matches!(refreshed, ProfileRefresh::Discarded));
}

#[tokio::test]
async fn test_meal_id_cannot_reach_another_endpoint() {
    let app = TestApp::signed_in(USER_EMAIL).await;

    let err = app.state.api.meal("../echo-auth").await.unwrap_err();

    match err {
        GatewayError::Server { status, message } => {
            assert_eq!(status, StatusCode::NOT_FOUND);
            assert_eq!(message, "Meal not found");
        }
        other => panic!("unexpected error: {:?}", other),
    }

    let err = app.state.api.meal("..").await.unwrap_err();
    assert!(matches!(err, GatewayError::InvalidPath(_)));
    assert!(app.state.session.current().active().is_some());
}
