//! Gateway client scenarios against a real HTTP server: the 401 refresh
//! protocol, envelope handling, and status-class notifications.

mod common;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use httpmock::Method::{GET, POST, PUT};
use httpmock::MockServer;
use secrecy::ExposeSecret;
use serde_json::json;
use url::Url;

use lotus_threads_core::{OrderId, ProductId};
use lotus_threads_storefront::ClientConfig;
use lotus_threads_storefront::api::{ApiClient, ApiError};
use lotus_threads_storefront::notify::{Notification, RecordingNotifier};
use lotus_threads_storefront::session::SessionProvider;

use common::signed_in;

fn config(server: &MockServer) -> ClientConfig {
    ClientConfig {
        api_base_url: Url::parse(&format!("{}/", server.base_url())).expect("base url"),
        request_timeout: Duration::from_secs(5),
        payment_poll_interval: Duration::from_secs(5),
        payment_redirect_grace: Duration::from_secs(3),
        payment_max_checks: 60,
        guest_store_path: PathBuf::from("unused.json"),
    }
}

fn client(
    server: &MockServer,
    session: Arc<SessionProvider>,
) -> (ApiClient, Arc<RecordingNotifier>) {
    let notifier = Arc::new(RecordingNotifier::default());
    let api = ApiClient::new(&config(server), session, notifier.clone()).expect("client");
    (api, notifier)
}

fn envelope(data: serde_json::Value) -> serde_json::Value {
    json!({ "success": true, "message": "", "data": data })
}

fn empty_cart() -> serde_json::Value {
    envelope(json!({ "items": [], "totalPrice": "0" }))
}

#[tokio::test]
async fn a_stale_token_is_refreshed_and_the_request_retried_once() {
    let server = MockServer::start_async().await;

    let stale = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/cart")
                .header("authorization", "Bearer access-token");
            then.status(401);
        })
        .await;
    let refresh = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/auth/refresh")
                .json_body(json!({ "refreshToken": "refresh-token" }));
            then.status(200).json_body(envelope(json!({
                "accessToken": "fresh-access",
                "refreshToken": "fresh-refresh",
            })));
        })
        .await;
    let retried = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/cart")
                .header("authorization", "Bearer fresh-access");
            then.status(200).json_body(empty_cart());
        })
        .await;

    let session = signed_in();
    let (api, notifier) = client(&server, Arc::clone(&session));

    let items = api.fetch_cart().await.expect("retried fetch");
    assert!(items.is_empty());

    // Exactly one refresh and one retry, tokens rotated, nothing surfaced.
    stale.assert_async().await;
    refresh.assert_async().await;
    retried.assert_async().await;
    let token = session.access_token().expect("still signed in");
    assert_eq!(token.expose_secret(), "fresh-access");
    assert!(notifier.events().is_empty());
}

#[tokio::test]
async fn a_second_401_after_refresh_forces_sign_out() {
    let server = MockServer::start_async().await;

    let cart = server
        .mock_async(|when, then| {
            when.method(GET).path("/cart");
            then.status(401);
        })
        .await;
    let refresh = server
        .mock_async(|when, then| {
            when.method(POST).path("/auth/refresh");
            then.status(200).json_body(envelope(json!({
                "accessToken": "fresh-access",
                "refreshToken": "fresh-refresh",
            })));
        })
        .await;

    let session = signed_in();
    let (api, notifier) = client(&server, Arc::clone(&session));

    let err = api.fetch_cart().await.expect_err("second 401");
    assert!(matches!(err, ApiError::Unauthorized));

    // One original attempt plus one retry, then a forced sign-out.
    cart.assert_hits_async(2).await;
    refresh.assert_async().await;
    assert!(!session.is_authenticated());
    assert_eq!(notifier.events(), vec![Notification::SessionExpired]);
}

#[tokio::test]
async fn a_failed_refresh_forces_sign_out_without_a_retry() {
    let server = MockServer::start_async().await;

    let cart = server
        .mock_async(|when, then| {
            when.method(GET).path("/cart");
            then.status(401);
        })
        .await;
    let refresh = server
        .mock_async(|when, then| {
            when.method(POST).path("/auth/refresh");
            then.status(401);
        })
        .await;

    let session = signed_in();
    let (api, notifier) = client(&server, Arc::clone(&session));

    let err = api.fetch_cart().await.expect_err("refresh failed");
    assert!(matches!(err, ApiError::Unauthorized));

    cart.assert_async().await;
    refresh.assert_async().await;
    assert!(!session.is_authenticated());
    assert_eq!(notifier.events(), vec![Notification::SessionExpired]);
}

#[tokio::test]
async fn a_guest_401_is_surfaced_without_refresh_or_notification() {
    let server = MockServer::start_async().await;

    let cart = server
        .mock_async(|when, then| {
            when.method(GET).path("/cart");
            then.status(401);
        })
        .await;
    let refresh = server
        .mock_async(|when, then| {
            when.method(POST).path("/auth/refresh");
            then.status(200);
        })
        .await;

    let (api, notifier) = client(&server, Arc::new(SessionProvider::new()));

    let err = api.fetch_cart().await.expect_err("unauthenticated");
    assert!(matches!(err, ApiError::Unauthorized));

    cart.assert_async().await;
    assert_eq!(refresh.hits_async().await, 0);
    assert!(notifier.events().is_empty());
}

#[tokio::test]
async fn category_reads_and_registration_need_no_session() {
    let server = MockServer::start_async().await;

    server
        .mock_async(|when, then| {
            when.method(GET).path("/categories/root");
            then.status(200).json_body(envelope(json!([{
                "id": "cat-1",
                "name": "Áo",
                "slug": "ao",
                "active": true,
                "productCount": 12,
                "children": [],
                "createdAt": "2025-01-01T00:00:00Z",
                "updatedAt": "2025-01-01T00:00:00Z",
            }])));
        })
        .await;
    let register = server
        .mock_async(|when, then| {
            when.method(POST).path("/auth/register").json_body(json!({
                "email": "b@example.com",
                "firstName": "Trần",
                "lastName": "Thị B",
                "password": "hunter2hunter2",
            }));
            then.status(200).json_body(envelope(json!(null)));
        })
        .await;

    let session = Arc::new(SessionProvider::new());
    let (api, _) = client(&server, Arc::clone(&session));

    let roots = api.root_categories().await.expect("root categories");
    assert_eq!(roots.len(), 1);
    assert!(roots[0].is_root());
    assert_eq!(roots[0].slug, "ao");

    api.register("b@example.com", "Trần", "Thị B", "hunter2hunter2")
        .await
        .expect("register");
    register.assert_async().await;
    // Registration never establishes a session.
    assert!(!session.is_authenticated());
}

#[tokio::test]
async fn an_unsuccessful_envelope_is_rejected_with_its_message() {
    let server = MockServer::start_async().await;

    server
        .mock_async(|when, then| {
            when.method(GET).path("/cart");
            then.status(200).json_body(json!({
                "success": false,
                "message": "Cart is temporarily unavailable",
            }));
        })
        .await;

    let (api, notifier) = client(&server, signed_in());

    let err = api.fetch_cart().await.expect_err("rejected envelope");
    match err {
        ApiError::Envelope(message) => assert_eq!(message, "Cart is temporarily unavailable"),
        other => panic!("unexpected error: {other}"),
    }
    assert!(notifier.events().is_empty());
}

#[tokio::test]
async fn server_and_not_found_errors_notify_the_user() {
    let server = MockServer::start_async().await;

    server
        .mock_async(|when, then| {
            when.method(GET).path("/cart");
            then.status(500);
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/orders/ord-404");
            then.status(404);
        })
        .await;

    let (api, notifier) = client(&server, signed_in());

    assert!(matches!(
        api.fetch_cart().await.expect_err("server error"),
        ApiError::Server(500)
    ));
    assert!(matches!(
        api.order(&OrderId::new("ord-404"))
            .await
            .expect_err("missing order"),
        ApiError::NotFound(_)
    ));
    assert_eq!(
        notifier.events(),
        vec![
            Notification::Error("Server error occurred. Please try again later.".to_owned()),
            Notification::Error("The requested resource was not found".to_owned()),
        ]
    );
}

#[tokio::test]
async fn validation_errors_notify_per_field_but_bad_requests_stay_contextual() {
    let server = MockServer::start_async().await;

    server
        .mock_async(|when, then| {
            when.method(POST).path("/cart/add");
            then.status(422).json_body(json!({
                "success": false,
                "message": "Validation failed",
                "errors": { "quantity": ["Quantity must be positive"] },
            }));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(PUT).path("/cart/update");
            then.status(400).json_body(json!({
                "success": false,
                "message": "Quantity exceeds available stock",
            }));
        })
        .await;

    let (api, notifier) = client(&server, signed_in());
    let id = ProductId::new("prod-1");

    assert!(matches!(
        api.cart_add(&id, 2).await.expect_err("validation"),
        ApiError::Validation(_)
    ));
    match api.cart_update(&id, 99).await.expect_err("bad request") {
        ApiError::BadRequest(message) => {
            assert_eq!(message, "Quantity exceeds available stock");
        }
        other => panic!("unexpected error: {other}"),
    }

    // 422 notifies per field; 400 is left to the caller.
    assert_eq!(
        notifier.events(),
        vec![Notification::Error("Quantity must be positive".to_owned())]
    );
}
