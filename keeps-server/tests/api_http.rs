//! HTTP-level tests through the full middleware stack: auth gating, the
//! register/login flow and the storefront order path.

use std::str::FromStr;
use std::sync::Arc;

use axum::Router;
use axum::body::{Body, to_bytes};
use http::{Request, StatusCode, header};
use rust_decimal::Decimal;
use serde_json::{Value, json};
use tower::ServiceExt;

use keeps_server::auth::{JwtConfig, JwtService};
use keeps_server::core::{Config, ServerState, build_app};
use keeps_server::db::DbService;
use keeps_server::db::models::{CouponCreate, now_millis};
use keeps_server::db::repository::CouponRepository;
use keeps_server::payment::MockGateway;

fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

async fn test_app() -> (tempfile::TempDir, Router, ServerState) {
    let tmp = tempfile::tempdir().unwrap();
    let service = DbService::new(tmp.path()).await.unwrap();

    let jwt = JwtConfig {
        secret: "integration-test-secret-integration-test".to_string(),
        expiration_minutes: 60,
        issuer: "keeps-server".to_string(),
        audience: "keeps-clients".to_string(),
    };
    let config = Config {
        work_dir: tmp.path().display().to_string(),
        http_port: 0,
        jwt: jwt.clone(),
        environment: "test".to_string(),
        currency: "php".to_string(),
        stripe_secret_key: None,
    };

    let state = ServerState::with_parts(
        config,
        service.db,
        Arc::new(JwtService::new(jwt)),
        Arc::new(MockGateway),
    );
    (tmp, build_app(state.clone()), state)
}

async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(req).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

fn post_json(uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::post(uri).header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn get(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::get(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder.body(Body::empty()).unwrap()
}

/// Register and log in a shopper, returning their bearer token
async fn signup(app: &Router, username: &str) -> String {
    let (status, _) = send(
        app,
        post_json(
            "/api/auth/register",
            None,
            json!({
                "username": username,
                "email": format!("{}@example.com", username),
                "password": "correct-horse-battery",
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(
        app,
        post_json(
            "/api/auth/login",
            None,
            json!({ "username": username, "password": "correct-horse-battery" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    body["token"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn health_and_product_reads_are_public() {
    let (_tmp, app, _state) = test_app().await;

    let (status, body) = send(&app, get("/api/health", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");

    let (status, _) = send(&app, get("/api/products", None)).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn protected_routes_reject_missing_and_bad_tokens() {
    let (_tmp, app, _state) = test_app().await;

    let (status, body) = send(&app, get("/api/cart", None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "E3001");

    let (status, body) = send(&app, get("/api/orders", Some("not.a.token"))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "E3002");
}

#[tokio::test]
async fn login_rejects_wrong_password_with_a_uniform_message() {
    let (_tmp, app, _state) = test_app().await;
    signup(&app, "carol").await;

    let (status, body) = send(
        &app,
        post_json(
            "/api/auth/login",
            None,
            json!({ "username": "carol", "password": "wrong-password-entirely" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (ghost_status, ghost_body) = send(
        &app,
        post_json(
            "/api/auth/login",
            None,
            json!({ "username": "nobody-here", "password": "wrong-password-entirely" }),
        ),
    )
    .await;
    assert_eq!(ghost_status, status);
    assert_eq!(ghost_body["message"], body["message"]);
}

#[tokio::test]
async fn duplicate_usernames_conflict() {
    let (_tmp, app, _state) = test_app().await;
    signup(&app, "dave").await;

    let (status, body) = send(
        &app,
        post_json(
            "/api/auth/register",
            None,
            json!({
                "username": "dave",
                "email": "dave2@example.com",
                "password": "correct-horse-battery",
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "E0004");
}

#[tokio::test]
async fn non_staff_cannot_mutate_products_or_coupons() {
    let (_tmp, app, _state) = test_app().await;
    let token = signup(&app, "erin").await;

    let (status, body) = send(
        &app,
        post_json(
            "/api/products",
            Some(&token),
            json!({ "name": "Custom Mug", "description": "", "price": "300.00" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], "E2001");

    let (status, _) = send(&app, get("/api/coupons", Some(&token))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn shopper_builds_a_cart_and_orders_with_a_coupon() {
    let (_tmp, app, state) = test_app().await;
    let token = signup(&app, "frank").await;

    let now = now_millis();
    CouponRepository::new(state.get_db())
        .create(CouponCreate {
            code: "SAVE10".to_string(),
            discount_percent: dec("10"),
            valid_from: now - 1_000,
            valid_to: now + 86_400_000,
            active: Some(true),
        })
        .await
        .unwrap();

    // Same mug twice merges; the tote is its own row
    for _ in 0..2 {
        let (status, _) = send(
            &app,
            post_json(
                "/api/cart",
                Some(&token),
                json!({ "product_name": "Custom Mug", "price": "300.00", "quantity": 1 }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }
    let (status, merged) = send(
        &app,
        post_json(
            "/api/cart",
            Some(&token),
            json!({ "product_name": "Custom Tote Bag", "price": "400.00", "quantity": 1 }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(merged["base_color"], "White");

    let (_, cart) = send(&app, get("/api/cart", Some(&token))).await;
    assert_eq!(cart.as_array().unwrap().len(), 2);

    // Preview, then pay the discounted amount
    let (status, quote) = send(
        &app,
        post_json(
            "/api/checkout/preview_coupon",
            Some(&token),
            json!({ "code": "save10", "amount": "1000.00" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(dec(quote["final_amount"].as_str().unwrap()), dec("900.00"));

    let (status, pay) = send(
        &app,
        post_json(
            "/api/checkout/pay",
            Some(&token),
            json!({ "amount": "900.00", "coupon_code": "save10" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let intent_id = pay["paymentIntentId"].as_str().unwrap().to_string();
    assert!(pay["clientSecret"].as_str().unwrap().contains("_secret_"));

    let (status, order) = send(
        &app,
        post_json(
            "/api/orders/create_from_cart",
            Some(&token),
            json!({ "coupon_code": "save10", "payment_intent_id": intent_id }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(dec(order["total_amount"].as_str().unwrap()), dec("1000.00"));
    assert_eq!(dec(order["discount"].as_str().unwrap()), dec("100.00"));
    assert_eq!(dec(order["total"].as_str().unwrap()), dec("900.00"));
    assert_eq!(order["coupon"], "SAVE10");
    assert_eq!(order["status"], "preparing");
    assert_eq!(order["items"].as_array().unwrap().len(), 2);
    assert!(!order["order_id"].as_str().unwrap().is_empty());

    // The cart is now empty and a second conversion is refused
    let (_, cart) = send(&app, get("/api/cart", Some(&token))).await;
    assert!(cart.as_array().unwrap().is_empty());

    let (status, body) = send(
        &app,
        post_json("/api/orders/create_from_cart", Some(&token), json!({})),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], "E0005");

    // The order shows up in the shopper's history, but not in a stranger's
    let (_, orders) = send(&app, get("/api/orders", Some(&token))).await;
    assert_eq!(orders.as_array().unwrap().len(), 1);

    let stranger = signup(&app, "grace").await;
    let (_, orders) = send(&app, get("/api/orders", Some(&stranger))).await;
    assert!(orders.as_array().unwrap().is_empty());
}
