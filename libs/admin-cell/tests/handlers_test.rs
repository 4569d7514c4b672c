use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    response::Response,
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use admin_cell::admin_routes;
use admin_cell::services::PasswordService;
use doctor_cell::models::CreateDoctorRequest;
use doctor_cell::services::DoctorService;
use shared_utils::test_utils::{JwtTestUtils, TestConfig, TestDatabase};
use shared_utils::AppState;

const PASSWORD: &str = "s3cret-operator-pass";

fn app(db: &TestDatabase) -> Router {
    let config = TestConfig {
        admin_password_hash: PasswordService::hash_password(PASSWORD).unwrap(),
        ..TestConfig::default()
    };
    admin_routes(config.to_state(db))
}

fn json_request(method: Method, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn bearer_request(method: Method, uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, JwtTestUtils::bearer(token))
        .body(Body::empty())
        .unwrap()
}

async fn json_body(response: Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn login_issues_usable_token() {
    let db = TestDatabase::new();

    let response = app(&db)
        .oneshot(json_request(
            Method::POST,
            "/admin/login",
            json!({ "username": "admin", "password": PASSWORD }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let token = json_body(response).await["token"].as_str().unwrap().to_string();

    let response = app(&db)
        .oneshot(bearer_request(Method::GET, "/admin/session", &token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let session = json_body(response).await;
    assert_eq!(session["username"], "admin");
    assert_eq!(session["role"], "admin");
}

#[tokio::test]
async fn login_rejects_wrong_credentials() {
    let db = TestDatabase::new();

    for (username, password) in [("admin", "wrong"), ("root", PASSWORD)] {
        let response = app(&db)
            .oneshot(json_request(
                Method::POST,
                "/admin/login",
                json!({ "username": username, "password": password }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}

#[tokio::test]
async fn login_disabled_without_hash() {
    let db = TestDatabase::new();
    let app = admin_routes(TestConfig::default().to_state(&db));

    let response = app
        .oneshot(json_request(
            Method::POST,
            "/admin/login",
            json!({ "username": "admin", "password": PASSWORD }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn login_with_out_of_range_lifetime_fails_cleanly() {
    let db = TestDatabase::new();
    let mut config = TestConfig {
        admin_password_hash: PasswordService::hash_password(PASSWORD).unwrap(),
        ..TestConfig::default()
    }
    .to_app_config(db.path());
    config.token_ttl_minutes = 1_000_000_000_000;

    let response = admin_routes(AppState::new(config))
        .oneshot(json_request(
            Method::POST,
            "/admin/login",
            json!({ "username": "admin", "password": PASSWORD }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(json_body(response).await["error"].is_string());
}

#[tokio::test]
async fn overview_counts_records() {
    let db = TestDatabase::new();
    {
        let conn = db.database.connect().unwrap();
        DoctorService::new(&conn)
            .create_doctor(CreateDoctorRequest {
                first_name: "John".to_string(),
                last_name: "Smith".to_string(),
                specialization: "Cardiology".to_string(),
                phone: "555-0100".to_string(),
            })
            .unwrap();
    }

    let response = app(&db)
        .oneshot(bearer_request(Method::GET, "/admin", &JwtTestUtils::admin_token()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        json_body(response).await,
        json!({ "doctors": 1, "patients": 0, "appointments": 0 })
    );
}

#[tokio::test]
async fn every_admin_surface_requires_token() {
    let db = TestDatabase::new();

    for uri in ["/admin", "/admin/", "/admin/session", "/admin/doctors", "/admin/patients", "/admin/appointments"] {
        let response = app(&db)
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{uri}");
    }
}

#[tokio::test]
async fn verify_reports_token_validity() {
    let db = TestDatabase::new();

    let response = app(&db)
        .oneshot(bearer_request(Method::POST, "/admin/verify", &JwtTestUtils::admin_token()))
        .await
        .unwrap();
    assert_eq!(json_body(response).await["valid"], true);

    let response = app(&db)
        .oneshot(bearer_request(Method::POST, "/admin/verify", &JwtTestUtils::expired_token()))
        .await
        .unwrap();
    assert_eq!(json_body(response).await["valid"], false);
}

#[tokio::test]
async fn verify_without_header_is_invalid() {
    let db = TestDatabase::new();

    let response = app(&db)
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri("/admin/verify")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await, json!({ "valid": false }));
}
