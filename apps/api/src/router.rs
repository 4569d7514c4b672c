use axum::Router;

use admin_cell::admin_routes;
use pages_cell::page_routes;
use shared_utils::AppState;

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .merge(page_routes(state.clone()))
        .merge(admin_routes(state))
}

#[cfg(test)]
mod tests {
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use tower::ServiceExt;

    use shared_utils::test_utils::{TestConfig, TestDatabase};

    use super::*;

    #[tokio::test]
    async fn serves_pages_and_guards_admin() {
        let db = TestDatabase::new();
        let app = create_router(TestConfig::default().to_state(&db));

        let response = app
            .clone()
            .oneshot(Request::builder().uri("/patients/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app
            .oneshot(Request::builder().uri("/admin/doctors").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
