use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use appointment_cell::router::appointment_admin_routes;
use doctor_cell::router::doctor_admin_routes;
use patient_cell::router::patient_admin_routes;
use shared_utils::extractor::admin_middleware;
use shared_utils::AppState;

use crate::handlers;

/// The whole operator surface under `/admin`. Only login and token
/// verification are reachable without an admin token.
pub fn admin_routes(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/admin/login", post(handlers::login))
        .route("/admin/verify", post(handlers::verify_token));

    let protected_routes = Router::new()
        .route("/admin", get(handlers::overview))
        .route("/admin/", get(handlers::overview))
        .route("/admin/session", get(handlers::session))
        .layer(middleware::from_fn_with_state(state.clone(), admin_middleware));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .with_state(state.clone())
        .nest("/admin/doctors", doctor_admin_routes(state.clone()))
        .nest("/admin/patients", patient_admin_routes(state.clone()))
        .nest("/admin/appointments", appointment_admin_routes(state))
}
