use axum::{
    middleware,
    routing::get,
    Router,
};

use shared_utils::extractor::admin_middleware;
use shared_utils::AppState;

use crate::handlers;

/// Operator CRUD over appointments, mounted under `/admin/appointments`.
pub fn appointment_admin_routes(state: AppState) -> Router {
    Router::new()
        .route(
            "/",
            get(handlers::list_appointments).post(handlers::create_appointment),
        )
        .route(
            "/{appointment_id}",
            get(handlers::get_appointment)
                .put(handlers::update_appointment)
                .delete(handlers::delete_appointment),
        )
        .layer(middleware::from_fn_with_state(state.clone(), admin_middleware))
        .with_state(state)
}
