use axum::{
    middleware,
    routing::get,
    Router,
};

use shared_utils::extractor::admin_middleware;
use shared_utils::AppState;

use crate::handlers;

/// Operator CRUD over doctors, mounted under `/admin/doctors`.
pub fn doctor_admin_routes(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::list_doctors).post(handlers::create_doctor))
        .route(
            "/{doctor_id}",
            get(handlers::get_doctor)
                .put(handlers::update_doctor)
                .delete(handlers::delete_doctor),
        )
        .layer(middleware::from_fn_with_state(state.clone(), admin_middleware))
        .with_state(state)
}
