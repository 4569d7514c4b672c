use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use shared_utils::extractor::admin_middleware;
use shared_utils::AppState;

use crate::handlers::*;

/// Operator CRUD over patients, mounted under `/admin/patients`.
pub fn patient_admin_routes(state: AppState) -> Router {
    Router::new()
        .route("/", get(list_patients).post(create_patient))
        .route(
            "/{patient_id}",
            get(get_patient).put(update_patient).delete(delete_patient),
        )
        .route("/{patient_id}/discharge", post(discharge_patient))
        .layer(middleware::from_fn_with_state(state.clone(), admin_middleware))
        .with_state(state)
}
