use axum::{routing::get, Router};

use shared_utils::AppState;

use crate::handlers;

pub fn page_routes(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::home))
        .route("/doctors/", get(handlers::doctor_list))
        .route("/patients/", get(handlers::patient_list))
        .route(
            "/book-appointment/{doctor_id}/",
            get(handlers::booking_form).post(handlers::submit_booking),
        )
        .with_state(state)
}
