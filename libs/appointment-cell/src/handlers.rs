use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    Json,
};
use axum_extra::extract::WithRejection;
use serde_json::{json, Value};
use tracing::info;

use shared_models::auth::Operator;
use shared_models::error::AppError;
use shared_utils::AppState;

use crate::models::{BookByIdRequest, UpdateAppointmentRequest};
use crate::services::{AppointmentBookingService, AppointmentService};

#[axum::debug_handler]
pub async fn list_appointments(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    let conn = state.database.connect()?;
    let appointments = AppointmentService::new(&conn).list_appointments()?;

    Ok(Json(json!({
        "appointments": appointments,
        "total": appointments.len()
    })))
}

#[axum::debug_handler]
pub async fn create_appointment(
    State(state): State<AppState>,
    Extension(operator): Extension<Operator>,
    WithRejection(Json(request), _): WithRejection<Json<BookByIdRequest>, AppError>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let conn = state.database.connect()?;
    let appointment = AppointmentBookingService::new(&conn).book_for_patient(request)?;

    info!("Operator {} booked appointment {}", operator.username, appointment.id);

    Ok((StatusCode::CREATED, Json(json!(appointment))))
}

#[axum::debug_handler]
pub async fn get_appointment(
    State(state): State<AppState>,
    Path(appointment_id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    let conn = state.database.connect()?;
    let appointment = AppointmentService::new(&conn).get_appointment(appointment_id)?;

    Ok(Json(json!(appointment)))
}

#[axum::debug_handler]
pub async fn update_appointment(
    State(state): State<AppState>,
    Extension(operator): Extension<Operator>,
    Path(appointment_id): Path<i64>,
    WithRejection(Json(request), _): WithRejection<Json<UpdateAppointmentRequest>, AppError>,
) -> Result<Json<Value>, AppError> {
    let conn = state.database.connect()?;
    let appointment = AppointmentService::new(&conn).update_appointment(appointment_id, request)?;

    info!("Operator {} updated appointment {}", operator.username, appointment_id);

    Ok(Json(json!(appointment)))
}

#[axum::debug_handler]
pub async fn delete_appointment(
    State(state): State<AppState>,
    Extension(operator): Extension<Operator>,
    Path(appointment_id): Path<i64>,
) -> Result<StatusCode, AppError> {
    let conn = state.database.connect()?;
    AppointmentService::new(&conn).delete_appointment(appointment_id)?;

    info!("Operator {} deleted appointment {}", operator.username, appointment_id);

    Ok(StatusCode::NO_CONTENT)
}
