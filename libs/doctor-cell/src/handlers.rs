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

use crate::models::{CreateDoctorRequest, UpdateDoctorRequest};
use crate::services::DoctorService;

#[axum::debug_handler]
pub async fn list_doctors(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    let conn = state.database.connect()?;
    let doctors = DoctorService::new(&conn).list_doctors()?;

    Ok(Json(json!({
        "doctors": doctors,
        "total": doctors.len()
    })))
}

#[axum::debug_handler]
pub async fn create_doctor(
    State(state): State<AppState>,
    Extension(operator): Extension<Operator>,
    WithRejection(Json(request), _): WithRejection<Json<CreateDoctorRequest>, AppError>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let conn = state.database.connect()?;
    let doctor = DoctorService::new(&conn).create_doctor(request)?;

    info!("Operator {} created doctor {}", operator.username, doctor.id);

    Ok((StatusCode::CREATED, Json(json!(doctor))))
}

#[axum::debug_handler]
pub async fn get_doctor(
    State(state): State<AppState>,
    Path(doctor_id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    let conn = state.database.connect()?;
    let doctor = DoctorService::new(&conn).get_doctor(doctor_id)?;

    Ok(Json(json!(doctor)))
}

#[axum::debug_handler]
pub async fn update_doctor(
    State(state): State<AppState>,
    Extension(operator): Extension<Operator>,
    Path(doctor_id): Path<i64>,
    WithRejection(Json(request), _): WithRejection<Json<UpdateDoctorRequest>, AppError>,
) -> Result<Json<Value>, AppError> {
    let conn = state.database.connect()?;
    let doctor = DoctorService::new(&conn).update_doctor(doctor_id, request)?;

    info!("Operator {} updated doctor {}", operator.username, doctor_id);

    Ok(Json(json!(doctor)))
}

#[axum::debug_handler]
pub async fn delete_doctor(
    State(state): State<AppState>,
    Extension(operator): Extension<Operator>,
    Path(doctor_id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    let conn = state.database.connect()?;
    let deletion = DoctorService::new(&conn).delete_doctor(doctor_id)?;

    info!("Operator {} deleted doctor {}", operator.username, doctor_id);

    Ok(Json(json!(deletion)))
}
