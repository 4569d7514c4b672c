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

use crate::models::{CreatePatientRequest, DischargeRequest, UpdatePatientRequest};
use crate::services::PatientService;

#[axum::debug_handler]
pub async fn list_patients(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    let conn = state.database.connect()?;
    let patients = PatientService::new(&conn).list_patients()?;

    Ok(Json(json!({
        "patients": patients,
        "total": patients.len()
    })))
}

#[axum::debug_handler]
pub async fn create_patient(
    State(state): State<AppState>,
    Extension(operator): Extension<Operator>,
    WithRejection(Json(request), _): WithRejection<Json<CreatePatientRequest>, AppError>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let conn = state.database.connect()?;
    let patient = PatientService::new(&conn).create_patient(request)?;

    info!("Operator {} admitted patient {}", operator.username, patient.id);

    Ok((StatusCode::CREATED, Json(json!(patient))))
}

#[axum::debug_handler]
pub async fn get_patient(
    State(state): State<AppState>,
    Path(patient_id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    let conn = state.database.connect()?;
    let patient = PatientService::new(&conn).get_patient(patient_id)?;

    Ok(Json(json!(patient)))
}

#[axum::debug_handler]
pub async fn update_patient(
    State(state): State<AppState>,
    Extension(operator): Extension<Operator>,
    Path(patient_id): Path<i64>,
    WithRejection(Json(request), _): WithRejection<Json<UpdatePatientRequest>, AppError>,
) -> Result<Json<Value>, AppError> {
    let conn = state.database.connect()?;
    let patient = PatientService::new(&conn).update_patient(patient_id, request)?;

    info!("Operator {} updated patient {}", operator.username, patient_id);

    Ok(Json(json!(patient)))
}

#[axum::debug_handler]
pub async fn discharge_patient(
    State(state): State<AppState>,
    Extension(operator): Extension<Operator>,
    Path(patient_id): Path<i64>,
    WithRejection(request, _): WithRejection<Option<Json<DischargeRequest>>, AppError>,
) -> Result<Json<Value>, AppError> {
    let at = request.and_then(|Json(body)| body.discharged_at);

    let conn = state.database.connect()?;
    let patient = PatientService::new(&conn).discharge_patient(patient_id, at)?;

    info!("Operator {} discharged patient {}", operator.username, patient_id);

    Ok(Json(json!(patient)))
}

#[axum::debug_handler]
pub async fn delete_patient(
    State(state): State<AppState>,
    Extension(operator): Extension<Operator>,
    Path(patient_id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    let conn = state.database.connect()?;
    let deletion = PatientService::new(&conn).delete_patient(patient_id)?;

    info!("Operator {} deleted patient {}", operator.username, patient_id);

    Ok(Json(json!(deletion)))
}
