use axum::{
    extract::{Extension, State},
    Json,
};
use axum_extra::{extract::WithRejection, TypedHeader};
use headers::{authorization::Bearer, Authorization};
use serde_json::{json, Value};
use tracing::{debug, info, warn};

use appointment_cell::services::AppointmentService;
use doctor_cell::services::DoctorService;
use patient_cell::services::PatientService;
use shared_models::auth::{LoginRequest, Operator, TokenResponse, ADMIN_ROLE};
use shared_models::error::AppError;
use shared_utils::jwt::{issue_token, validate_token};
use shared_utils::AppState;

use crate::services::PasswordService;

#[axum::debug_handler]
pub async fn login(
    State(state): State<AppState>,
    WithRejection(Json(request), _): WithRejection<Json<LoginRequest>, AppError>,
) -> Result<Json<TokenResponse>, AppError> {
    let config = &state.config;

    if config.jwt_secret.is_empty() || config.admin_password_hash.is_empty() {
        return Err(AppError::Auth("Admin access is not configured".to_string()));
    }

    let password_ok = PasswordService::verify_password(&request.password, &config.admin_password_hash)
        .map_err(|e| AppError::Internal(format!("Invalid operator password hash: {}", e)))?;

    if request.username != config.admin_username || !password_ok {
        warn!("Rejected operator login for {:?}", request.username);
        return Err(AppError::Auth("Invalid username or password".to_string()));
    }

    let (token, expires_at) = issue_token(
        &request.username,
        ADMIN_ROLE,
        &config.jwt_secret,
        config.token_ttl_minutes,
    )
    .map_err(AppError::Internal)?;

    info!("Operator {} logged in", request.username);

    Ok(Json(TokenResponse { token, expires_at }))
}

pub async fn verify_token(
    State(state): State<AppState>,
    auth: Option<TypedHeader<Authorization<Bearer>>>,
) -> Json<Value> {
    let Some(TypedHeader(auth)) = auth else {
        debug!("No bearer token to verify");
        return Json(json!({ "valid": false }));
    };

    debug!("Verifying operator token");

    match validate_token(auth.token(), &state.config.jwt_secret) {
        Ok(operator) => Json(json!({ "valid": operator.is_admin() })),
        Err(_) => Json(json!({ "valid": false })),
    }
}

pub async fn session(Extension(operator): Extension<Operator>) -> Json<Operator> {
    Json(operator)
}

/// Record counts per entity kind.
#[axum::debug_handler]
pub async fn overview(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    let conn = state.database.connect()?;

    let doctors = DoctorService::new(&conn).count_doctors()?;
    let patients = PatientService::new(&conn).count_patients()?;
    let appointments = AppointmentService::new(&conn).count_appointments()?;

    Ok(Json(json!({
        "doctors": doctors,
        "patients": patients,
        "appointments": appointments
    })))
}
