use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use doctor_cell::models::DoctorError;
use patient_cell::models::PatientError;
use shared_database::DatabaseError;
use shared_models::error::AppError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: i64,
    pub patient_id: i64,
    pub doctor_id: i64,
    pub scheduled_at: DateTime<Utc>,
    pub reason: String,
    pub created_at: DateTime<Utc>,
}

/// Booking form input: the patient is named, not identified.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookAppointmentRequest {
    pub patient_name: String,
    pub reason: String,
    /// Defaults to the time of booking.
    pub scheduled_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookByIdRequest {
    pub patient_id: i64,
    pub doctor_id: i64,
    pub reason: String,
    pub scheduled_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateAppointmentRequest {
    pub patient_id: Option<i64>,
    pub doctor_id: Option<i64>,
    pub scheduled_at: Option<DateTime<Utc>>,
    pub reason: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum AppointmentError {
    #[error("Appointment not found")]
    NotFound,

    #[error("Patient not found")]
    PatientNotFound,

    #[error("Doctor not found")]
    DoctorNotFound,

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error(transparent)]
    Database(#[from] DatabaseError),
}

impl From<rusqlite::Error> for AppointmentError {
    fn from(err: rusqlite::Error) -> Self {
        AppointmentError::Database(DatabaseError::Sqlite(err))
    }
}

impl From<DoctorError> for AppointmentError {
    fn from(err: DoctorError) -> Self {
        match err {
            DoctorError::NotFound => AppointmentError::DoctorNotFound,
            DoctorError::ValidationError(msg) => AppointmentError::ValidationError(msg),
            DoctorError::Database(e) => AppointmentError::Database(e),
        }
    }
}

impl From<PatientError> for AppointmentError {
    fn from(err: PatientError) -> Self {
        match err {
            PatientError::NotFound => AppointmentError::PatientNotFound,
            PatientError::DoctorNotFound(_) => AppointmentError::DoctorNotFound,
            PatientError::ValidationError(msg) => AppointmentError::ValidationError(msg),
            PatientError::Database(e) => AppointmentError::Database(e),
        }
    }
}

impl From<AppointmentError> for AppError {
    fn from(err: AppointmentError) -> Self {
        match err {
            AppointmentError::NotFound
            | AppointmentError::PatientNotFound
            | AppointmentError::DoctorNotFound => AppError::NotFound(err.to_string()),
            AppointmentError::ValidationError(msg) => AppError::ValidationError(msg),
            AppointmentError::Database(e) => e.into(),
        }
    }
}
