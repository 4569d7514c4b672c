use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use shared_database::DatabaseError;
use shared_models::error::AppError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Patient {
    pub id: i64,
    pub name: String,
    pub age: u32,
    pub gender: String,
    /// Set once at creation.
    pub admitted_at: DateTime<Utc>,
    pub discharged_at: Option<DateTime<Utc>>,
    pub doctor_id: Option<i64>,
}

impl Patient {
    pub fn is_discharged(&self) -> bool {
        self.discharged_at.is_some()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePatientRequest {
    pub name: String,
    pub age: u32,
    pub gender: String,
    pub doctor_id: Option<i64>,
}

/// Replaces every mutable field. `admitted_at` is not part of it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdatePatientRequest {
    pub name: String,
    pub age: u32,
    pub gender: String,
    pub doctor_id: Option<i64>,
    pub discharged_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DischargeRequest {
    pub discharged_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatientDeletion {
    pub patient_id: i64,
    pub appointments_removed: usize,
}

#[derive(Debug, thiserror::Error)]
pub enum PatientError {
    #[error("Patient not found")]
    NotFound,

    #[error("Doctor {0} not found")]
    DoctorNotFound(i64),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error(transparent)]
    Database(#[from] DatabaseError),
}

impl From<rusqlite::Error> for PatientError {
    fn from(err: rusqlite::Error) -> Self {
        PatientError::Database(DatabaseError::Sqlite(err))
    }
}

impl From<PatientError> for AppError {
    fn from(err: PatientError) -> Self {
        match err {
            PatientError::NotFound | PatientError::DoctorNotFound(_) => AppError::NotFound(err.to_string()),
            PatientError::ValidationError(msg) => AppError::ValidationError(msg),
            PatientError::Database(e) => e.into(),
        }
    }
}
