use axum::response::{Html, IntoResponse, Response};

use appointment_cell::models::AppointmentError;
use doctor_cell::models::DoctorError;
use patient_cell::models::PatientError;
use shared_database::DatabaseError;
use shared_models::error::AppError;

use crate::views;

/// [`AppError`] rendered as an HTML page instead of JSON.
#[derive(Debug)]
pub struct PageError(pub AppError);

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        let status = self.0.status();

        let message = if status.is_server_error() {
            tracing::error!("Page error: {}: {}", status, self.0.message());
            "Something went wrong. Please try again later."
        } else {
            self.0.message()
        };

        let title = status.canonical_reason().unwrap_or("Error");
        (status, Html(views::error_page(title, message))).into_response()
    }
}

impl From<DatabaseError> for PageError {
    fn from(err: DatabaseError) -> Self {
        PageError(err.into())
    }
}

impl From<DoctorError> for PageError {
    fn from(err: DoctorError) -> Self {
        PageError(err.into())
    }
}

impl From<PatientError> for PageError {
    fn from(err: PatientError) -> Self {
        PageError(err.into())
    }
}

impl From<AppointmentError> for PageError {
    fn from(err: AppointmentError) -> Self {
        PageError(err.into())
    }
}
