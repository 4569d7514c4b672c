use std::collections::HashMap;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use tracing::debug;

use appointment_cell::models::{AppointmentError, BookAppointmentRequest};
use appointment_cell::services::AppointmentBookingService;
use doctor_cell::services::DoctorService;
use patient_cell::services::PatientService;
use shared_models::error::AppError;
use shared_utils::AppState;

use crate::error::PageError;
use crate::models::{BookingForm, BookingFormView, PatientRow};
use crate::views;

pub async fn home() -> Html<String> {
    Html(views::home())
}

#[axum::debug_handler]
pub async fn doctor_list(State(state): State<AppState>) -> Result<Html<String>, PageError> {
    let conn = state.database.connect()?;
    let doctors = DoctorService::new(&conn).list_doctors()?;

    Ok(Html(views::doctor_list(&doctors)))
}

#[axum::debug_handler]
pub async fn patient_list(State(state): State<AppState>) -> Result<Html<String>, PageError> {
    let conn = state.database.connect()?;
    let patients = PatientService::new(&conn).list_patients()?;
    let doctor_names: HashMap<i64, String> = DoctorService::new(&conn)
        .list_doctors()?
        .into_iter()
        .map(|doctor| (doctor.id, doctor.full_name()))
        .collect();

    let rows: Vec<PatientRow> = patients
        .into_iter()
        .map(|patient| PatientRow {
            doctor_name: patient.doctor_id.and_then(|id| doctor_names.get(&id).cloned()),
            patient,
        })
        .collect();

    Ok(Html(views::patient_list(&rows)))
}

#[axum::debug_handler]
pub async fn booking_form(
    State(state): State<AppState>,
    Path(doctor_id): Path<i64>,
) -> Result<Html<String>, PageError> {
    let conn = state.database.connect()?;
    let doctor = DoctorService::new(&conn).get_doctor(doctor_id)?;

    Ok(Html(views::booking_form(&BookingFormView {
        doctor,
        form: BookingForm::default(),
        error: None,
    })))
}

/// Books the appointment and redirects to the patient list. Bad input or an
/// unknown patient re-renders the form with what was submitted.
#[axum::debug_handler]
pub async fn submit_booking(
    State(state): State<AppState>,
    Path(doctor_id): Path<i64>,
    Form(form): Form<BookingForm>,
) -> Result<Response, PageError> {
    let conn = state.database.connect()?;
    let doctor = DoctorService::new(&conn).get_doctor(doctor_id)?;

    let outcome = form
        .scheduled_at()
        .map_err(AppointmentError::ValidationError)
        .and_then(|scheduled_at| {
            AppointmentBookingService::new(&conn).book_appointment(
                doctor_id,
                BookAppointmentRequest {
                    patient_name: form.patient_name.clone(),
                    reason: form.reason.clone(),
                    scheduled_at,
                },
            )
        });

    let (status, rejection) = match outcome {
        Ok(_) => return Ok(Redirect::to("/patients/").into_response()),
        Err(err @ AppointmentError::ValidationError(_)) => (StatusCode::BAD_REQUEST, err),
        Err(err @ AppointmentError::PatientNotFound) => (StatusCode::NOT_FOUND, err),
        Err(other) => return Err(other.into()),
    };

    let message = AppError::from(rejection).message().to_string();
    debug!("Re-rendering booking form for doctor {}: {}", doctor_id, message);

    let view = BookingFormView {
        doctor,
        form,
        error: Some(message),
    };
    Ok((status, Html(views::booking_form(&view))).into_response())
}
