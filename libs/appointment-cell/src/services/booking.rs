use chrono::Utc;
use rusqlite::Connection;
use tracing::{info, warn};

use doctor_cell::services::DoctorService;
use patient_cell::services::PatientService;
use shared_utils::validation::required;

use crate::models::{Appointment, AppointmentError, BookAppointmentRequest, BookByIdRequest};
use crate::services::appointment::AppointmentService;

/// The only path that creates appointments.
pub struct AppointmentBookingService<'a> {
    conn: &'a Connection,
}

impl<'a> AppointmentBookingService<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Books `request.patient_name` with doctor `doctor_id`.
    ///
    /// Fields are validated before any lookup, and nothing is written unless
    /// both the doctor and the patient resolve. The patient is found by exact
    /// name; when names collide the earliest admitted patient is booked.
    pub fn book_appointment(
        &self,
        doctor_id: i64,
        request: BookAppointmentRequest,
    ) -> Result<Appointment, AppointmentError> {
        let patient_name =
            required("patient_name", &request.patient_name).map_err(AppointmentError::ValidationError)?;
        let reason = required("reason", &request.reason).map_err(AppointmentError::ValidationError)?;

        let doctor = DoctorService::new(self.conn)
            .find_doctor(doctor_id)?
            .ok_or(AppointmentError::DoctorNotFound)?;

        let patient = match PatientService::new(self.conn).find_patient_by_name(patient_name)? {
            Some(patient) => patient,
            None => {
                warn!("Booking with doctor {} rejected: no patient named {:?}", doctor.id, patient_name);
                return Err(AppointmentError::PatientNotFound);
            }
        };

        let scheduled_at = request.scheduled_at.unwrap_or_else(Utc::now);
        let appointment = AppointmentService::new(self.conn).insert(patient.id, doctor.id, scheduled_at, reason)?;

        info!(
            "Booked appointment {} for patient {} with doctor {} at {}",
            appointment.id, patient.id, doctor.id, appointment.scheduled_at
        );

        Ok(appointment)
    }

    /// Identifier-based booking used by the operator surface.
    pub fn book_for_patient(&self, request: BookByIdRequest) -> Result<Appointment, AppointmentError> {
        let reason = required("reason", &request.reason).map_err(AppointmentError::ValidationError)?;

        DoctorService::new(self.conn).get_doctor(request.doctor_id)?;
        PatientService::new(self.conn).get_patient(request.patient_id)?;

        let scheduled_at = request.scheduled_at.unwrap_or_else(Utc::now);
        let appointment = AppointmentService::new(self.conn).insert(
            request.patient_id,
            request.doctor_id,
            scheduled_at,
            reason,
        )?;

        info!(
            "Booked appointment {} for patient {} with doctor {}",
            appointment.id, request.patient_id, request.doctor_id
        );

        Ok(appointment)
    }
}
