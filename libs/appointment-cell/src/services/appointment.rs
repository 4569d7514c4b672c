use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use tracing::{debug, info};

use doctor_cell::services::DoctorService;
use patient_cell::services::PatientService;
use shared_utils::validation::required;

use crate::models::{Appointment, AppointmentError, UpdateAppointmentRequest};

const APPOINTMENT_COLUMNS: &str = "id, patient_id, doctor_id, scheduled_at, reason, created_at";

/// Reads and maintenance of stored appointments. New appointments only come
/// from [`crate::services::AppointmentBookingService`].
pub struct AppointmentService<'a> {
    conn: &'a Connection,
}

impl<'a> AppointmentService<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    pub(crate) fn insert(
        &self,
        patient_id: i64,
        doctor_id: i64,
        scheduled_at: DateTime<Utc>,
        reason: &str,
    ) -> Result<Appointment, AppointmentError> {
        self.conn.execute(
            "INSERT INTO appointments (patient_id, doctor_id, scheduled_at, reason, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![patient_id, doctor_id, scheduled_at, reason, Utc::now()],
        )?;

        self.get_appointment(self.conn.last_insert_rowid())
    }

    pub fn get_appointment(&self, appointment_id: i64) -> Result<Appointment, AppointmentError> {
        self.conn
            .query_row(
                &format!("SELECT {APPOINTMENT_COLUMNS} FROM appointments WHERE id = ?1"),
                params![appointment_id],
                map_appointment,
            )
            .optional()?
            .ok_or(AppointmentError::NotFound)
    }

    pub fn list_appointments(&self) -> Result<Vec<Appointment>, AppointmentError> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {APPOINTMENT_COLUMNS} FROM appointments ORDER BY id"))?;
        let rows = stmt.query_map([], map_appointment)?;
        rows.map(|r| r.map_err(AppointmentError::from)).collect()
    }

    pub fn count_appointments(&self) -> Result<i64, AppointmentError> {
        Ok(self
            .conn
            .query_row("SELECT COUNT(*) FROM appointments", [], |row| row.get(0))?)
    }

    pub fn update_appointment(
        &self,
        appointment_id: i64,
        request: UpdateAppointmentRequest,
    ) -> Result<Appointment, AppointmentError> {
        debug!("Updating appointment: {}", appointment_id);

        let mut appointment = self.get_appointment(appointment_id)?;

        if let Some(patient_id) = request.patient_id {
            PatientService::new(self.conn).get_patient(patient_id)?;
            appointment.patient_id = patient_id;
        }
        if let Some(doctor_id) = request.doctor_id {
            DoctorService::new(self.conn).get_doctor(doctor_id)?;
            appointment.doctor_id = doctor_id;
        }
        if let Some(scheduled_at) = request.scheduled_at {
            appointment.scheduled_at = scheduled_at;
        }
        if let Some(reason) = request.reason {
            appointment.reason = required("reason", &reason)
                .map_err(AppointmentError::ValidationError)?
                .to_string();
        }

        self.conn.execute(
            "UPDATE appointments SET patient_id = ?1, doctor_id = ?2, scheduled_at = ?3, reason = ?4
             WHERE id = ?5",
            params![
                appointment.patient_id,
                appointment.doctor_id,
                appointment.scheduled_at,
                appointment.reason,
                appointment_id
            ],
        )?;

        Ok(appointment)
    }

    pub fn delete_appointment(&self, appointment_id: i64) -> Result<(), AppointmentError> {
        let deleted = self.conn.execute(
            "DELETE FROM appointments WHERE id = ?1",
            params![appointment_id],
        )?;

        if deleted == 0 {
            return Err(AppointmentError::NotFound);
        }

        info!("Deleted appointment {}", appointment_id);
        Ok(())
    }
}

fn map_appointment(row: &Row<'_>) -> rusqlite::Result<Appointment> {
    Ok(Appointment {
        id: row.get(0)?,
        patient_id: row.get(1)?,
        doctor_id: row.get(2)?,
        scheduled_at: row.get(3)?,
        reason: row.get(4)?,
        created_at: row.get(5)?,
    })
}
