use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension, Row};
use tracing::{debug, info};

use shared_utils::validation::required;

use crate::models::{CreateDoctorRequest, Doctor, DoctorDeletion, DoctorError, UpdateDoctorRequest};

const DOCTOR_COLUMNS: &str = "id, first_name, last_name, specialization, phone, created_at";

pub struct DoctorService<'a> {
    conn: &'a Connection,
}

impl<'a> DoctorService<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    pub fn create_doctor(&self, request: CreateDoctorRequest) -> Result<Doctor, DoctorError> {
        let first_name = required("first_name", &request.first_name).map_err(DoctorError::ValidationError)?;
        let last_name = required("last_name", &request.last_name).map_err(DoctorError::ValidationError)?;
        let specialization =
            required("specialization", &request.specialization).map_err(DoctorError::ValidationError)?;
        let phone = required("phone", &request.phone).map_err(DoctorError::ValidationError)?;

        debug!("Creating doctor {} {}", first_name, last_name);

        self.conn.execute(
            "INSERT INTO doctors (first_name, last_name, specialization, phone, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![first_name, last_name, specialization, phone, Utc::now()],
        )?;

        let doctor = self.get_doctor(self.conn.last_insert_rowid())?;
        debug!("Doctor created with ID: {}", doctor.id);
        Ok(doctor)
    }

    pub fn get_doctor(&self, doctor_id: i64) -> Result<Doctor, DoctorError> {
        self.find_doctor(doctor_id)?.ok_or(DoctorError::NotFound)
    }

    pub fn find_doctor(&self, doctor_id: i64) -> Result<Option<Doctor>, DoctorError> {
        let doctor = self
            .conn
            .query_row(
                &format!("SELECT {DOCTOR_COLUMNS} FROM doctors WHERE id = ?1"),
                params![doctor_id],
                map_doctor,
            )
            .optional()?;
        Ok(doctor)
    }

    /// Every doctor in insertion order.
    pub fn list_doctors(&self) -> Result<Vec<Doctor>, DoctorError> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {DOCTOR_COLUMNS} FROM doctors ORDER BY id"))?;
        let rows = stmt.query_map([], map_doctor)?;
        rows.map(|r| r.map_err(DoctorError::from)).collect()
    }

    pub fn count_doctors(&self) -> Result<i64, DoctorError> {
        Ok(self
            .conn
            .query_row("SELECT COUNT(*) FROM doctors", [], |row| row.get(0))?)
    }

    pub fn update_doctor(
        &self,
        doctor_id: i64,
        request: UpdateDoctorRequest,
    ) -> Result<Doctor, DoctorError> {
        debug!("Updating doctor: {}", doctor_id);

        let mut doctor = self.get_doctor(doctor_id)?;

        if let Some(first_name) = request.first_name {
            doctor.first_name = required("first_name", &first_name)
                .map_err(DoctorError::ValidationError)?
                .to_string();
        }
        if let Some(last_name) = request.last_name {
            doctor.last_name = required("last_name", &last_name)
                .map_err(DoctorError::ValidationError)?
                .to_string();
        }
        if let Some(specialization) = request.specialization {
            doctor.specialization = required("specialization", &specialization)
                .map_err(DoctorError::ValidationError)?
                .to_string();
        }
        if let Some(phone) = request.phone {
            doctor.phone = required("phone", &phone)
                .map_err(DoctorError::ValidationError)?
                .to_string();
        }

        self.conn.execute(
            "UPDATE doctors SET first_name = ?1, last_name = ?2, specialization = ?3, phone = ?4
             WHERE id = ?5",
            params![doctor.first_name, doctor.last_name, doctor.specialization, doctor.phone, doctor_id],
        )?;

        Ok(doctor)
    }

    /// Deletes the doctor. Patients assigned to it keep their record with the
    /// assignment cleared; its appointments are removed.
    pub fn delete_doctor(&self, doctor_id: i64) -> Result<DoctorDeletion, DoctorError> {
        let tx = self.conn.unchecked_transaction()?;

        let patients_unassigned = tx.execute(
            "UPDATE patients SET doctor_id = NULL WHERE doctor_id = ?1",
            params![doctor_id],
        )?;
        let appointments_removed = tx.execute(
            "DELETE FROM appointments WHERE doctor_id = ?1",
            params![doctor_id],
        )?;
        let deleted = tx.execute("DELETE FROM doctors WHERE id = ?1", params![doctor_id])?;

        if deleted == 0 {
            // dropping the transaction rolls back the no-op cleanup
            return Err(DoctorError::NotFound);
        }

        tx.commit()?;

        info!(
            "Deleted doctor {} ({} patients unassigned, {} appointments removed)",
            doctor_id, patients_unassigned, appointments_removed
        );

        Ok(DoctorDeletion {
            doctor_id,
            patients_unassigned,
            appointments_removed,
        })
    }
}

fn map_doctor(row: &Row<'_>) -> rusqlite::Result<Doctor> {
    Ok(Doctor {
        id: row.get(0)?,
        first_name: row.get(1)?,
        last_name: row.get(2)?,
        specialization: row.get(3)?,
        phone: row.get(4)?,
        created_at: row.get(5)?,
    })
}
