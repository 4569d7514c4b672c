use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use tracing::{debug, info};

use shared_utils::validation::required;

use crate::models::{
    CreatePatientRequest, Patient, PatientDeletion, PatientError, UpdatePatientRequest,
};

const PATIENT_COLUMNS: &str = "id, name, age, gender, admitted_at, discharged_at, doctor_id";

pub struct PatientService<'a> {
    conn: &'a Connection,
}

impl<'a> PatientService<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    pub fn create_patient(&self, request: CreatePatientRequest) -> Result<Patient, PatientError> {
        let name = required("name", &request.name).map_err(PatientError::ValidationError)?;
        let gender = required("gender", &request.gender).map_err(PatientError::ValidationError)?;

        if let Some(doctor_id) = request.doctor_id {
            self.ensure_doctor_exists(doctor_id)?;
        }

        debug!("Admitting patient: {}", name);

        self.conn.execute(
            "INSERT INTO patients (name, age, gender, admitted_at, discharged_at, doctor_id)
             VALUES (?1, ?2, ?3, ?4, NULL, ?5)",
            params![name, request.age, gender, Utc::now(), request.doctor_id],
        )?;

        let patient = self.get_patient(self.conn.last_insert_rowid())?;
        debug!("Patient created with ID: {}", patient.id);
        Ok(patient)
    }

    pub fn get_patient(&self, patient_id: i64) -> Result<Patient, PatientError> {
        self.conn
            .query_row(
                &format!("SELECT {PATIENT_COLUMNS} FROM patients WHERE id = ?1"),
                params![patient_id],
                map_patient,
            )
            .optional()?
            .ok_or(PatientError::NotFound)
    }

    /// Exact, case-sensitive name match. When several patients share the name
    /// the earliest admitted record wins.
    pub fn find_patient_by_name(&self, name: &str) -> Result<Option<Patient>, PatientError> {
        let patient = self
            .conn
            .query_row(
                &format!("SELECT {PATIENT_COLUMNS} FROM patients WHERE name = ?1 ORDER BY id LIMIT 1"),
                params![name],
                map_patient,
            )
            .optional()?;
        Ok(patient)
    }

    /// Every patient in insertion order.
    pub fn list_patients(&self) -> Result<Vec<Patient>, PatientError> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {PATIENT_COLUMNS} FROM patients ORDER BY id"))?;
        let rows = stmt.query_map([], map_patient)?;
        rows.map(|r| r.map_err(PatientError::from)).collect()
    }

    pub fn count_patients(&self) -> Result<i64, PatientError> {
        Ok(self
            .conn
            .query_row("SELECT COUNT(*) FROM patients", [], |row| row.get(0))?)
    }

    pub fn update_patient(
        &self,
        patient_id: i64,
        request: UpdatePatientRequest,
    ) -> Result<Patient, PatientError> {
        debug!("Updating patient: {}", patient_id);

        let name = required("name", &request.name).map_err(PatientError::ValidationError)?;
        let gender = required("gender", &request.gender).map_err(PatientError::ValidationError)?;

        if let Some(doctor_id) = request.doctor_id {
            self.ensure_doctor_exists(doctor_id)?;
        }

        let updated = self.conn.execute(
            "UPDATE patients SET name = ?1, age = ?2, gender = ?3, doctor_id = ?4, discharged_at = ?5
             WHERE id = ?6",
            params![name, request.age, gender, request.doctor_id, request.discharged_at, patient_id],
        )?;

        if updated == 0 {
            return Err(PatientError::NotFound);
        }

        self.get_patient(patient_id)
    }

    /// Records a discharge at `at`, or now.
    pub fn discharge_patient(
        &self,
        patient_id: i64,
        at: Option<DateTime<Utc>>,
    ) -> Result<Patient, PatientError> {
        let discharged_at = at.unwrap_or_else(Utc::now);

        let updated = self.conn.execute(
            "UPDATE patients SET discharged_at = ?1 WHERE id = ?2",
            params![discharged_at, patient_id],
        )?;

        if updated == 0 {
            return Err(PatientError::NotFound);
        }

        info!("Patient {} discharged at {}", patient_id, discharged_at);
        self.get_patient(patient_id)
    }

    /// Deletes the patient together with every appointment referencing it.
    pub fn delete_patient(&self, patient_id: i64) -> Result<PatientDeletion, PatientError> {
        let tx = self.conn.unchecked_transaction()?;

        let appointments_removed = tx.execute(
            "DELETE FROM appointments WHERE patient_id = ?1",
            params![patient_id],
        )?;
        let deleted = tx.execute("DELETE FROM patients WHERE id = ?1", params![patient_id])?;

        if deleted == 0 {
            return Err(PatientError::NotFound);
        }

        tx.commit()?;

        info!("Deleted patient {} ({} appointments removed)", patient_id, appointments_removed);

        Ok(PatientDeletion {
            patient_id,
            appointments_removed,
        })
    }

    fn ensure_doctor_exists(&self, doctor_id: i64) -> Result<(), PatientError> {
        let exists: bool = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM doctors WHERE id = ?1)",
            params![doctor_id],
            |row| row.get(0),
        )?;

        if exists {
            Ok(())
        } else {
            Err(PatientError::DoctorNotFound(doctor_id))
        }
    }
}

fn map_patient(row: &Row<'_>) -> rusqlite::Result<Patient> {
    Ok(Patient {
        id: row.get(0)?,
        name: row.get(1)?,
        age: row.get(2)?,
        gender: row.get(3)?,
        admitted_at: row.get(4)?,
        discharged_at: row.get(5)?,
        doctor_id: row.get(6)?,
    })
}
