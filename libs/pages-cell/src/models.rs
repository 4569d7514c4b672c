use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Deserialize;

use doctor_cell::models::Doctor;
use patient_cell::models::Patient;

/// Fields posted by the booking form. Missing fields deserialize as empty so
/// they surface as validation errors on the re-rendered form.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct BookingForm {
    pub patient_name: String,
    pub reason: String,
    pub scheduled_at: String,
}

impl BookingForm {
    /// Blank means "now". Accepts the browser's `datetime-local` format
    /// (read as UTC) or RFC 3339.
    pub fn scheduled_at(&self) -> Result<Option<DateTime<Utc>>, String> {
        let value = self.scheduled_at.trim();
        if value.is_empty() {
            return Ok(None);
        }

        if let Ok(at) = DateTime::parse_from_rfc3339(value) {
            return Ok(Some(at.with_timezone(&Utc)));
        }

        ["%Y-%m-%dT%H:%M", "%Y-%m-%dT%H:%M:%S"]
            .iter()
            .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
            .map(|naive| Some(naive.and_utc()))
            .ok_or_else(|| "scheduled_at must look like YYYY-MM-DDTHH:MM".to_string())
    }
}

/// One line of the patient listing.
#[derive(Debug, Clone)]
pub struct PatientRow {
    pub patient: Patient,
    pub doctor_name: Option<String>,
}

/// Everything the booking form needs to render, including a failed submission.
#[derive(Debug, Clone)]
pub struct BookingFormView {
    pub doctor: Doctor,
    pub form: BookingForm,
    pub error: Option<String>,
}
