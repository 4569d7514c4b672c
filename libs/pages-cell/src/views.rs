//! HTML rendering over plain data. Every interpolated value goes through
//! [`escape`].

use chrono::{DateTime, Utc};

use doctor_cell::models::Doctor;

use crate::models::{BookingFormView, PatientRow};

pub fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn timestamp(at: &DateTime<Utc>) -> String {
    at.format("%Y-%m-%d %H:%M").to_string()
}

fn layout(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{title} | Hospital</title>
</head>
<body>
<nav><a href="/">Home</a> | <a href="/doctors/">Doctors</a> | <a href="/patients/">Patients</a></nav>
<main>
<h1>{title}</h1>
{body}
</main>
</body>
</html>
"#,
        title = escape(title),
        body = body,
    )
}

pub fn home() -> String {
    layout(
        "Hospital Management",
        r#"<ul>
<li><a href="/doctors/">View doctors</a></li>
<li><a href="/patients/">View patients</a></li>
</ul>"#,
    )
}

pub fn doctor_list(doctors: &[Doctor]) -> String {
    if doctors.is_empty() {
        return layout("Doctors", "<p>No doctors registered.</p>");
    }

    let rows: String = doctors
        .iter()
        .map(|doctor| {
            format!(
                "<tr><td>{}</td><td>{}</td><td>{}</td><td><a href=\"/book-appointment/{}/\">Book appointment</a></td></tr>\n",
                escape(&doctor.full_name()),
                escape(&doctor.specialization),
                escape(&doctor.phone),
                doctor.id,
            )
        })
        .collect();

    layout(
        "Doctors",
        &format!(
            "<table>\n<tr><th>Name</th><th>Specialization</th><th>Phone</th><th></th></tr>\n{rows}</table>"
        ),
    )
}

pub fn patient_list(patients: &[PatientRow]) -> String {
    if patients.is_empty() {
        return layout("Patients", "<p>No patients admitted.</p>");
    }

    let rows: String = patients
        .iter()
        .map(|row| {
            let patient = &row.patient;
            format!(
                "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>\n",
                escape(&patient.name),
                patient.age,
                escape(&patient.gender),
                row.doctor_name.as_deref().map(escape).unwrap_or_else(|| "-".to_string()),
                timestamp(&patient.admitted_at),
                patient.discharged_at.as_ref().map(timestamp).unwrap_or_else(|| "-".to_string()),
            )
        })
        .collect();

    layout(
        "Patients",
        &format!(
            "<table>\n<tr><th>Name</th><th>Age</th><th>Gender</th><th>Doctor</th><th>Admitted</th><th>Discharged</th></tr>\n{rows}</table>"
        ),
    )
}

pub fn booking_form(view: &BookingFormView) -> String {
    let doctor = &view.doctor;
    let error = view
        .error
        .as_deref()
        .map(|message| format!("<p class=\"error\">{}</p>\n", escape(message)))
        .unwrap_or_default();

    layout(
        &format!("Book appointment with Dr. {}", doctor.full_name()),
        &format!(
            r#"<p>{specialization}</p>
{error}<form method="post" action="/book-appointment/{id}/">
<label>Patient name <input type="text" name="patient_name" value="{patient_name}" required></label>
<label>Reason <textarea name="reason" required>{reason}</textarea></label>
<label>Date <input type="datetime-local" name="scheduled_at" value="{scheduled_at}"></label>
<button type="submit">Book</button>
</form>"#,
            specialization = escape(&doctor.specialization),
            error = error,
            id = doctor.id,
            patient_name = escape(&view.form.patient_name),
            reason = escape(&view.form.reason),
            scheduled_at = escape(&view.form.scheduled_at),
        ),
    )
}

pub fn error_page(title: &str, message: &str) -> String {
    layout(
        title,
        &format!("<p>{}</p>\n<p><a href=\"/\">Back to home</a></p>", escape(message)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::BookingForm;

    fn doctor() -> Doctor {
        Doctor {
            id: 7,
            first_name: "John".to_string(),
            last_name: "<Smith>".to_string(),
            specialization: "Cardiology".to_string(),
            phone: "555-0100".to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn escapes_markup() {
        assert_eq!(escape(r#"<a href="x">&'"#), "&lt;a href=&quot;x&quot;&gt;&amp;&#39;");
    }

    #[test]
    fn doctor_list_links_to_booking() {
        let html = doctor_list(&[doctor()]);
        assert!(html.contains("/book-appointment/7/"));
        assert!(html.contains("John &lt;Smith&gt;"));
        assert!(!html.contains("<Smith>"));
    }

    #[test]
    fn booking_form_keeps_input_and_error() {
        let html = booking_form(&BookingFormView {
            doctor: doctor(),
            form: BookingForm {
                patient_name: "Bob".to_string(),
                reason: "Checkup".to_string(),
                scheduled_at: String::new(),
            },
            error: Some("Patient not found".to_string()),
        });

        assert!(html.contains(r#"value="Bob""#));
        assert!(html.contains(">Checkup</textarea>"));
        assert!(html.contains("Patient not found"));
    }

    #[test]
    fn home_links_to_listings() {
        let html = home();
        assert!(html.contains(r#"href="/doctors/""#));
        assert!(html.contains(r#"href="/patients/""#));
    }
}
