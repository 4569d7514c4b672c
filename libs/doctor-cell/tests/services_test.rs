use assert_matches::assert_matches;
use chrono::{TimeZone, Utc};
use rusqlite::{params, Connection};

use doctor_cell::models::*;
use doctor_cell::services::DoctorService;
use patient_cell::models::Patient;
use patient_cell::services::PatientService;
use shared_utils::test_utils::TestDatabase;

fn smith() -> CreateDoctorRequest {
    CreateDoctorRequest {
        first_name: "John".to_string(),
        last_name: "Smith".to_string(),
        specialization: "Cardiology".to_string(),
        phone: "555-0100".to_string(),
    }
}

fn insert_patient(conn: &Connection, name: &str, doctor_id: Option<i64>) -> i64 {
    conn.execute(
        "INSERT INTO patients (name, age, gender, admitted_at, doctor_id)
         VALUES (?1, 30, 'Female', '2024-01-01T09:00:00Z', ?2)",
        params![name, doctor_id],
    )
    .unwrap();
    conn.last_insert_rowid()
}

fn insert_appointment(conn: &Connection, patient_id: i64, doctor_id: i64) {
    conn.execute(
        "INSERT INTO appointments (patient_id, doctor_id, scheduled_at, reason, created_at)
         VALUES (?1, ?2, '2024-02-01T10:00:00Z', 'Checkup', '2024-01-15T10:00:00Z')",
        params![patient_id, doctor_id],
    )
    .unwrap();
}

#[test]
fn creates_and_fetches_doctor() {
    let db = TestDatabase::new();
    let conn = db.database.connect().unwrap();
    let service = DoctorService::new(&conn);

    let doctor = service.create_doctor(smith()).unwrap();
    assert_eq!(doctor.full_name(), "John Smith");
    assert_eq!(doctor.specialization, "Cardiology");

    let fetched = service.get_doctor(doctor.id).unwrap();
    assert_eq!(fetched, doctor);
}

#[test]
fn rejects_blank_required_fields() {
    let db = TestDatabase::new();
    let conn = db.database.connect().unwrap();

    let mut request = smith();
    request.specialization = "  ".to_string();

    assert_matches!(
        DoctorService::new(&conn).create_doctor(request),
        Err(DoctorError::ValidationError(msg)) if msg.contains("specialization")
    );
    assert_eq!(DoctorService::new(&conn).count_doctors().unwrap(), 0);
}

#[test]
fn missing_doctor_is_not_found() {
    let db = TestDatabase::new();
    let conn = db.database.connect().unwrap();
    let service = DoctorService::new(&conn);

    assert_matches!(service.get_doctor(42), Err(DoctorError::NotFound));
    assert_matches!(service.update_doctor(42, UpdateDoctorRequest::default()), Err(DoctorError::NotFound));
    assert_matches!(service.delete_doctor(42), Err(DoctorError::NotFound));
}

#[test]
fn lists_in_insertion_order() {
    let db = TestDatabase::new();
    let conn = db.database.connect().unwrap();
    let service = DoctorService::new(&conn);

    let first = service.create_doctor(smith()).unwrap();
    let second = service
        .create_doctor(CreateDoctorRequest {
            first_name: "Ada".to_string(),
            last_name: "Jones".to_string(),
            specialization: "Neurology".to_string(),
            phone: "555-0101".to_string(),
        })
        .unwrap();

    let doctors = service.list_doctors().unwrap();
    assert_eq!(doctors.len() as i64, service.count_doctors().unwrap());
    assert_eq!(doctors.iter().map(|d| d.id).collect::<Vec<_>>(), vec![first.id, second.id]);
}

#[test]
fn partial_update_keeps_other_fields() {
    let db = TestDatabase::new();
    let conn = db.database.connect().unwrap();
    let service = DoctorService::new(&conn);

    let doctor = service.create_doctor(smith()).unwrap();
    let updated = service
        .update_doctor(
            doctor.id,
            UpdateDoctorRequest {
                phone: Some("555-0199".to_string()),
                ..Default::default()
            },
        )
        .unwrap();

    assert_eq!(updated.phone, "555-0199");
    assert_eq!(updated.first_name, doctor.first_name);
    assert_eq!(service.get_doctor(doctor.id).unwrap(), updated);
}

#[test]
fn delete_clears_patient_assignment_and_removes_appointments() {
    let db = TestDatabase::new();
    let conn = db.database.connect().unwrap();
    let service = DoctorService::new(&conn);

    let doctor = service.create_doctor(smith()).unwrap();
    let alice = insert_patient(&conn, "Alice", Some(doctor.id));
    insert_appointment(&conn, alice, doctor.id);

    let patients = PatientService::new(&conn);
    let discharged_at = Utc.with_ymd_and_hms(2024, 1, 20, 16, 0, 0).unwrap();
    let before = patients.discharge_patient(alice, Some(discharged_at)).unwrap();
    assert_eq!(before.doctor_id, Some(doctor.id));

    let deletion = service.delete_doctor(doctor.id).unwrap();
    assert_eq!(deletion.patients_unassigned, 1);
    assert_eq!(deletion.appointments_removed, 1);

    let after = patients.get_patient(alice).unwrap();
    assert_eq!(after, Patient { doctor_id: None, ..before });

    let appointments: i64 = conn
        .query_row("SELECT COUNT(*) FROM appointments", [], |row| row.get(0))
        .unwrap();
    assert_eq!(appointments, 0);
    assert_matches!(service.get_doctor(doctor.id), Err(DoctorError::NotFound));
}
