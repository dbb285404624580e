use rusqlite::{params, Connection};
use uuid::Uuid;

use crate::db::repository::{parse_stored_date, parse_stored_timestamp, parse_stored_uuid};
use crate::db::DatabaseError;
use crate::models::MedicalRecord;

const SELECT_COLUMNS: &str =
    "id, appointment_id, patient_id, doctor_id, title, notes, prescription, date, created_at";

/// Insert a medical record. The UNIQUE constraint on `appointment_id`
/// surfaces as `ConstraintViolation` when a record already exists for
/// the appointment.
pub fn insert_record(conn: &Connection, record: &MedicalRecord) -> Result<(), DatabaseError> {
    let result = conn.execute(
        "INSERT INTO medical_records
         (id, appointment_id, patient_id, doctor_id, title, notes, prescription, date, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            record.id.to_string(),
            record.appointment_id.to_string(),
            record.patient_id,
            record.doctor_id,
            record.title,
            record.notes,
            record.prescription,
            record.date.to_string(),
            record.created_at.to_rfc3339(),
        ],
    );

    match result {
        Ok(_) => Ok(()),
        Err(rusqlite::Error::SqliteFailure(e, _))
            if e.code == rusqlite::ErrorCode::ConstraintViolation =>
        {
            Err(DatabaseError::ConstraintViolation(format!(
                "medical record already exists for appointment {}",
                record.appointment_id
            )))
        }
        Err(e) => Err(e.into()),
    }
}

/// The record attached to an appointment, if any (1:1 in practice).
pub fn find_record_by_appointment(
    conn: &Connection,
    appointment_id: &Uuid,
) -> Result<Option<MedicalRecord>, DatabaseError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {SELECT_COLUMNS} FROM medical_records WHERE appointment_id = ?1"
    ))?;

    let result = stmt.query_row(params![appointment_id.to_string()], |row| record_raw_row(row));

    match result {
        Ok(raw) => Ok(Some(record_from_row(raw)?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Records owned by a patient, ordered by appointment date then creation
/// time (both fixed-width text, so the index order is chronological).
pub fn list_records_by_patient(
    conn: &Connection,
    patient_id: &str,
    limit: usize,
) -> Result<Vec<MedicalRecord>, DatabaseError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {SELECT_COLUMNS} FROM medical_records
         WHERE patient_id = ?1 ORDER BY date ASC, created_at ASC LIMIT ?2"
    ))?;

    let rows = stmt.query_map(params![patient_id, limit as i64], |row| record_raw_row(row))?;

    let mut records = Vec::new();
    for row in rows {
        records.push(record_from_row(row?)?);
    }
    Ok(records)
}

type RecordRow = (
    String,
    String,
    String,
    String,
    String,
    String,
    Option<String>,
    String,
    String,
);

fn record_raw_row(row: &rusqlite::Row<'_>) -> Result<RecordRow, rusqlite::Error> {
    Ok((
        row.get(0)?,
        row.get(1)?,
        row.get(2)?,
        row.get(3)?,
        row.get(4)?,
        row.get(5)?,
        row.get(6)?,
        row.get(7)?,
        row.get(8)?,
    ))
}

fn record_from_row(
    (id, appointment_id, patient_id, doctor_id, title, notes, prescription, date, created_at): RecordRow,
) -> Result<MedicalRecord, DatabaseError> {
    Ok(MedicalRecord {
        id: parse_stored_uuid("medical_records.id", &id)?,
        appointment_id: parse_stored_uuid("medical_records.appointment_id", &appointment_id)?,
        date: parse_stored_date("medical_records.date", &date)?,
        created_at: parse_stored_timestamp("medical_records.created_at", &created_at)?,
        patient_id,
        doctor_id,
        title,
        notes,
        prescription,
    })
}
