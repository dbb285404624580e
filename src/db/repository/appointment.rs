use std::str::FromStr;

use rusqlite::{params, Connection};
use uuid::Uuid;

use crate::db::repository::{
    parse_stored_date, parse_stored_time, parse_stored_timestamp, parse_stored_uuid,
};
use crate::db::DatabaseError;
use crate::models::{Appointment, AppointmentStatus};

const SELECT_COLUMNS: &str =
    "id, patient_id, doctor_id, date, time, reason, status, created_at";

pub fn insert_appointment(conn: &Connection, appt: &Appointment) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO appointments (id, patient_id, doctor_id, date, time, reason, status, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            appt.id.to_string(),
            appt.patient_id,
            appt.doctor_id,
            appt.date.to_string(),
            appt.time.format("%H:%M").to_string(),
            appt.reason,
            appt.status.as_str(),
            appt.created_at.to_rfc3339(),
        ],
    )?;
    Ok(())
}

pub fn get_appointment(conn: &Connection, id: &Uuid) -> Result<Appointment, DatabaseError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {SELECT_COLUMNS} FROM appointments WHERE id = ?1"
    ))?;

    let result = stmt.query_row(params![id.to_string()], |row| appointment_raw_row(row));

    match result {
        Ok(raw) => appointment_from_row(raw),
        Err(rusqlite::Error::QueryReturnedNoRows) => Err(DatabaseError::NotFound {
            entity_type: "Appointment".into(),
            id: id.to_string(),
        }),
        Err(e) => Err(e.into()),
    }
}

/// Set the status of an existing appointment. The caller decides whether
/// the transition is legal; this only writes it.
pub fn update_appointment_status(
    conn: &Connection,
    id: &Uuid,
    status: AppointmentStatus,
) -> Result<(), DatabaseError> {
    let changed = conn.execute(
        "UPDATE appointments SET status = ?1 WHERE id = ?2",
        params![status.as_str(), id.to_string()],
    )?;
    if changed == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "Appointment".into(),
            id: id.to_string(),
        });
    }
    Ok(())
}

pub fn delete_appointment(conn: &Connection, id: &Uuid) -> Result<(), DatabaseError> {
    let changed = conn.execute(
        "DELETE FROM appointments WHERE id = ?1",
        params![id.to_string()],
    )?;
    if changed == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "Appointment".into(),
            id: id.to_string(),
        });
    }
    Ok(())
}

/// Appointments owned by a patient, chronological. `date` and `time` are
/// fixed-width text, so the index order is the chronological order.
pub fn list_appointments_by_patient(
    conn: &Connection,
    patient_id: &str,
    limit: usize,
) -> Result<Vec<Appointment>, DatabaseError> {
    list_appointments_by(conn, "patient_id", patient_id, limit)
}

/// Appointments assigned to a doctor, chronological.
pub fn list_appointments_by_doctor(
    conn: &Connection,
    doctor_id: &str,
    limit: usize,
) -> Result<Vec<Appointment>, DatabaseError> {
    list_appointments_by(conn, "doctor_id", doctor_id, limit)
}

fn list_appointments_by(
    conn: &Connection,
    column: &str,
    value: &str,
    limit: usize,
) -> Result<Vec<Appointment>, DatabaseError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {SELECT_COLUMNS} FROM appointments
         WHERE {column} = ?1 ORDER BY date ASC, time ASC LIMIT ?2"
    ))?;

    let rows = stmt.query_map(params![value, limit as i64], |row| appointment_raw_row(row))?;

    let mut appts = Vec::new();
    for row in rows {
        appts.push(appointment_from_row(row?)?);
    }
    Ok(appts)
}

type AppointmentRow = (
    String,
    String,
    String,
    String,
    String,
    Option<String>,
    String,
    String,
);

fn appointment_raw_row(row: &rusqlite::Row<'_>) -> Result<AppointmentRow, rusqlite::Error> {
    Ok((
        row.get(0)?,
        row.get(1)?,
        row.get(2)?,
        row.get(3)?,
        row.get(4)?,
        row.get(5)?,
        row.get(6)?,
        row.get(7)?,
    ))
}

fn appointment_from_row(
    (id, patient_id, doctor_id, date, time, reason, status, created_at): AppointmentRow,
) -> Result<Appointment, DatabaseError> {
    Ok(Appointment {
        id: parse_stored_uuid("appointments.id", &id)?,
        date: parse_stored_date("appointments.date", &date)?,
        time: parse_stored_time("appointments.time", &time)?,
        status: AppointmentStatus::from_str(&status)?,
        created_at: parse_stored_timestamp("appointments.created_at", &created_at)?,
        patient_id,
        doctor_id,
        reason,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::sqlite::open_memory_database;
    use chrono::{NaiveDate, NaiveTime, Utc};

    fn sample(patient: &str, doctor: &str, date: &str, time: &str) -> Appointment {
        Appointment {
            id: Uuid::new_v4(),
            patient_id: patient.into(),
            doctor_id: doctor.into(),
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            time: NaiveTime::parse_from_str(time, "%H:%M").unwrap(),
            reason: None,
            status: AppointmentStatus::Scheduled,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn insert_and_get_round_trip() {
        let conn = open_memory_database().unwrap();
        let mut appt = sample("alice", "drbob", "2024-06-01", "10:00");
        appt.reason = Some("checkup".into());
        insert_appointment(&conn, &appt).unwrap();

        let stored = get_appointment(&conn, &appt.id).unwrap();
        assert_eq!(stored.patient_id, "alice");
        assert_eq!(stored.doctor_id, "drbob");
        assert_eq!(stored.date.to_string(), "2024-06-01");
        assert_eq!(stored.time.format("%H:%M").to_string(), "10:00");
        assert_eq!(stored.reason.as_deref(), Some("checkup"));
        assert_eq!(stored.status, AppointmentStatus::Scheduled);
    }

    #[test]
    fn get_missing_appointment_is_not_found() {
        let conn = open_memory_database().unwrap();
        let missing = Uuid::new_v4();
        match get_appointment(&conn, &missing) {
            Err(DatabaseError::NotFound { entity_type, .. }) => {
                assert_eq!(entity_type, "Appointment");
            }
            other => panic!("Expected NotFound, got: {other:?}"),
        }
    }

    #[test]
    fn update_status_writes_through() {
        let conn = open_memory_database().unwrap();
        let appt = sample("alice", "drbob", "2024-06-01", "10:00");
        insert_appointment(&conn, &appt).unwrap();

        update_appointment_status(&conn, &appt.id, AppointmentStatus::Cancelled).unwrap();
        let stored = get_appointment(&conn, &appt.id).unwrap();
        assert_eq!(stored.status, AppointmentStatus::Cancelled);
    }

    #[test]
    fn update_status_missing_is_not_found() {
        let conn = open_memory_database().unwrap();
        let missing = Uuid::new_v4();
        assert!(matches!(
            update_appointment_status(&conn, &missing, AppointmentStatus::Completed),
            Err(DatabaseError::NotFound { .. })
        ));
    }

    #[test]
    fn list_by_patient_sorts_by_date_then_time() {
        let conn = open_memory_database().unwrap();
        // Inserted out of order on purpose
        insert_appointment(&conn, &sample("alice", "drbob", "2024-05-03", "09:00")).unwrap();
        insert_appointment(&conn, &sample("alice", "drlee", "2024-05-01", "14:00")).unwrap();
        insert_appointment(&conn, &sample("alice", "drbob", "2024-05-02", "08:00")).unwrap();
        insert_appointment(&conn, &sample("carol", "drbob", "2024-01-01", "07:00")).unwrap();

        let listed = list_appointments_by_patient(&conn, "alice", 100).unwrap();
        let order: Vec<String> = listed.iter().map(|a| a.date.to_string()).collect();
        assert_eq!(order, ["2024-05-01", "2024-05-02", "2024-05-03"]);
    }

    #[test]
    fn same_day_sorts_by_time() {
        let conn = open_memory_database().unwrap();
        insert_appointment(&conn, &sample("alice", "drbob", "2024-05-01", "15:30")).unwrap();
        insert_appointment(&conn, &sample("alice", "drbob", "2024-05-01", "08:05")).unwrap();
        insert_appointment(&conn, &sample("alice", "drbob", "2024-05-01", "11:00")).unwrap();

        let listed = list_appointments_by_patient(&conn, "alice", 100).unwrap();
        let times: Vec<String> = listed
            .iter()
            .map(|a| a.time.format("%H:%M").to_string())
            .collect();
        assert_eq!(times, ["08:05", "11:00", "15:30"]);
    }

    #[test]
    fn list_by_doctor_filters_on_doctor_id() {
        let conn = open_memory_database().unwrap();
        insert_appointment(&conn, &sample("alice", "drbob", "2024-05-01", "10:00")).unwrap();
        insert_appointment(&conn, &sample("carol", "drbob", "2024-05-02", "10:00")).unwrap();
        insert_appointment(&conn, &sample("alice", "drlee", "2024-05-03", "10:00")).unwrap();

        let listed = list_appointments_by_doctor(&conn, "drbob", 100).unwrap();
        assert_eq!(listed.len(), 2);
        assert!(listed.iter().all(|a| a.doctor_id == "drbob"));
    }

    #[test]
    fn list_respects_limit() {
        let conn = open_memory_database().unwrap();
        for day in 1..=5 {
            let date = format!("2024-05-0{day}");
            insert_appointment(&conn, &sample("alice", "drbob", &date, "10:00")).unwrap();
        }
        let listed = list_appointments_by_patient(&conn, "alice", 3).unwrap();
        assert_eq!(listed.len(), 3);
        assert_eq!(listed[0].date.to_string(), "2024-05-01");
    }

    #[test]
    fn delete_removes_row() {
        let conn = open_memory_database().unwrap();
        let appt = sample("alice", "drbob", "2024-06-01", "10:00");
        insert_appointment(&conn, &appt).unwrap();

        delete_appointment(&conn, &appt.id).unwrap();
        assert!(matches!(
            get_appointment(&conn, &appt.id),
            Err(DatabaseError::NotFound { .. })
        ));
    }
}
