//! Booking domain service.
//!
//! The one module with behavior: validates inputs at the store boundary,
//! stamps derived fields (id, createdAt, status default), enforces the
//! access policy and the appointment state machine, and shapes query
//! results (filtering, chronological sort, display-name joins against
//! the roster). Every operation takes the caller identity explicitly.
//!
//! Completing an appointment and attaching its record are two separate
//! writes with no transaction between them; the HTTP flow runs them
//! back to back.

use std::collections::HashMap;

use chrono::{NaiveDate, NaiveTime, Utc};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::authorization::{check_access, Entity, Operation};
use crate::db::{self, DatabaseError};
use crate::identity::Identity;
use crate::models::{Appointment, AppointmentStatus, MedicalRecord, Role, UserProfile};

/// Listing queries materialize at most this many rows; no paging.
pub const LIST_CAP: usize = 500;

// ─── Errors ───────────────────────────────────────────────────────────────────

/// Errors from store operations. Each maps to one HTTP status in the
/// API layer; none is fatal to the process.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Validation failed: {0}")]
    Validation(String),
    #[error("Not authorized: {0}")]
    Authorization(String),
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },
    #[error("Invalid transition: {from:?} -> {to:?}")]
    InvalidTransition {
        from: AppointmentStatus,
        to: AppointmentStatus,
    },
    #[error("Database error: {0}")]
    Database(DatabaseError),
}

impl From<DatabaseError> for StoreError {
    fn from(err: DatabaseError) -> Self {
        match err {
            DatabaseError::NotFound { entity_type, id } => Self::NotFound {
                entity: entity_type,
                id,
            },
            other => Self::Database(other),
        }
    }
}

// ─── Requests ─────────────────────────────────────────────────────────────────

/// Booking input. `date` and `time` arrive as text and are validated
/// here, at the store boundary, not by the transport.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingRequest {
    pub patient_id: String,
    pub doctor_id: String,
    /// YYYY-MM-DD
    pub date: String,
    /// HH:MM
    pub time: String,
    #[serde(default)]
    pub reason: Option<String>,
}

/// Record fields captured when a doctor completes an appointment.
#[derive(Debug, Clone, Deserialize)]
pub struct RecordDraft {
    pub title: String,
    pub notes: String,
    #[serde(default)]
    pub prescription: Option<String>,
}

// ─── Views ────────────────────────────────────────────────────────────────────

/// Appointment shaped for display: names resolved against the roster,
/// never stored denormalized.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentView {
    #[serde(flatten)]
    pub appointment: Appointment,
    pub patient_name: Option<String>,
    pub doctor_name: Option<String>,
}

/// Medical record shaped for display.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordView {
    #[serde(flatten)]
    pub record: MedicalRecord,
    pub patient_name: Option<String>,
    pub doctor_name: Option<String>,
}

// ─── Profile operations ───────────────────────────────────────────────────────

/// Create or update the caller's own profile. The profile id is always
/// the caller's identity id.
pub fn upsert_profile(
    conn: &Connection,
    caller: &Identity,
    name: &str,
    role: Role,
) -> Result<UserProfile, StoreError> {
    authorize(caller, Entity::UserProfile, Operation::Create, &caller.id)?;
    let name = require_field(name, "name")?;

    let profile = UserProfile {
        id: caller.id.clone(),
        name,
        role,
        created_at: Utc::now(),
    };
    db::upsert_profile(conn, &profile)?;
    tracing::info!(id = %profile.id, "Profile saved");
    Ok(profile)
}

/// Read a profile: self, or any doctor.
pub fn get_profile(
    conn: &Connection,
    caller: &Identity,
    id: &str,
) -> Result<UserProfile, StoreError> {
    authorize(caller, Entity::UserProfile, Operation::Read, id)?;
    Ok(db::get_profile(conn, id)?)
}

/// Roster of doctor profiles, used for booking selectors and name joins.
pub fn list_doctors(conn: &Connection) -> Result<Vec<UserProfile>, StoreError> {
    Ok(db::list_profiles_by_role(conn, Role::Doctor)?)
}

/// Roster of patient profiles.
pub fn list_patients(conn: &Connection) -> Result<Vec<UserProfile>, StoreError> {
    Ok(db::list_profiles_by_role(conn, Role::Patient)?)
}

// ─── Appointment operations ───────────────────────────────────────────────────

/// Book an appointment. The caller must be the patient named by
/// `patientId`; the row starts Scheduled.
pub fn book_appointment(
    conn: &Connection,
    caller: &Identity,
    request: BookingRequest,
) -> Result<Appointment, StoreError> {
    let patient_id = require_field(&request.patient_id, "patientId")?;
    let doctor_id = require_field(&request.doctor_id, "doctorId")?;
    let date = parse_date_field(&request.date)?;
    let time = parse_time_field(&request.time)?;

    authorize(caller, Entity::Appointment, Operation::Create, &patient_id)?;

    let appointment = Appointment {
        id: Uuid::new_v4(),
        patient_id,
        doctor_id,
        date,
        time,
        reason: optional_text(request.reason),
        status: AppointmentStatus::Scheduled,
        created_at: Utc::now(),
    };
    db::insert_appointment(conn, &appointment)?;

    tracing::info!(
        id = %appointment.id,
        patient = %appointment.patient_id,
        doctor = %appointment.doctor_id,
        "Appointment booked"
    );
    Ok(appointment)
}

/// Read one appointment with display names: the owning patient or any
/// doctor.
pub fn get_appointment(
    conn: &Connection,
    caller: &Identity,
    id: &Uuid,
) -> Result<AppointmentView, StoreError> {
    let appointment = db::get_appointment(conn, id)?;
    authorize(caller, Entity::Appointment, Operation::Read, &appointment.patient_id)?;

    let names = display_names(conn)?;
    Ok(appointment_with_names(appointment, &names))
}

/// Appointments for the caller: patients see their bookings, doctors
/// see their schedule, anyone else sees nothing. Chronological.
pub fn list_appointments_for_user(
    conn: &Connection,
    caller: &Identity,
) -> Result<Vec<AppointmentView>, StoreError> {
    let appointments = if caller.is_patient() {
        db::list_appointments_by_patient(conn, &caller.id, LIST_CAP)?
    } else if caller.is_doctor() {
        db::list_appointments_by_doctor(conn, &caller.id, LIST_CAP)?
    } else {
        Vec::new()
    };

    let names = display_names(conn)?;
    Ok(appointments
        .into_iter()
        .map(|a| appointment_with_names(a, &names))
        .collect())
}

/// Cancel a scheduled appointment. Cancelling is the owning patient's
/// action; re-cancelling a terminal appointment is rejected, not
/// ignored.
pub fn cancel_appointment(
    conn: &Connection,
    caller: &Identity,
    id: &Uuid,
) -> Result<Appointment, StoreError> {
    let appointment = db::get_appointment(conn, id)?;
    if caller.id != appointment.patient_id {
        return Err(StoreError::Authorization(
            "only the booking patient can cancel an appointment".into(),
        ));
    }
    authorize(caller, Entity::Appointment, Operation::Update, &appointment.patient_id)?;

    transition(&appointment, AppointmentStatus::Cancelled)?;
    db::update_appointment_status(conn, id, AppointmentStatus::Cancelled)?;

    tracing::info!(id = %appointment.id, "Appointment cancelled");
    Ok(Appointment {
        status: AppointmentStatus::Cancelled,
        ..appointment
    })
}

/// Complete a scheduled appointment. A doctor-only action; the caller
/// is expected to attach a medical record right after (`create_record`),
/// but the two writes are not atomic.
pub fn complete_appointment(
    conn: &Connection,
    caller: &Identity,
    id: &Uuid,
) -> Result<Appointment, StoreError> {
    let appointment = db::get_appointment(conn, id)?;
    if !caller.is_doctor() {
        return Err(StoreError::Authorization(
            "only a doctor can complete an appointment".into(),
        ));
    }
    authorize(caller, Entity::Appointment, Operation::Update, &appointment.patient_id)?;

    transition(&appointment, AppointmentStatus::Completed)?;
    db::update_appointment_status(conn, id, AppointmentStatus::Completed)?;

    tracing::info!(id = %appointment.id, doctor = %caller.id, "Appointment completed");
    Ok(Appointment {
        status: AppointmentStatus::Completed,
        ..appointment
    })
}

/// Delete an appointment. The owner grant exists and is exposed, but no
/// documented flow uses it.
pub fn delete_appointment(
    conn: &Connection,
    caller: &Identity,
    id: &Uuid,
) -> Result<(), StoreError> {
    let appointment = db::get_appointment(conn, id)?;
    authorize(caller, Entity::Appointment, Operation::Delete, &appointment.patient_id)?;

    db::delete_appointment(conn, id)?;
    tracing::info!(id = %appointment.id, "Appointment deleted");
    Ok(())
}

// ─── Medical record operations ────────────────────────────────────────────────

/// Attach the medical record for an appointment. Doctor-only; the
/// record copies `patient_id`, `doctor_id` and `date` from the source
/// appointment, and the schema allows exactly one record per
/// appointment.
pub fn create_record(
    conn: &Connection,
    caller: &Identity,
    appointment_id: &Uuid,
    draft: RecordDraft,
) -> Result<MedicalRecord, StoreError> {
    let appointment = db::get_appointment(conn, appointment_id)?;
    authorize(caller, Entity::MedicalRecord, Operation::Create, &appointment.patient_id)?;

    let title = require_field(&draft.title, "title")?;
    let notes = require_field(&draft.notes, "notes")?;

    let record = MedicalRecord {
        id: Uuid::new_v4(),
        appointment_id: appointment.id,
        patient_id: appointment.patient_id,
        doctor_id: appointment.doctor_id,
        title,
        notes,
        prescription: optional_text(draft.prescription),
        date: appointment.date,
        created_at: Utc::now(),
    };

    match db::insert_record(conn, &record) {
        Ok(()) => {
            tracing::info!(id = %record.id, appointment = %record.appointment_id, "Record created");
            Ok(record)
        }
        Err(DatabaseError::ConstraintViolation(msg)) => Err(StoreError::Validation(msg)),
        Err(e) => Err(e.into()),
    }
}

/// Records for a patient, chronological: the patient themselves or any
/// doctor.
pub fn list_records_for_patient(
    conn: &Connection,
    caller: &Identity,
    patient_id: &str,
) -> Result<Vec<RecordView>, StoreError> {
    authorize(caller, Entity::MedicalRecord, Operation::Read, patient_id)?;

    let records = db::list_records_by_patient(conn, patient_id, LIST_CAP)?;
    let names = display_names(conn)?;
    Ok(records
        .into_iter()
        .map(|r| record_with_names(r, &names))
        .collect())
}

/// The record attached to one appointment.
pub fn get_record_for_appointment(
    conn: &Connection,
    caller: &Identity,
    appointment_id: &Uuid,
) -> Result<RecordView, StoreError> {
    let record = db::find_record_by_appointment(conn, appointment_id)?.ok_or_else(|| {
        StoreError::NotFound {
            entity: "MedicalRecord".into(),
            id: appointment_id.to_string(),
        }
    })?;
    authorize(caller, Entity::MedicalRecord, Operation::Read, &record.patient_id)?;

    let names = display_names(conn)?;
    Ok(record_with_names(record, &names))
}

// ─── Helpers ──────────────────────────────────────────────────────────────────

fn authorize(
    caller: &Identity,
    entity: Entity,
    op: Operation,
    owner_id: &str,
) -> Result<(), StoreError> {
    let decision = check_access(caller, entity, op, owner_id);
    if decision.allowed {
        Ok(())
    } else {
        Err(StoreError::Authorization(format!(
            "{op:?} on {entity:?} denied for {}",
            caller.id
        )))
    }
}

fn transition(appointment: &Appointment, to: AppointmentStatus) -> Result<(), StoreError> {
    // Scheduled is the only state with outgoing edges.
    if appointment.status != AppointmentStatus::Scheduled {
        return Err(StoreError::InvalidTransition {
            from: appointment.status,
            to,
        });
    }
    Ok(())
}

fn require_field(value: &str, field: &str) -> Result<String, StoreError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(StoreError::Validation(format!("{field} is required")));
    }
    Ok(trimmed.to_string())
}

fn parse_date_field(value: &str) -> Result<NaiveDate, StoreError> {
    let value = require_field(value, "date")?;
    NaiveDate::parse_from_str(&value, "%Y-%m-%d")
        .map_err(|_| StoreError::Validation(format!("date must be YYYY-MM-DD, got {value}")))
}

fn parse_time_field(value: &str) -> Result<NaiveTime, StoreError> {
    let value = require_field(value, "time")?;
    NaiveTime::parse_from_str(&value, "%H:%M")
        .map_err(|_| StoreError::Validation(format!("time must be HH:MM, got {value}")))
}

fn optional_text(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn display_names(conn: &Connection) -> Result<HashMap<String, String>, StoreError> {
    Ok(db::list_profiles(conn)?
        .into_iter()
        .map(|p| (p.id, p.name))
        .collect())
}

fn appointment_with_names(
    appointment: Appointment,
    names: &HashMap<String, String>,
) -> AppointmentView {
    AppointmentView {
        patient_name: names.get(&appointment.patient_id).cloned(),
        doctor_name: names.get(&appointment.doctor_id).cloned(),
        appointment,
    }
}

fn record_with_names(record: MedicalRecord, names: &HashMap<String, String>) -> RecordView {
    RecordView {
        patient_name: names.get(&record.patient_id).cloned(),
        doctor_name: names.get(&record.doctor_id).cloned(),
        record,
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────────
