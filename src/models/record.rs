use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Clinical note attached by a doctor when completing an appointment.
///
/// `appointment_id` references exactly one appointment (UNIQUE in the
/// schema); `patient_id`, `doctor_id` and `date` are copied from the
/// source appointment at creation. Immutable afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MedicalRecord {
    pub id: Uuid,
    pub appointment_id: Uuid,
    pub patient_id: String,
    pub doctor_id: String,
    pub title: String,
    pub notes: String,
    pub prescription: Option<String>,
    pub date: NaiveDate,
    pub created_at: DateTime<Utc>,
}
