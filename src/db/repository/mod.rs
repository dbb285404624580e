pub mod appointment;
pub mod profile;
pub mod record;

pub use appointment::*;
pub use profile::*;
pub use record::*;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use uuid::Uuid;

use super::DatabaseError;

// Stored values are written by this crate, so a parse failure means the
// row was tampered with or the schema drifted; surface it instead of
// defaulting.

pub(crate) fn parse_stored_uuid(field: &str, value: &str) -> Result<Uuid, DatabaseError> {
    Uuid::parse_str(value).map_err(|_| DatabaseError::InvalidStoredValue {
        field: field.into(),
        value: value.into(),
    })
}

pub(crate) fn parse_stored_date(field: &str, value: &str) -> Result<NaiveDate, DatabaseError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| DatabaseError::InvalidStoredValue {
        field: field.into(),
        value: value.into(),
    })
}

pub(crate) fn parse_stored_time(field: &str, value: &str) -> Result<NaiveTime, DatabaseError> {
    NaiveTime::parse_from_str(value, "%H:%M").map_err(|_| DatabaseError::InvalidStoredValue {
        field: field.into(),
        value: value.into(),
    })
}

pub(crate) fn parse_stored_timestamp(
    field: &str,
    value: &str,
) -> Result<DateTime<Utc>, DatabaseError> {
    DateTime::parse_from_rfc3339(value)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|_| DatabaseError::InvalidStoredValue {
            field: field.into(),
            value: value.into(),
        })
}
