//! Medical record endpoints.

use axum::extract::{Path, Query, State};
use axum::{Extension, Json};
use serde::{Deserialize, Serialize};

use crate::api::endpoints::appointments::parse_id;
use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::identity::Identity;
use crate::store::{self, RecordView};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordsQuery {
    /// Doctors may list another patient's records; defaults to the
    /// caller's own id.
    pub patient_id: Option<String>,
}

#[derive(Serialize)]
pub struct RecordsResponse {
    pub records: Vec<RecordView>,
}

/// `GET /api/records?patientId=` — a patient's records, chronological.
pub async fn list(
    State(ctx): State<ApiContext>,
    Extension(identity): Extension<Identity>,
    Query(query): Query<RecordsQuery>,
) -> Result<Json<RecordsResponse>, ApiError> {
    let patient_id = query.patient_id.unwrap_or_else(|| identity.id.clone());
    let conn = ctx.open_db()?;
    let records = store::list_records_for_patient(&conn, &identity, &patient_id)?;
    Ok(Json(RecordsResponse { records }))
}

/// `GET /api/records/by-appointment/:id` — the record attached to one
/// appointment.
pub async fn by_appointment(
    State(ctx): State<ApiContext>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<String>,
) -> Result<Json<RecordView>, ApiError> {
    let id = parse_id(&id)?;
    let conn = ctx.open_db()?;
    let record = store::get_record_for_appointment(&conn, &identity, &id)?;
    Ok(Json(record))
}
