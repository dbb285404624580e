//! Appointment endpoints: booking, listing, and the lifecycle actions.
//!
//! `complete` pairs the status transition with the record write; the
//! two are sequential, not atomic.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use serde::Serialize;
use uuid::Uuid;

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::identity::Identity;
use crate::models::{Appointment, MedicalRecord};
use crate::store::{self, AppointmentView, BookingRequest, RecordDraft};

#[derive(Serialize)]
pub struct AppointmentsResponse {
    pub appointments: Vec<AppointmentView>,
}

#[derive(Serialize)]
pub struct CompletionResponse {
    pub appointment: Appointment,
    pub record: MedicalRecord,
}

/// `POST /api/appointments` — book as the owning patient.
pub async fn book(
    State(ctx): State<ApiContext>,
    Extension(identity): Extension<Identity>,
    Json(request): Json<BookingRequest>,
) -> Result<Json<Appointment>, ApiError> {
    let conn = ctx.open_db()?;
    let appointment = store::book_appointment(&conn, &identity, request)?;
    Ok(Json(appointment))
}

/// `GET /api/appointments` — the caller's bookings or schedule.
pub async fn list(
    State(ctx): State<ApiContext>,
    Extension(identity): Extension<Identity>,
) -> Result<Json<AppointmentsResponse>, ApiError> {
    let conn = ctx.open_db()?;
    let appointments = store::list_appointments_for_user(&conn, &identity)?;
    Ok(Json(AppointmentsResponse { appointments }))
}

/// `GET /api/appointments/:id`
pub async fn detail(
    State(ctx): State<ApiContext>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<String>,
) -> Result<Json<AppointmentView>, ApiError> {
    let id = parse_id(&id)?;
    let conn = ctx.open_db()?;
    let view = store::get_appointment(&conn, &identity, &id)?;
    Ok(Json(view))
}

/// `POST /api/appointments/:id/cancel` — the owning patient's action.
pub async fn cancel(
    State(ctx): State<ApiContext>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<String>,
) -> Result<Json<Appointment>, ApiError> {
    let id = parse_id(&id)?;
    let conn = ctx.open_db()?;
    let appointment = store::cancel_appointment(&conn, &identity, &id)?;
    Ok(Json(appointment))
}

/// `POST /api/appointments/:id/complete` — doctor action; transitions
/// the appointment and then writes its medical record.
pub async fn complete(
    State(ctx): State<ApiContext>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<String>,
    Json(draft): Json<RecordDraft>,
) -> Result<Json<CompletionResponse>, ApiError> {
    let id = parse_id(&id)?;
    let conn = ctx.open_db()?;

    let appointment = store::complete_appointment(&conn, &identity, &id)?;
    let record = store::create_record(&conn, &identity, &id, draft)?;

    Ok(Json(CompletionResponse {
        appointment,
        record,
    }))
}

/// `DELETE /api/appointments/:id` — owner grant; no documented flow
/// uses it.
pub async fn remove(
    State(ctx): State<ApiContext>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_id(&id)?;
    let conn = ctx.open_db()?;
    store::delete_appointment(&conn, &identity, &id)?;
    Ok(StatusCode::NO_CONTENT)
}

pub(crate) fn parse_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::BadRequest(format!("invalid appointment id: {raw}")))
}
