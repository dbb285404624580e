//! Roster endpoints, used by booking selectors and display-name joins.

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::models::UserProfile;
use crate::store;

#[derive(Serialize)]
pub struct RosterResponse {
    pub profiles: Vec<UserProfile>,
}

/// `GET /api/doctors`
pub async fn doctors(State(ctx): State<ApiContext>) -> Result<Json<RosterResponse>, ApiError> {
    let conn = ctx.open_db()?;
    let profiles = store::list_doctors(&conn)?;
    Ok(Json(RosterResponse { profiles }))
}

/// `GET /api/patients`
pub async fn patients(State(ctx): State<ApiContext>) -> Result<Json<RosterResponse>, ApiError> {
    let conn = ctx.open_db()?;
    let profiles = store::list_patients(&conn)?;
    Ok(Json(RosterResponse { profiles }))
}
