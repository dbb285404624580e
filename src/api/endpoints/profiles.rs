//! Profile endpoints.

use axum::extract::{Path, State};
use axum::{Extension, Json};
use serde::Deserialize;

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::identity::Identity;
use crate::models::{Role, UserProfile};
use crate::store;

#[derive(Deserialize)]
pub struct UpsertProfileRequest {
    pub name: String,
    pub role: Role,
}

/// `POST /api/profiles` — create or update the caller's own profile.
pub async fn upsert(
    State(ctx): State<ApiContext>,
    Extension(identity): Extension<Identity>,
    Json(request): Json<UpsertProfileRequest>,
) -> Result<Json<UserProfile>, ApiError> {
    let conn = ctx.open_db()?;
    let profile = store::upsert_profile(&conn, &identity, &request.name, request.role)?;
    Ok(Json(profile))
}

/// `GET /api/profiles/:id` — self, or any doctor.
pub async fn detail(
    State(ctx): State<ApiContext>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<String>,
) -> Result<Json<UserProfile>, ApiError> {
    let conn = ctx.open_db()?;
    let profile = store::get_profile(&conn, &identity, &id)?;
    Ok(Json(profile))
}
