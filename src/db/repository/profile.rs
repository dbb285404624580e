use std::str::FromStr;

use rusqlite::{params, Connection};

use crate::db::repository::parse_stored_timestamp;
use crate::db::DatabaseError;
use crate::models::{Role, UserProfile};

/// Insert a profile, or update name and role if the identity already
/// has one. `created_at` keeps its original value on update.
pub fn upsert_profile(conn: &Connection, profile: &UserProfile) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO user_profiles (id, name, role, created_at)
         VALUES (?1, ?2, ?3, ?4)
         ON CONFLICT(id) DO UPDATE SET name = excluded.name, role = excluded.role",
        params![
            profile.id,
            profile.name,
            profile.role.as_str(),
            profile.created_at.to_rfc3339(),
        ],
    )?;
    Ok(())
}

pub fn get_profile(conn: &Connection, id: &str) -> Result<UserProfile, DatabaseError> {
    find_profile(conn, id)?.ok_or_else(|| DatabaseError::NotFound {
        entity_type: "UserProfile".into(),
        id: id.into(),
    })
}

pub fn find_profile(conn: &Connection, id: &str) -> Result<Option<UserProfile>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, name, role, created_at FROM user_profiles WHERE id = ?1",
    )?;

    let result = stmt.query_row(params![id], |row| {
        Ok((
            row.get::<_, String>(0)?,
            row.get::<_, String>(1)?,
            row.get::<_, String>(2)?,
            row.get::<_, String>(3)?,
        ))
    });

    match result {
        Ok(raw) => Ok(Some(profile_from_row(raw)?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Roster of profiles with the given role, ordered by name.
pub fn list_profiles_by_role(
    conn: &Connection,
    role: Role,
) -> Result<Vec<UserProfile>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, name, role, created_at FROM user_profiles
         WHERE role = ?1 ORDER BY name ASC",
    )?;

    let rows = stmt.query_map(params![role.as_str()], |row| {
        Ok((
            row.get::<_, String>(0)?,
            row.get::<_, String>(1)?,
            row.get::<_, String>(2)?,
            row.get::<_, String>(3)?,
        ))
    })?;

    let mut profiles = Vec::new();
    for row in rows {
        profiles.push(profile_from_row(row?)?);
    }
    Ok(profiles)
}

/// Full roster, used to resolve display names on listing joins.
pub fn list_profiles(conn: &Connection) -> Result<Vec<UserProfile>, DatabaseError> {
    let mut stmt = conn.prepare("SELECT id, name, role, created_at FROM user_profiles")?;

    let rows = stmt.query_map([], |row| {
        Ok((
            row.get::<_, String>(0)?,
            row.get::<_, String>(1)?,
            row.get::<_, String>(2)?,
            row.get::<_, String>(3)?,
        ))
    })?;

    let mut profiles = Vec::new();
    for row in rows {
        profiles.push(profile_from_row(row?)?);
    }
    Ok(profiles)
}

fn profile_from_row(
    (id, name, role, created_at): (String, String, String, String),
) -> Result<UserProfile, DatabaseError> {
    Ok(UserProfile {
        role: Role::from_str(&role)?,
        created_at: parse_stored_timestamp("user_profiles.created_at", &created_at)?,
        id,
        name,
    })
}
