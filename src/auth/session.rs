use actix_session::Session;
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::models::role::Role;

/// The authenticated requester, as stored in the cookie session at login.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CurrentUser {
    pub user_id: i64,
    pub username: String,
    /// Raw stored role value; may be a legacy alias.
    pub role: String,
    pub is_superuser: bool,
    pub groups: Vec<String>,
    /// Profile county, only meaningful for field officers.
    pub county: Option<String>,
}

impl CurrentUser {
    pub fn role(&self) -> Option<Role> {
        Role::parse(&self.role)
    }

    pub fn role_label(&self) -> &'static str {
        self.role().map(Role::label).unwrap_or("Member")
    }
}

pub fn get_user_id(session: &Session) -> Option<i64> {
    session.get::<i64>("user_id").unwrap_or(None)
}

/// Load the current user from the session, if logged in.
pub fn current_user(session: &Session) -> Option<CurrentUser> {
    let user_id = get_user_id(session)?;
    let text = |key: &str| session.get::<String>(key).unwrap_or(None).unwrap_or_default();
    let groups = text("groups")
        .split(',')
        .map(str::trim)
        .filter(|g| !g.is_empty())
        .map(String::from)
        .collect();
    let county = Some(text("county")).filter(|c| !c.trim().is_empty());
    Some(CurrentUser {
        user_id,
        username: text("username"),
        role: text("role"),
        is_superuser: session.get::<bool>("is_superuser").unwrap_or(None).unwrap_or(false),
        groups,
        county,
    })
}

/// Write the identity into the session after a successful login.
pub fn establish(session: &Session, user: &CurrentUser) -> Result<(), AppError> {
    session.renew();
    put(session, "user_id", user.user_id)?;
    put(session, "username", &user.username)?;
    put(session, "role", &user.role)?;
    put(session, "is_superuser", user.is_superuser)?;
    put(session, "groups", user.groups.join(","))?;
    put(session, "county", user.county.as_deref().unwrap_or_default())?;
    Ok(())
}

fn put<T: Serialize>(session: &Session, key: &str, value: T) -> Result<(), AppError> {
    session
        .insert(key, value)
        .map_err(|e| AppError::Session(format!("Failed to store {key}: {e}")))
}
