use serde::{Deserialize, Serialize};

use crate::auth::session::CurrentUser;
use crate::models::role::roles_match;

/// Internal user row for authentication: includes the password hash.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub password: String,
    pub role: String,
    pub is_superuser: bool,
    /// From the profile; empty when the user has none.
    pub county: String,
}

impl User {
    /// Session identity for this user, given their group names.
    pub fn into_current(self, groups: Vec<String>) -> CurrentUser {
        let county = Some(self.county).filter(|c| !c.trim().is_empty());
        CurrentUser {
            user_id: self.id,
            username: self.username,
            role: self.role,
            is_superuser: self.is_superuser,
            groups,
            county,
        }
    }
}

/// New account data; `password` is already hashed.
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password: String,
    pub role: String,
    pub is_superuser: bool,
    pub county: String,
}

/// Body of `POST /accounts/api/role-check`.
#[derive(Debug, Default, Deserialize)]
pub struct RoleCheckRequest {
    pub username: Option<String>,
    pub role: Option<String>,
}

/// Answer to a role check. `user_role` is the stored value, aliases intact.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoleCheckResponse {
    pub exists: bool,
    pub matches: bool,
    pub user_role: Option<String>,
}

impl RoleCheckResponse {
    pub fn missing() -> Self {
        RoleCheckResponse { exists: false, matches: false, user_role: None }
    }

    /// Compare a stored role with the requested one after alias resolution.
    pub fn for_user(stored_role: &str, requested: Option<&str>) -> Self {
        RoleCheckResponse {
            exists: true,
            matches: requested.is_some_and(|r| roles_match(stored_role, r)),
            user_role: Some(stored_role.to_string()),
        }
    }
}

/// Body of `POST /accounts/api/change-role`.
#[derive(Debug, Deserialize)]
pub struct ChangeRoleRequest {
    pub username: Option<String>,
    pub role: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_check_resolves_aliases() {
        let r = RoleCheckResponse::for_user("field", Some("field_officer"));
        assert!(r.exists && r.matches);
        assert_eq!(r.user_role.as_deref(), Some("field"));
        assert!(!RoleCheckResponse::for_user("volunteer", Some("guest")).matches);
        assert!(!RoleCheckResponse::for_user("volunteer", None).matches);
    }
}
