//! Canonical user roles, legacy aliases, and the role-to-dashboard mapping.
//!
//! Every authorization and redirect decision goes through this module so the
//! alias table lives in exactly one place.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    FieldOfficer,
    Partner,
    ProjectManager,
    Volunteer,
    Beneficiary,
    Guest,
    Community,
}

/// Stored role values that predate the canonical set.
const ALIASES: &[(&str, &str)] = &[
    ("field", "field_officer"),
    ("partner_institution", "partner"),
];

/// Legacy group names and the role each one grants. The first
/// `LANDING_GROUPS` entries also pick a landing page, in this order, when a
/// role gives no answer.
const GROUP_ROLES: &[(&str, Role)] = &[
    ("Admins", Role::Admin),
    ("Field Officers", Role::FieldOfficer),
    ("Partners", Role::Partner),
    ("Project Managers", Role::ProjectManager),
    ("Volunteers", Role::Volunteer),
    ("Guests", Role::Guest),
    ("Community", Role::Community),
];

/// "Community" grants the community view but never picks a landing page.
const LANDING_GROUPS: usize = 6;

/// Resolve a legacy alias to its canonical key. Unknown values pass through.
pub fn normalize(raw: &str) -> &str {
    let raw = raw.trim();
    ALIASES
        .iter()
        .find(|(alias, _)| *alias == raw)
        .map(|(_, canonical)| *canonical)
        .unwrap_or(raw)
}

/// True when two stored role strings name the same role after alias resolution.
pub fn roles_match(a: &str, b: &str) -> bool {
    normalize(a) == normalize(b)
}

impl Role {
    pub const ALL: [Role; 8] = [
        Role::Admin,
        Role::FieldOfficer,
        Role::Partner,
        Role::ProjectManager,
        Role::Volunteer,
        Role::Beneficiary,
        Role::Guest,
        Role::Community,
    ];

    /// Parse a stored role value, resolving aliases first.
    pub fn parse(raw: &str) -> Option<Role> {
        let key = normalize(raw);
        Role::ALL.into_iter().find(|r| r.as_str() == key)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::FieldOfficer => "field_officer",
            Role::Partner => "partner",
            Role::ProjectManager => "project_manager",
            Role::Volunteer => "volunteer",
            Role::Beneficiary => "beneficiary",
            Role::Guest => "guest",
            Role::Community => "community",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Role::Admin => "Admin",
            Role::FieldOfficer => "Field Officer",
            Role::Partner => "Partner Institution",
            Role::ProjectManager => "Project Manager",
            Role::Volunteer => "Volunteer",
            Role::Beneficiary => "Beneficiary Liaison",
            Role::Guest => "Guest User",
            Role::Community => "Community Representative",
        }
    }

    /// Landing page for a user holding this role.
    pub fn dashboard_path(self) -> &'static str {
        match self {
            Role::Admin => "/dashboard/admin",
            Role::FieldOfficer => "/dashboard/field",
            Role::Partner => "/dashboard/partner",
            Role::ProjectManager => "/dashboard/project",
            Role::Volunteer => "/dashboard/volunteer",
            Role::Beneficiary => "/dashboard",
            Role::Guest => "/dashboard/guest",
            Role::Community => "/dashboard/community",
        }
    }

    /// Role equivalent of a legacy group name.
    pub fn from_group(name: &str) -> Option<Role> {
        GROUP_ROLES
            .iter()
            .find(|(group, _)| *group == name)
            .map(|(_, role)| *role)
    }
}

/// Pick the post-login landing page.
///
/// Order: explicit role, superuser flag, legacy groups (fixed precedence),
/// then the generic dashboard.
pub fn landing_path(role: Option<Role>, is_superuser: bool, groups: &[String]) -> &'static str {
    if let Some(role) = role {
        return role.dashboard_path();
    }
    if is_superuser {
        return Role::Admin.dashboard_path();
    }
    GROUP_ROLES[..LANDING_GROUPS]
        .iter()
        .find(|(group, _)| groups.iter().any(|g| g == group))
        .map(|(_, role)| role.dashboard_path())
        .unwrap_or("/dashboard")
}
