use serde::{Deserialize, Serialize};

/// A corporate account the verified identity belongs to.
///
/// Every field is optional on the wire; the accessors below supply the
/// fallbacks shown in the workspace picker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Organization {
    #[serde(default)]
    pub id: Option<i64>,

    #[serde(default, rename = "organization_name")]
    pub name: Option<String>,

    #[serde(default, rename = "user_role")]
    pub role: Option<String>,

    #[serde(default)]
    pub is_active: Option<bool>,
}

impl Organization {
    pub fn is_admin(&self) -> bool {
        self.role
            .as_deref()
            .is_some_and(|role| role.eq_ignore_ascii_case("admin"))
    }

    pub fn display_name(&self) -> &str {
        match self.name.as_deref() {
            Some(name) if !name.trim().is_empty() => name,
            _ => "Workspace",
        }
    }

    /// Avatar letter: first character of the trimmed name, upper-cased.
    pub fn initial(&self) -> char {
        self.name
            .as_deref()
            .and_then(|name| name.trim().chars().next())
            .map(|c| c.to_uppercase().next().unwrap_or(c))
            .unwrap_or('W')
    }

    pub fn role_label(&self) -> String {
        self.role
            .as_deref()
            .filter(|role| !role.is_empty())
            .unwrap_or("member")
            .to_lowercase()
    }
}

/// Order organizations so that every admin membership comes first.
///
/// The sort is stable: entries within the admin and non-admin groups keep
/// their listing order.
pub fn sort_admin_first(organizations: &mut [Organization]) {
    organizations.sort_by_key(|org| !org.is_admin());
}
