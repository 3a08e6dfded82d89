use serde::{Deserialize, Serialize};

/// Role carried by the caller's access token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    User,
    Admin,
}

impl Role {
    /// Parses the `userType` claim. Unknown values fall back to [`Role::User`].
    pub fn from_user_type(value: &str) -> Self {
        if value.eq_ignore_ascii_case("admin") {
            Self::Admin
        } else {
            Self::User
        }
    }
}

/// Identity of the authenticated caller for the current request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserContext {
    pub id: i64,
    pub display_name: String,
    pub email: String,
    pub role: Role,
}

impl UserContext {
    pub fn new(id: i64, display_name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id,
            display_name: display_name.into(),
            email: email.into(),
            role: Role::User,
        }
    }

    pub fn with_role(mut self, role: Role) -> Self {
        self.role = role;
        self
    }
}

/// Claims of an access token issued by the user service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessClaims {
    pub id: i64,
    pub email: String,
    pub name: String,
    pub user_type: String,
    /// Expiry as epoch seconds.
    pub exp: i64,
}
