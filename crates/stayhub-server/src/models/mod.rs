use serde::{Deserialize, Serialize};

/// Account role. Hosts manage listings, guests book them. Fixed at
/// registration; there is no promotion endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Guest,
    Host,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Guest => "guest",
            Role::Host => "host",
        }
    }

    /// Unknown or absent roles fall back to guest.
    pub fn parse_or_default(value: Option<&str>) -> Self {
        match value {
            Some("host") => Role::Host,
            _ => Role::Guest,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub email: String,
    pub name: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: Role,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPublic {
    pub id: String,
    pub email: String,
    pub name: String,
    pub role: Role,
    pub created_at: String,
    pub updated_at: String,
}

impl From<User> for UserPublic {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            email: u.email,
            name: u.name,
            role: u.role,
            created_at: u.created_at,
            updated_at: u.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_parsing_defaults_to_guest() {
        assert_eq!(Role::parse_or_default(Some("host")), Role::Host);
        assert_eq!(Role::parse_or_default(Some("guest")), Role::Guest);
        assert_eq!(Role::parse_or_default(Some("admin")), Role::Guest);
        assert_eq!(Role::parse_or_default(None), Role::Guest);
    }

    #[test]
    fn user_serialization_omits_password_hash() {
        let user = User {
            id: "u1".into(),
            email: "a@b.c".into(),
            name: "A".into(),
            password_hash: "secret".into(),
            role: Role::Guest,
            created_at: "2026-01-01T00:00:00.000Z".into(),
            updated_at: "2026-01-01T00:00:00.000Z".into(),
        };
        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("secret"));
        assert!(!json.contains("password"));
    }
}
