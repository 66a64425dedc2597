use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// The closed set of marketplace roles.
///
/// Backend payloads carrying any other role string fail to decode, so an
/// unrecognised role can never reach a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Chef,
    Admin,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::User, Role::Chef, Role::Admin];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Chef => "chef",
            Role::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unrecognised role: {0}")]
pub struct UnknownRole(pub String);

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .into_iter()
            .find(|role| role.as_str() == s)
            .ok_or_else(|| UnknownRole(s.to_string()))
    }
}

/// Account standing as flagged by an admin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
    #[default]
    Active,
    Fraud,
    /// Any other standing the backend reports; treated as not flagged.
    #[serde(other)]
    Unknown,
}

/// The authenticated principal, exactly as the backend returned it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    pub email: String,
    pub name: String,
    pub role: Role,
    #[serde(default)]
    pub profile_image: Option<String>,
    #[serde(default)]
    pub status: UserStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chef_id: Option<String>,
}

impl Identity {
    pub fn is_fraud(&self) -> bool {
        self.status == UserStatus::Fraud
    }

    pub fn initials(&self) -> String {
        let initials: String = self
            .name
            .split_whitespace()
            .filter_map(|part| part.chars().next())
            .take(2)
            .collect::<String>()
            .to_uppercase();

        if initials.is_empty() {
            "U".to_string()
        } else {
            initials
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_backend_identity() {
        let json = r#"{
            "email": "rina@example.com",
            "name": "Rina Das",
            "role": "chef",
            "profileImage": "https://img.example.com/rina.png",
            "status": "active",
            "chefId": "chef-4821"
        }"#;

        let identity: Identity = serde_json::from_str(json).unwrap();
        assert_eq!(identity.role, Role::Chef);
        assert_eq!(identity.chef_id.as_deref(), Some("chef-4821"));
        assert_eq!(identity.initials(), "RD");
        assert!(!identity.is_fraud());
    }

    #[test]
    fn test_status_defaults_to_active() {
        let json = r#"{"email":"a@example.com","name":"A","role":"user"}"#;
        let identity: Identity = serde_json::from_str(json).unwrap();
        assert_eq!(identity.status, UserStatus::Active);
        assert_eq!(identity.profile_image, None);
    }

    #[test]
    fn test_unlisted_status_still_decodes() {
        let json = r#"{"email":"a@example.com","name":"A","role":"chef","status":"pending"}"#;
        let identity: Identity = serde_json::from_str(json).unwrap();
        assert_eq!(identity.status, UserStatus::Unknown);
        assert_eq!(identity.role, Role::Chef);
        assert!(!identity.is_fraud());
    }

    #[test]
    fn test_unknown_role_is_rejected() {
        let json = r#"{"email":"a@example.com","name":"A","role":"superadmin"}"#;
        assert!(serde_json::from_str::<Identity>(json).is_err());
        assert_eq!(
            "superadmin".parse::<Role>(),
            Err(UnknownRole("superadmin".to_string()))
        );
    }

    #[test]
    fn test_role_string_round_trip() {
        for role in Role::ALL {
            assert_eq!(role.as_str().parse::<Role>(), Ok(role));
        }
    }
}
