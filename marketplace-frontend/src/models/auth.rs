use super::identity::Identity;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginRequest")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub profile_image: String,
    pub address: String,
}

impl fmt::Debug for RegisterRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisterRequest")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .field("profile_image", &self.profile_image)
            .field("address", &self.address)
            .finish()
    }
}

/// Body of a successful `/auth/login` or `/auth/register` call.
#[derive(Debug, Deserialize, Serialize)]
pub struct AuthResponse {
    pub user: Identity,
    pub token: String,
}

/// Error body the backend sends on rejected requests.
#[derive(Debug, Default, Deserialize)]
pub struct BackendMessage {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl BackendMessage {
    pub fn parse(body: &str) -> Option<String> {
        let parsed: BackendMessage = serde_json::from_str(body).ok()?;
        parsed.message.or(parsed.error)
    }
}
