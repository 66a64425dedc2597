use crate::config::ApiSettings;
use crate::errors::SessionError;
use crate::models::{AuthResponse, BackendMessage, LoginRequest, RegisterRequest};
use async_trait::async_trait;
use marketplace_core::observability::TracedClientExt;
use reqwest::{Client, Response};
use serde::Serialize;
use std::time::Duration;

/// The backend's unauthenticated sign-in endpoints.
#[async_trait]
pub trait AuthBackend: Send + Sync {
    async fn login(&self, credentials: &LoginRequest) -> Result<AuthResponse, SessionError>;
    async fn register(&self, registration: &RegisterRequest) -> Result<AuthResponse, SessionError>;
}

pub struct AuthClient {
    client: Client,
    base_url: String,
}

impl AuthClient {
    pub fn new(settings: &ApiSettings) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.request_timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Send a POST request with trace context propagation.
    async fn post<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<Response, SessionError> {
        let url = format!("{}{}", self.base_url, path);

        self.client
            .traced_post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Failed to send POST request to {}: {}", url, e);
                SessionError::Network(e)
            })
    }

    /// Decode a success body, or hand the backend's message to `rejected`.
    async fn into_auth_response(
        response: Response,
        rejected: fn(String) -> SessionError,
    ) -> Result<AuthResponse, SessionError> {
        let status = response.status();

        if status.is_success() {
            return response
                .json::<AuthResponse>()
                .await
                .map_err(|e| SessionError::MalformedResponse(e.to_string()));
        }

        let body = response.text().await.unwrap_or_default();
        let message = BackendMessage::parse(&body).unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("request rejected")
                .to_string()
        });

        if status.is_client_error() {
            Err(rejected(message))
        } else {
            tracing::error!(status = status.as_u16(), "Auth service failed: {}", message);
            Err(SessionError::Unavailable(format!("{}: {}", status, message)))
        }
    }
}

#[async_trait]
impl AuthBackend for AuthClient {
    async fn login(&self, credentials: &LoginRequest) -> Result<AuthResponse, SessionError> {
        let response = self.post("/auth/login", credentials).await?;
        Self::into_auth_response(response, SessionError::InvalidCredentials).await
    }

    async fn register(&self, registration: &RegisterRequest) -> Result<AuthResponse, SessionError> {
        let response = self.post("/auth/register", registration).await?;
        Self::into_auth_response(response, SessionError::RegistrationFailed).await
    }
}
