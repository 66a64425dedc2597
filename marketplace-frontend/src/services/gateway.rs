//! Authenticated access to the marketplace backend.
//!
//! Every call carries `Authorization: Bearer <token>` while a session exists.
//! A `401` from any endpoint is reported to the [`AuthFailureSink`] (which
//! tears the session down and navigates to the login page) before the error
//! is handed back to the caller.

use crate::config::ApiSettings;
use crate::errors::GatewayError;
use crate::session::{BearerToken, SessionStore};
use async_trait::async_trait;
use marketplace_core::observability::TracedClientExt;
use reqwest::{Client, Method, Response, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

/// Receiver of the backend's "this token is no good" signal.
#[async_trait]
pub trait AuthFailureSink: Send + Sync {
    /// `rejected` is the token the failing request carried.
    async fn authorization_failed(&self, rejected: Option<BearerToken>);
}

pub struct ApiGateway {
    client: Client,
    base_url: String,
    session: Arc<SessionStore>,
    failures: Arc<dyn AuthFailureSink>,
}

impl ApiGateway {
    pub fn new(
        settings: &ApiSettings,
        session: Arc<SessionStore>,
        failures: Arc<dyn AuthFailureSink>,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.request_timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            session,
            failures,
        })
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, GatewayError> {
        self.send(Method::GET, path, None::<&()>).await
    }

    pub async fn post<B, T>(&self, path: &str, body: &B) -> Result<T, GatewayError>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        self.send(Method::POST, path, Some(body)).await
    }

    async fn send<B, T>(&self, method: Method, path: &str, body: Option<&B>) -> Result<T, GatewayError>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        // Read the token per call; the session can change between calls.
        let token = self.session.current().token().cloned();
        let url = format!("{}{}", self.base_url, path);

        let mut request = self.client.traced_request(method.clone(), &url);
        if let Some(token) = &token {
            request = request.bearer_auth(token.expose());
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(|e| {
            tracing::warn!(%method, path, error = %e, "Backend unreachable");
            GatewayError::Network(e)
        })?;

        let status = response.status();
        tracing::debug!(%method, path, status = status.as_u16(), "Backend call completed");

        if status == StatusCode::UNAUTHORIZED {
            tracing::warn!(%method, path, "Backend rejected credentials");
            self.failures.authorization_failed(token).await;
            return Err(GatewayError::AuthorizationFailed);
        }

        if !status.is_success() {
            return Err(Self::classify(status, response).await);
        }

        let bytes = response.bytes().await.map_err(GatewayError::Network)?;
        let payload: &[u8] = if bytes.is_empty() { b"null" } else { &bytes };
        serde_json::from_slice(payload).map_err(|e| GatewayError::MalformedResponse(e.to_string()))
    }

    async fn classify(status: StatusCode, response: Response) -> GatewayError {
        let text = response.text().await.unwrap_or_default();
        let payload = serde_json::from_str::<Value>(&text).ok();

        match payload {
            Some(payload)
                if payload.is_object()
                    && matches!(
                        status,
                        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY
                    ) =>
            {
                GatewayError::Validation { status, payload }
            }
            payload => {
                let message = payload
                    .as_ref()
                    .and_then(|p| p.get("message").or_else(|| p.get("error")))
                    .and_then(Value::as_str)
                    .map(str::to_string)
                    .unwrap_or_else(|| {
                        if text.is_empty() {
                            status.canonical_reason().unwrap_or("error").to_string()
                        } else {
                            text
                        }
                    });
                GatewayError::Server { status, message }
            }
        }
    }
}
