pub mod app;
pub mod auth;
pub mod dashboard;
pub mod meals;
pub mod metrics;

use crate::errors::{GatewayError, SessionError};
use crate::routing::LOGIN_PATH;
use crate::services::RefreshError;
use app::ErrorTemplate;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};

/// Failure of a page handler.
#[derive(Debug)]
pub enum PageError {
    /// The session is gone; send the browser to the login page.
    LoginRequired,
    Failed { status: StatusCode, message: String },
}

impl PageError {
    pub fn failed(status: StatusCode, message: impl Into<String>) -> Self {
        PageError::Failed {
            status,
            message: message.into(),
        }
    }
}

impl From<GatewayError> for PageError {
    fn from(err: GatewayError) -> Self {
        let validation_message = err.validation_message();

        match err {
            GatewayError::AuthorizationFailed => PageError::LoginRequired,
            GatewayError::Network(e) => {
                tracing::error!(error = %e, "Marketplace backend unreachable");
                PageError::failed(
                    StatusCode::BAD_GATEWAY,
                    "The marketplace is unreachable right now. Please try again.",
                )
            }
            GatewayError::Validation { status, .. } => PageError::failed(
                status,
                validation_message.unwrap_or_else(|| "The request was rejected.".to_string()),
            ),
            GatewayError::Server { status, message } => PageError::failed(status, message),
            GatewayError::InvalidPath(segment) => {
                tracing::warn!(segment = %segment, "Rejected path parameter");
                PageError::failed(StatusCode::NOT_FOUND, "This page does not exist.")
            }
            GatewayError::MalformedResponse(detail) => {
                tracing::error!(detail = %detail, "Unexpected backend payload");
                PageError::failed(StatusCode::BAD_GATEWAY, "Unexpected response from the marketplace.")
            }
        }
    }
}

impl From<SessionError> for PageError {
    fn from(err: SessionError) -> Self {
        tracing::error!(error = %err, "Session update failed");
        PageError::failed(StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
    }
}

impl From<RefreshError> for PageError {
    fn from(err: RefreshError) -> Self {
        match err {
            RefreshError::Gateway(e) => e.into(),
            RefreshError::Session(e) => e.into(),
        }
    }
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        match self {
            PageError::LoginRequired => Redirect::to(LOGIN_PATH).into_response(),
            PageError::Failed { status, message } => (
                status,
                ErrorTemplate {
                    user: None,
                    status: status.as_u16(),
                    message,
                },
            )
                .into_response(),
        }
    }
}
