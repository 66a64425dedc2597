//! Typed marketplace endpoints used by pages and dashboard shells. Every call
//! goes through the [`ApiGateway`].

use super::gateway::ApiGateway;
use crate::errors::{GatewayError, SessionError};
use crate::models::{Identity, Meal, NewMeal, NewOrder, Role, RoleRequest};
use crate::session::SessionStore;
use serde_json::Value;
use std::sync::Arc;

/// Outcome of re-fetching the signed-in user's profile.
#[derive(Debug)]
pub enum ProfileRefresh {
    Updated(Identity),
    /// The session ended or changed while the fetch was in flight.
    Discarded,
}

#[derive(Debug, thiserror::Error)]
pub enum RefreshError {
    #[error(transparent)]
    Gateway(#[from] GatewayError),
    #[error(transparent)]
    Session(#[from] SessionError),
}

pub struct MarketplaceApi {
    gateway: Arc<ApiGateway>,
    session: Arc<SessionStore>,
}

impl MarketplaceApi {
    pub fn new(gateway: Arc<ApiGateway>, session: Arc<SessionStore>) -> Self {
        Self { gateway, session }
    }

    pub fn gateway(&self) -> &ApiGateway {
        &self.gateway
    }

    pub async fn meals(&self) -> Result<Vec<Meal>, GatewayError> {
        self.gateway.get("/meals").await
    }

    pub async fn meal(&self, id: &str) -> Result<Meal, GatewayError> {
        self.gateway.get(&with_segment("/meals", id)?).await
    }

    pub async fn place_order(&self, order: &NewOrder) -> Result<Value, GatewayError> {
        self.gateway.post("/orders", order).await
    }

    pub async fn create_meal(&self, meal: &NewMeal) -> Result<Value, GatewayError> {
        self.gateway.post("/meals", meal).await
    }

    pub async fn request_role(
        &self,
        identity: &Identity,
        role: Role,
    ) -> Result<Value, GatewayError> {
        self.gateway
            .post("/requests", &RoleRequest::new(identity, role))
            .await
    }

    /// Raw listing for a shell page.
    pub async fn listing(&self, path: &str) -> Result<Value, GatewayError> {
        self.gateway.get(path).await
    }

    /// Re-fetch the signed-in identity and replace it wholesale. This is the
    /// only way a role or status change reaches an open session.
    pub async fn refresh_profile(&self) -> Result<ProfileRefresh, RefreshError> {
        let Some(active) = self.session.current().active().cloned() else {
            return Ok(ProfileRefresh::Discarded);
        };

        let path = with_segment("/users", &active.identity().email)?;
        let identity: Identity = self.gateway.get(&path).await?;

        match self.session.replace_identity(active.token(), identity).await? {
            Some(identity) => Ok(ProfileRefresh::Updated(identity)),
            None => Ok(ProfileRefresh::Discarded),
        }
    }
}

/// `path/segment` with the segment percent-encoded, so a value can never
/// address a different endpoint.
pub fn with_segment(path: &str, segment: &str) -> Result<String, GatewayError> {
    if matches!(segment, "" | "." | "..") {
        return Err(GatewayError::InvalidPath(segment.to_string()));
    }
    Ok(format!("{}/{}", path, urlencoding::encode(segment)))
}

/// `path?key=value` with the value form-encoded.
pub fn with_query(path: &str, key: &str, value: &str) -> String {
    match serde_urlencoded::to_string([(key, value)]) {
        Ok(query) => format!("{}?{}", path, query),
        Err(_) => path.to_string(),
    }
}
