pub mod config;
pub mod errors;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod routing;
pub mod services;
pub mod session;
pub mod shells;
pub mod startup;

use crate::config::ApiSettings;
use crate::routing::Navigator;
use crate::services::{ApiGateway, AuthBackend, MarketplaceApi};
use crate::session::{KeyValueStorage, SessionOwner, SessionStore};
use crate::shells::ShellHost;
use std::sync::Arc;

/// Shared application state: the session, its owner and the clients built
/// around it. Everything is injected here; nothing is global.
#[derive(Clone)]
pub struct AppState {
    pub session: Arc<SessionStore>,
    pub owner: SessionOwner,
    pub api: Arc<MarketplaceApi>,
    pub shells: Arc<ShellHost>,
}

impl AppState {
    pub fn new(
        api_settings: &ApiSettings,
        storage: Arc<dyn KeyValueStorage>,
        auth_backend: Arc<dyn AuthBackend>,
    ) -> Result<Self, reqwest::Error> {
        let session = Arc::new(SessionStore::new(storage, auth_backend));
        let owner = SessionOwner::new(session.clone(), Navigator::default());
        let gateway = Arc::new(ApiGateway::new(
            api_settings,
            session.clone(),
            Arc::new(owner.clone()),
        )?);
        let api = Arc::new(MarketplaceApi::new(gateway, session.clone()));

        Ok(Self {
            session,
            owner,
            api,
            shells: Arc::new(ShellHost::new()),
        })
    }

    pub fn navigator(&self) -> &Navigator {
        self.owner.navigator()
    }
}
