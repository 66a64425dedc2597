use super::store::{BearerToken, SessionStore, Teardown};
use crate::routing::{Location, Navigator};
use crate::services::gateway::AuthFailureSink;
use async_trait::async_trait;
use metrics::counter;
use std::sync::Arc;

/// Top-level owner of the session: the only receiver of the gateway's
/// authorization-failure signal.
#[derive(Clone)]
pub struct SessionOwner {
    session: Arc<SessionStore>,
    navigator: Navigator,
}

impl SessionOwner {
    pub fn new(session: Arc<SessionStore>, navigator: Navigator) -> Self {
        Self { session, navigator }
    }

    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }
}

#[async_trait]
impl AuthFailureSink for SessionOwner {
    async fn authorization_failed(&self, rejected: Option<BearerToken>) {
        match self.session.force_teardown(rejected.as_ref()).await {
            Teardown::Cleared => {
                counter!("session_forced_logouts_total").increment(1);
                self.navigator.navigate(Location::login());
            }
            Teardown::AlreadyEmpty => self.navigator.navigate(Location::login()),
            Teardown::Stale => {}
        }
    }
}
