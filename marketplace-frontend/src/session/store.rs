//! The single source of truth for who is signed in.

use super::storage::{KeyValueStorage, IDENTITY_KEY, TOKEN_KEY};
use crate::errors::{SessionError, StorageError};
use crate::models::{AuthResponse, Identity, LoginRequest, RegisterRequest, Role};
use crate::services::auth_client::AuthBackend;
use metrics::counter;
use secrecy::{ExposeSecret, Secret};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// Opaque bearer credential. Never printed.
#[derive(Clone)]
pub struct BearerToken(Secret<String>);

impl BearerToken {
    /// Blank tokens are not credentials.
    pub fn new(raw: impl Into<String>) -> Option<Self> {
        let raw = raw.into();
        if raw.trim().is_empty() {
            None
        } else {
            Some(Self(Secret::new(raw)))
        }
    }

    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }
}

impl PartialEq for BearerToken {
    fn eq(&self, other: &Self) -> bool {
        self.expose() == other.expose()
    }
}

impl Eq for BearerToken {}

impl fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("BearerToken([REDACTED])")
    }
}

/// An identity together with the token that proves it. The two only exist
/// as a pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveSession {
    identity: Identity,
    token: BearerToken,
}

impl ActiveSession {
    pub fn new(identity: Identity, token: BearerToken) -> Self {
        Self { identity, token }
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    pub fn token(&self) -> &BearerToken {
        &self.token
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Session {
    /// Persisted state has not been read yet.
    Hydrating,
    Anonymous,
    Authenticated(ActiveSession),
}

impl Session {
    pub fn is_hydrating(&self) -> bool {
        matches!(self, Session::Hydrating)
    }

    pub fn active(&self) -> Option<&ActiveSession> {
        match self {
            Session::Authenticated(active) => Some(active),
            _ => None,
        }
    }

    pub fn identity(&self) -> Option<&Identity> {
        self.active().map(ActiveSession::identity)
    }

    pub fn token(&self) -> Option<&BearerToken> {
        self.active().map(ActiveSession::token)
    }

    pub fn role(&self) -> Option<Role> {
        self.identity().map(|identity| identity.role)
    }
}

/// Result of [`SessionStore::force_teardown`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Teardown {
    /// The rejected session was current and has been cleared.
    Cleared,
    /// Nobody was signed in.
    AlreadyEmpty,
    /// The rejected token belongs to an earlier session; the current one
    /// was left alone.
    Stale,
}

/// Owns the in-memory [`Session`] and its persisted copy.
///
/// Reads ([`SessionStore::current`]) never wait. Mutations are serialized,
/// and each login or registration holds a ticket from a monotonic counter:
/// a response that arrives after a newer login, registration, logout or
/// teardown started is discarded instead of overwriting the newer state.
pub struct SessionStore {
    state: RwLock<Session>,
    storage: Arc<dyn KeyValueStorage>,
    backend: Arc<dyn AuthBackend>,
    attempts: AtomicU64,
    mutations: Mutex<()>,
}

impl SessionStore {
    pub fn new(storage: Arc<dyn KeyValueStorage>, backend: Arc<dyn AuthBackend>) -> Self {
        Self {
            state: RwLock::new(Session::Hydrating),
            storage,
            backend,
            attempts: AtomicU64::new(0),
            mutations: Mutex::new(()),
        }
    }

    /// Snapshot of the current session.
    pub fn current(&self) -> Session {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn set_state(&self, session: Session) {
        *self.state.write().unwrap_or_else(PoisonError::into_inner) = session;
    }

    fn next_ticket(&self) -> u64 {
        self.attempts.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn is_latest(&self, ticket: u64) -> bool {
        self.attempts.load(Ordering::SeqCst) == ticket
    }

    /// Restore the session persisted by an earlier process. Makes no network
    /// call; a stale token is discovered on the first authenticated request.
    pub async fn hydrate(&self) -> Session {
        let _guard = self.mutations.lock().await;

        let session = match self.read_persisted().await {
            Ok(Some(active)) => {
                info!(email = %active.identity().email, role = %active.identity().role, "Session restored");
                Session::Authenticated(active)
            }
            Ok(None) => {
                debug!("No persisted session");
                Session::Anonymous
            }
            Err(e) => {
                warn!(error = %e, "Persisted session unreadable; starting signed out");
                Session::Anonymous
            }
        };

        self.set_state(session.clone());
        session
    }

    async fn read_persisted(&self) -> Result<Option<ActiveSession>, StorageError> {
        let identity = self.storage.get(IDENTITY_KEY).await?;
        let token = self.storage.get(TOKEN_KEY).await?;

        let (Some(identity), Some(token)) = (identity, token) else {
            return Ok(None);
        };

        let Some(token) = BearerToken::new(token) else {
            warn!("Persisted token is blank");
            return Ok(None);
        };

        match serde_json::from_str::<Identity>(&identity) {
            Ok(identity) => Ok(Some(ActiveSession::new(identity, token))),
            Err(e) => {
                // Covers roles outside the known set as well as garbage.
                warn!(error = %e, "Persisted identity is malformed");
                Ok(None)
            }
        }
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<Identity, SessionError> {
        let ticket = self.next_ticket();
        let request = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };

        match self.backend.login(&request).await {
            Ok(response) => {
                let identity = self.establish(ticket, response).await?;
                counter!("session_logins_total", "outcome" => "success").increment(1);
                info!(email = %identity.email, role = %identity.role, "User logged in successfully");
                Ok(identity)
            }
            Err(e) => {
                counter!("session_logins_total", "outcome" => "failure").increment(1);
                warn!(email = %email, error = %e, "Login failed");
                Err(e)
            }
        }
    }

    pub async fn register(&self, registration: RegisterRequest) -> Result<Identity, SessionError> {
        let ticket = self.next_ticket();

        match self.backend.register(&registration).await {
            Ok(response) => {
                let identity = self.establish(ticket, response).await?;
                info!(email = %identity.email, "User registered");
                Ok(identity)
            }
            Err(e) => {
                warn!(email = %registration.email, error = %e, "Registration failed");
                Err(e)
            }
        }
    }

    /// Persist and publish a fresh session, unless a newer change has started
    /// since `ticket` was taken.
    async fn establish(&self, ticket: u64, response: AuthResponse) -> Result<Identity, SessionError> {
        let _guard = self.mutations.lock().await;

        if !self.is_latest(ticket) {
            counter!("session_logins_total", "outcome" => "superseded").increment(1);
            warn!(email = %response.user.email, "Discarding superseded sign-in");
            return Err(SessionError::Superseded);
        }

        let token = BearerToken::new(response.token)
            .ok_or_else(|| SessionError::MalformedResponse("empty token".to_string()))?;
        let identity = response.user;

        if let Err(e) = self.persist(&identity, &token).await {
            self.clear_persisted().await;
            return Err(e);
        }

        self.set_state(Session::Authenticated(ActiveSession::new(
            identity.clone(),
            token,
        )));
        Ok(identity)
    }

    async fn persist(&self, identity: &Identity, token: &BearerToken) -> Result<(), SessionError> {
        let serialized = serde_json::to_string(identity).map_err(StorageError::from)?;
        self.storage.set(IDENTITY_KEY, &serialized).await?;
        self.storage.set(TOKEN_KEY, token.expose()).await?;
        Ok(())
    }

    /// Best effort; a leftover single entry hydrates as signed out anyway.
    async fn clear_persisted(&self) {
        for key in [TOKEN_KEY, IDENTITY_KEY] {
            if let Err(e) = self.storage.remove(key).await {
                warn!(key, error = %e, "Failed to clear persisted session entry");
            }
        }
    }

    /// Sign out. Idempotent. In-flight requests are not cancelled; a sign-in
    /// still in flight is discarded when it resolves.
    pub async fn logout(&self) {
        self.next_ticket();
        let _guard = self.mutations.lock().await;

        self.clear_persisted().await;
        let previous = std::mem::replace(
            &mut *self.state.write().unwrap_or_else(PoisonError::into_inner),
            Session::Anonymous,
        );

        if let Some(identity) = previous.identity() {
            info!(email = %identity.email, "User logged out");
        }
    }

    /// Clear the session because the backend rejected `rejected` (the token
    /// the failing request carried, if any).
    pub async fn force_teardown(&self, rejected: Option<&BearerToken>) -> Teardown {
        let _guard = self.mutations.lock().await;

        match self.current() {
            Session::Authenticated(active) if Some(active.token()) == rejected => {
                self.next_ticket();
                self.clear_persisted().await;
                self.set_state(Session::Anonymous);
                warn!(email = %active.identity().email, "Session rejected by backend; signed out");
                Teardown::Cleared
            }
            Session::Authenticated(_) => {
                debug!("Ignoring authorization failure for an earlier session");
                Teardown::Stale
            }
            // Nothing restored yet; the persisted session is left for hydrate.
            Session::Hydrating => Teardown::AlreadyEmpty,
            Session::Anonymous => {
                self.clear_persisted().await;
                Teardown::AlreadyEmpty
            }
        }
    }

    /// Replace the identity wholesale with a freshly fetched copy, provided
    /// the session that requested it is still the current one.
    pub async fn replace_identity(
        &self,
        token: &BearerToken,
        identity: Identity,
    ) -> Result<Option<Identity>, SessionError> {
        let _guard = self.mutations.lock().await;

        let Some(active) = self.current().active().cloned() else {
            return Ok(None);
        };
        if active.token() != token {
            return Ok(None);
        }
        if active.identity().email != identity.email {
            return Err(SessionError::MalformedResponse(format!(
                "profile fetched for {} does not belong to {}",
                identity.email,
                active.identity().email
            )));
        }

        self.persist(&identity, token).await?;
        if active.identity().role != identity.role {
            info!(
                email = %identity.email,
                from = %active.identity().role,
                to = %identity.role,
                "Role changed"
            );
        }
        self.set_state(Session::Authenticated(ActiveSession::new(
            identity.clone(),
            token.clone(),
        )));
        Ok(Some(identity))
    }
}
