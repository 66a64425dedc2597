use std::sync::Arc;
use tokio::sync::watch;

pub const HOME_PATH: &str = "/";
pub const LOGIN_PATH: &str = "/login";

/// A navigation target. `from` carries the location a login redirect should
/// return to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub path: String,
    pub from: Option<String>,
}

impl Location {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            from: None,
        }
    }

    pub fn home() -> Self {
        Self::new(HOME_PATH)
    }

    pub fn login() -> Self {
        Self::new(LOGIN_PATH)
    }

    /// Login entry point that resumes at `requested` afterwards.
    pub fn login_from(requested: impl Into<String>) -> Self {
        Self {
            path: LOGIN_PATH.to_string(),
            from: Some(requested.into()),
        }
    }

    /// Render as a URI reference suitable for a `Location` header.
    pub fn to_uri(&self) -> String {
        match &self.from {
            Some(from) => match serde_urlencoded::to_string([("from", from.as_str())]) {
                Ok(query) => format!("{}?{}", self.path, query),
                Err(_) => self.path.clone(),
            },
            None => self.path.clone(),
        }
    }
}

/// Where to go after a successful login: the preserved location if it is a
/// local path outside the auth pages, else home.
pub fn resume_path(from: Option<&str>) -> &str {
    match from {
        Some(path)
            if path.starts_with('/')
                && !path.starts_with("//")
                && !path.contains('\\')
                && path != LOGIN_PATH
                && path != "/register" =>
        {
            path
        }
        _ => HOME_PATH,
    }
}

/// Process-wide current location, observable by whoever renders it.
///
/// The gateway's forced-logout path navigates through this instead of
/// touching any rendering environment directly.
#[derive(Clone)]
pub struct Navigator {
    sender: Arc<watch::Sender<Location>>,
}

impl Navigator {
    pub fn new(initial: Location) -> Self {
        let (sender, _) = watch::channel(initial);
        Self {
            sender: Arc::new(sender),
        }
    }

    pub fn navigate(&self, to: Location) {
        tracing::debug!(to = %to.to_uri(), "Navigating");
        self.sender.send_replace(to);
    }

    pub fn current(&self) -> Location {
        self.sender.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Location> {
        self.sender.subscribe()
    }
}

impl Default for Navigator {
    fn default() -> Self {
        Self::new(Location::home())
    }
}
