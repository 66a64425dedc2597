pub mod dispatcher;
pub mod guard;
pub mod navigator;
pub mod routes;

pub use dispatcher::{dashboard_root, dispatch, Dispatch};
pub use guard::{Access, GuardDecision, MountAction, MountTracker, RedirectReason, RouteGuard};
pub use navigator::{resume_path, Location, Navigator, HOME_PATH, LOGIN_PATH};
pub use routes::Route;
