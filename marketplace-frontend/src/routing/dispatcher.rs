//! Resolves the roleless `/dashboard` entry point.

use super::navigator::Location;
use crate::models::Role;
use crate::session::Session;

pub const DASHBOARD_PATH: &str = "/dashboard";

/// Root path of each role's dashboard shell.
pub fn dashboard_root(role: Role) -> &'static str {
    match role {
        Role::User => "/dashboard/user",
        Role::Chef => "/dashboard/chef",
        Role::Admin => "/dashboard/admin",
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch {
    /// Session still hydrating.
    Pending,
    Redirect(Location),
}

pub fn dispatch(session: &Session) -> Dispatch {
    match session {
        Session::Hydrating => Dispatch::Pending,
        Session::Anonymous => Dispatch::Redirect(Location::login_from(DASHBOARD_PATH)),
        Session::Authenticated(active) => {
            Dispatch::Redirect(Location::new(dashboard_root(active.identity().role)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Identity;
    use crate::session::{ActiveSession, BearerToken};

    fn session_as(role: Role) -> Session {
        let identity = Identity {
            email: "x@example.com".into(),
            name: "X".into(),
            role,
            profile_image: None,
            status: Default::default(),
            chef_id: None,
        };
        Session::Authenticated(ActiveSession::new(identity, BearerToken::new("t").unwrap()))
    }

    #[test]
    fn test_dispatch_literal_paths() {
        assert_eq!(
            dispatch(&session_as(Role::Admin)),
            Dispatch::Redirect(Location::new("/dashboard/admin"))
        );
        assert_eq!(
            dispatch(&session_as(Role::Chef)),
            Dispatch::Redirect(Location::new("/dashboard/chef"))
        );
        assert_eq!(
            dispatch(&session_as(Role::User)),
            Dispatch::Redirect(Location::new("/dashboard/user"))
        );
    }

    #[test]
    fn test_dispatch_without_session() {
        match dispatch(&Session::Anonymous) {
            Dispatch::Redirect(target) => assert_eq!(target.path, "/login"),
            other => panic!("unexpected dispatch: {:?}", other),
        }
        assert_eq!(dispatch(&Session::Hydrating), Dispatch::Pending);
    }
}
