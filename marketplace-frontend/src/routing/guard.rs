//! Per-navigation access control.
//!
//! [`RouteGuard::decide`] is a pure function of the session and the route's
//! [`Access`] requirement. [`MountTracker`] turns successive decisions for a
//! role-gated subtree into explicit mount/remount/unmount actions, so content
//! gated on one role is never reused after the role changes.

use super::navigator::Location;
use super::routes::Route;
use crate::models::Role;
use crate::session::Session;
use crate::shells::{AdminShell, ChefShell, DashboardShell, UserShell};

/// What a route requires before it may render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Public,
    /// Any signed-in identity.
    Authenticated,
    /// A signed-in identity holding one of these roles.
    Roles(&'static [Role]),
}

const USER_ONLY: &[Role] = &[UserShell::ROLE];
const CHEF_ONLY: &[Role] = &[ChefShell::ROLE];
const ADMIN_ONLY: &[Role] = &[AdminShell::ROLE];

impl Access {
    pub fn for_route(route: &Route) -> Access {
        match route {
            Route::Home
            | Route::Meals
            | Route::Login
            | Route::Register
            | Route::Logout
            | Route::Health
            | Route::Metrics
            | Route::NotFound => Access::Public,
            Route::MealDetails(_) | Route::Order(_) | Route::Dashboard => Access::Authenticated,
            Route::UserDashboard(_) => Access::Roles(USER_ONLY),
            Route::ChefDashboard(_) => Access::Roles(CHEF_ONLY),
            Route::AdminDashboard(_) => Access::Roles(ADMIN_ONLY),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedirectReason {
    /// Nobody is signed in.
    LoginRequired,
    /// Signed in, but the role may not see this view.
    UnauthorizedRole,
}

impl RedirectReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            RedirectReason::LoginRequired => "login_required",
            RedirectReason::UnauthorizedRole => "unauthorized_role",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    /// The session is still hydrating; render a neutral loading state.
    Pending,
    /// Render the view. `role` keys role-gated subtrees and is `None` for
    /// public views.
    Allow { role: Option<Role> },
    Redirect { target: Location, reason: RedirectReason },
}

impl GuardDecision {
    pub fn label(&self) -> &'static str {
        match self {
            GuardDecision::Pending => "pending",
            GuardDecision::Allow { .. } => "allow",
            GuardDecision::Redirect { reason, .. } => reason.as_str(),
        }
    }
}

pub struct RouteGuard;

impl RouteGuard {
    /// Decide whether `requested` (path plus query) may render under `access`.
    pub fn decide(session: &Session, access: Access, requested: &str) -> GuardDecision {
        if access == Access::Public {
            return GuardDecision::Allow { role: None };
        }

        let role = match session {
            Session::Hydrating => return GuardDecision::Pending,
            Session::Anonymous => {
                return GuardDecision::Redirect {
                    target: Location::login_from(requested),
                    reason: RedirectReason::LoginRequired,
                }
            }
            Session::Authenticated(active) => active.identity().role,
        };

        match access {
            Access::Roles(allowed) if !allowed.contains(&role) => GuardDecision::Redirect {
                target: Location::home(),
                reason: RedirectReason::UnauthorizedRole,
            },
            _ => GuardDecision::Allow { role: Some(role) },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MountAction {
    /// Nothing was mounted; mount fresh.
    Mount,
    /// Same role as the mounted subtree; keep its state.
    Keep,
    /// Still allowed, but under a different role; discard and mount fresh.
    Remount,
    /// Redirected away; discard the mounted subtree.
    Unmount,
    /// No change.
    Idle,
}

/// Tracks which role the currently mounted gated subtree was built for.
///
/// `generation` increases on every mount, remount and unmount; work started
/// under one generation must be dropped if it completes under another.
#[derive(Debug, Default)]
pub struct MountTracker {
    mounted: Option<Role>,
    generation: u64,
}

impl MountTracker {
    pub fn mounted(&self) -> Option<Role> {
        self.mounted
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn reconcile(&mut self, decision: &GuardDecision) -> MountAction {
        match decision {
            GuardDecision::Allow { role: Some(role) } => {
                let action = match self.mounted {
                    None => MountAction::Mount,
                    Some(mounted) if mounted == *role => return MountAction::Keep,
                    Some(_) => MountAction::Remount,
                };
                self.mounted = Some(*role);
                self.generation += 1;
                action
            }
            GuardDecision::Redirect { .. } => self.unmount(),
            GuardDecision::Allow { role: None } | GuardDecision::Pending => MountAction::Idle,
        }
    }

    /// Navigation left the gated subtree.
    pub fn unmount(&mut self) -> MountAction {
        if self.mounted.take().is_some() {
            self.generation += 1;
            MountAction::Unmount
        } else {
            MountAction::Idle
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Identity;
    use crate::session::{ActiveSession, BearerToken};

    fn session_as(role: &str) -> Session {
        let identity: Identity = serde_json::from_value(serde_json::json!({
            "email": "cook@example.com",
            "name": "Cook",
            "role": role,
        }))
        .unwrap();
        Session::Authenticated(ActiveSession::new(
            identity,
            BearerToken::new("token").unwrap(),
        ))
    }

    #[test]
    fn test_hydrating_session_is_pending() {
        let decision = RouteGuard::decide(&Session::Hydrating, Access::Authenticated, "/meals/1");
        assert_eq!(decision, GuardDecision::Pending);
    }

    #[test]
    fn test_public_routes_render_while_hydrating() {
        let decision = RouteGuard::decide(&Session::Hydrating, Access::Public, "/meals");
        assert_eq!(decision, GuardDecision::Allow { role: None });
    }

    #[test]
    fn test_anonymous_redirects_to_login_with_origin() {
        for path in ["/meals/9", "/order/9", "/dashboard", "/dashboard/admin/manage-users"] {
            let access = Access::for_route(&Route::parse(path));
            let decision = RouteGuard::decide(&Session::Anonymous, access, path);
            assert_eq!(
                decision,
                GuardDecision::Redirect {
                    target: Location::login_from(path),
                    reason: RedirectReason::LoginRequired,
                }
            );
        }
    }

    #[test]
    fn test_wrong_role_redirects_to_root_not_login() {
        let decision = RouteGuard::decide(
            &session_as("user"),
            Access::for_route(&Route::parse("/dashboard/chef/my-meals")),
            "/dashboard/chef/my-meals",
        );
        assert_eq!(
            decision,
            GuardDecision::Redirect {
                target: Location::home(),
                reason: RedirectReason::UnauthorizedRole,
            }
        );
    }

    #[test]
    fn test_matching_role_is_allowed() {
        let decision = RouteGuard::decide(
            &session_as("admin"),
            Access::for_route(&Route::parse("/dashboard/admin")),
            "/dashboard/admin",
        );
        assert_eq!(decision, GuardDecision::Allow { role: Some(Role::Admin) });

        let decision = RouteGuard::decide(&session_as("chef"), Access::Authenticated, "/order/3");
        assert_eq!(decision, GuardDecision::Allow { role: Some(Role::Chef) });
    }

    #[test]
    fn test_role_change_forces_redirect_and_unmount() {
        let access = Access::for_route(&Route::parse("/dashboard/chef"));
        let mut tracker = MountTracker::default();

        let first = RouteGuard::decide(&session_as("chef"), access, "/dashboard/chef");
        assert_eq!(tracker.reconcile(&first), MountAction::Mount);
        assert_eq!(tracker.reconcile(&first), MountAction::Keep);
        let mounted_generation = tracker.generation();

        // Promoted to admin while the chef dashboard is open.
        let after = RouteGuard::decide(&session_as("admin"), access, "/dashboard/chef");
        assert!(matches!(
            after,
            GuardDecision::Redirect { reason: RedirectReason::UnauthorizedRole, .. }
        ));
        assert_eq!(tracker.reconcile(&after), MountAction::Unmount);
        assert_eq!(tracker.mounted(), None);
        assert!(tracker.generation() > mounted_generation);
    }

    #[test]
    fn test_role_change_on_shared_view_remounts() {
        let mut tracker = MountTracker::default();
        let as_chef = RouteGuard::decide(&session_as("chef"), Access::Authenticated, "/order/1");
        let as_admin = RouteGuard::decide(&session_as("admin"), Access::Authenticated, "/order/1");

        assert_eq!(tracker.reconcile(&as_chef), MountAction::Mount);
        assert_eq!(tracker.reconcile(&as_admin), MountAction::Remount);
        assert_eq!(tracker.mounted(), Some(Role::Admin));
        assert_eq!(tracker.unmount(), MountAction::Unmount);
        assert_eq!(tracker.unmount(), MountAction::Idle);
    }
}
