//! Role dashboard shells.
//!
//! A shell owns the nested pages under its role's dashboard root. Shells only
//! render after the route guard allowed them, read the identity from the
//! session store on every render, and fetch through the gateway. Loaded
//! listings are cached for the life of a mount; [`ShellHost`] drops the cache
//! whenever the guard mounts, remounts or unmounts the gated subtree.

pub mod admin;
pub mod chef;
pub mod user;

pub use admin::AdminShell;
pub use chef::ChefShell;
pub use user::UserShell;

use crate::models::{Identity, Role, Row};
use crate::routing::{dashboard_root, GuardDecision, MountAction, MountTracker};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

pub enum PageKind {
    Profile,
    /// Read-only listing; the function builds the backend path for the
    /// signed-in identity, or `None` when the identity has nothing to list.
    Listing(fn(&Identity) -> Option<String>),
    CreateMeal,
}

pub struct ShellPage {
    /// Sub-path under the shell root; empty for the index page.
    pub slug: &'static str,
    pub title: &'static str,
    pub kind: PageKind,
}

pub trait DashboardShell: Send + Sync + 'static {
    const ROLE: Role;
    const TITLE: &'static str;
    const PAGES: &'static [ShellPage];

    fn root() -> &'static str {
        dashboard_root(Self::ROLE)
    }

    fn page(slug: &str) -> Option<&'static ShellPage> {
        Self::PAGES.iter().find(|page| page.slug == slug)
    }

    fn href(page: &ShellPage) -> String {
        if page.slug.is_empty() {
            Self::root().to_string()
        } else {
            format!("{}/{}", Self::root(), page.slug)
        }
    }

    fn nav(current: &str) -> Vec<NavItem> {
        Self::PAGES
            .iter()
            .map(|page| NavItem {
                href: Self::href(page),
                title: page.title,
                active: page.slug == current,
            })
            .collect()
    }
}

pub struct NavItem {
    pub href: String,
    pub title: &'static str,
    pub active: bool,
}

#[derive(Default)]
struct MountedShell {
    tracker: MountTracker,
    listings: HashMap<String, Vec<Row>>,
}

/// State that lives exactly as long as one mount of a gated subtree.
#[derive(Default)]
pub struct ShellHost {
    mounted: Mutex<MountedShell>,
}

impl ShellHost {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, MountedShell> {
        self.mounted.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Apply a guard decision for a shell route.
    pub fn reconcile(&self, decision: &GuardDecision) -> MountAction {
        let mut mounted = self.lock();
        let action = mounted.tracker.reconcile(decision);

        if matches!(
            action,
            MountAction::Mount | MountAction::Remount | MountAction::Unmount
        ) {
            mounted.listings.clear();
            tracing::debug!(
                action = ?action,
                role = ?mounted.tracker.mounted(),
                generation = mounted.tracker.generation(),
                "Dashboard shell mount changed"
            );
        }
        action
    }

    /// Navigation left the dashboard entirely.
    pub fn leave(&self) {
        let mut mounted = self.lock();
        if mounted.tracker.unmount() == MountAction::Unmount {
            mounted.listings.clear();
        }
    }

    pub fn generation(&self) -> u64 {
        self.lock().tracker.generation()
    }

    pub fn mounted_role(&self) -> Option<Role> {
        self.lock().tracker.mounted()
    }

    pub fn cached(&self, key: &str) -> Option<Vec<Row>> {
        self.lock().listings.get(key).cloned()
    }

    /// Cache a listing loaded under `generation`. Loads that finish after the
    /// shell was remounted or unmounted are dropped.
    pub fn remember(&self, generation: u64, key: &str, rows: Vec<Row>) -> bool {
        let mut mounted = self.lock();
        if mounted.tracker.generation() != generation {
            tracing::debug!(key, "Ignoring listing loaded by a previous mount");
            return false;
        }
        mounted.listings.insert(key.to_string(), rows);
        true
    }

    pub fn forget(&self, key: &str) {
        self.lock().listings.remove(key);
    }
}
