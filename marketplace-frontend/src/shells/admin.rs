use super::{DashboardShell, PageKind, ShellPage};
use crate::models::{Identity, Role};

pub struct AdminShell;

impl DashboardShell for AdminShell {
    const ROLE: Role = Role::Admin;
    const TITLE: &'static str = "Admin Dashboard";
    const PAGES: &'static [ShellPage] = &[
        ShellPage {
            slug: "",
            title: "My Profile",
            kind: PageKind::Profile,
        },
        ShellPage {
            slug: "manage-users",
            title: "Manage Users",
            kind: PageKind::Listing(manage_users),
        },
        ShellPage {
            slug: "manage-requests",
            title: "Manage Requests",
            kind: PageKind::Listing(manage_requests),
        },
        ShellPage {
            slug: "platform-statistics",
            title: "Platform Statistics",
            kind: PageKind::Listing(platform_statistics),
        },
    ];
}

fn manage_users(_: &Identity) -> Option<String> {
    Some("/users".to_string())
}

fn manage_requests(_: &Identity) -> Option<String> {
    Some("/requests".to_string())
}

fn platform_statistics(_: &Identity) -> Option<String> {
    Some("/statistics".to_string())
}
