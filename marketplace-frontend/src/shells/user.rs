use super::{DashboardShell, PageKind, ShellPage};
use crate::models::{Identity, Role};
use crate::services::marketplace::with_query;

pub struct UserShell;

impl DashboardShell for UserShell {
    const ROLE: Role = Role::User;
    const TITLE: &'static str = "User Dashboard";
    const PAGES: &'static [ShellPage] = &[
        ShellPage {
            slug: "",
            title: "My Profile",
            kind: PageKind::Profile,
        },
        ShellPage {
            slug: "my-orders",
            title: "My Orders",
            kind: PageKind::Listing(my_orders),
        },
        ShellPage {
            slug: "my-reviews",
            title: "My Reviews",
            kind: PageKind::Listing(my_reviews),
        },
        ShellPage {
            slug: "favorites",
            title: "Favorite Meals",
            kind: PageKind::Listing(favorites),
        },
    ];
}

fn my_orders(identity: &Identity) -> Option<String> {
    Some(with_query("/orders", "email", &identity.email))
}

fn my_reviews(identity: &Identity) -> Option<String> {
    Some(with_query("/reviews", "email", &identity.email))
}

fn favorites(identity: &Identity) -> Option<String> {
    Some(with_query("/favorites", "email", &identity.email))
}
