use super::{DashboardShell, PageKind, ShellPage};
use crate::models::{Identity, Role};
use crate::services::marketplace::with_query;

pub struct ChefShell;

impl DashboardShell for ChefShell {
    const ROLE: Role = Role::Chef;
    const TITLE: &'static str = "Chef Dashboard";
    const PAGES: &'static [ShellPage] = &[
        ShellPage {
            slug: "",
            title: "My Profile",
            kind: PageKind::Profile,
        },
        ShellPage {
            slug: "create-meal",
            title: "Create Meal",
            kind: PageKind::CreateMeal,
        },
        ShellPage {
            slug: "my-meals",
            title: "My Meals",
            kind: PageKind::Listing(my_meals),
        },
        ShellPage {
            slug: "order-requests",
            title: "Order Requests",
            kind: PageKind::Listing(order_requests),
        },
    ];
}

fn my_meals(identity: &Identity) -> Option<String> {
    Some(with_query("/meals", "chefEmail", &identity.email))
}

// Orders are addressed to the chef id, which the backend assigns on approval.
// Without one there is nothing to filter by.
fn order_requests(identity: &Identity) -> Option<String> {
    let chef_id = identity.chef_id.as_deref().filter(|id| !id.trim().is_empty())?;
    Some(with_query("/orders", "chefId", chef_id))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chef(chef_id: Option<&str>) -> Identity {
        serde_json::from_value(serde_json::json!({
            "email": "rina@example.com",
            "name": "Rina Das",
            "role": "chef",
            "chefId": chef_id,
        }))
        .unwrap()
    }

    #[test]
    fn test_order_requests_need_a_chef_id() {
        assert_eq!(
            order_requests(&chef(Some("chef-4821"))).as_deref(),
            Some("/orders?chefId=chef-4821")
        );
        assert_eq!(order_requests(&chef(None)), None);
        assert_eq!(order_requests(&chef(Some(""))), None);
    }
}
