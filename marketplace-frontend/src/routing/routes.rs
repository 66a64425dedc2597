//! The navigation surface: every path the frontend recognises.

/// A parsed navigation target. Dashboard variants carry the nested sub-path
/// their shell resolves (empty for the shell's index page).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Home,
    Meals,
    Login,
    Register,
    Logout,
    Health,
    Metrics,
    MealDetails(String),
    Order(String),
    Dashboard,
    UserDashboard(String),
    ChefDashboard(String),
    AdminDashboard(String),
    NotFound,
}

impl Route {
    pub fn parse(path: &str) -> Route {
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        match segments.as_slice() {
            [] => Route::Home,
            ["meals"] => Route::Meals,
            ["meals", id] => Route::MealDetails(id.to_string()),
            ["order", id] => Route::Order(id.to_string()),
            ["login"] => Route::Login,
            ["register"] => Route::Register,
            ["logout"] => Route::Logout,
            ["health"] => Route::Health,
            ["metrics"] => Route::Metrics,
            ["dashboard"] => Route::Dashboard,
            ["dashboard", "user", rest @ ..] => Route::UserDashboard(rest.join("/")),
            ["dashboard", "chef", rest @ ..] => Route::ChefDashboard(rest.join("/")),
            ["dashboard", "admin", rest @ ..] => Route::AdminDashboard(rest.join("/")),
            _ => Route::NotFound,
        }
    }

    /// Whether this route renders inside a role dashboard shell.
    pub fn is_shell(&self) -> bool {
        matches!(
            self,
            Route::UserDashboard(_) | Route::ChefDashboard(_) | Route::AdminDashboard(_)
        )
    }
}
