pub mod auth;
pub mod identity;
pub mod marketplace;

pub use auth::{AuthResponse, BackendMessage, LoginRequest, RegisterRequest};
pub use identity::{Identity, Role, UnknownRole, UserStatus};
pub use marketplace::{Meal, NewMeal, NewOrder, RoleRequest, Row};
