pub mod auth_client;
pub mod gateway;
pub mod marketplace;

pub use auth_client::{AuthBackend, AuthClient};
pub use gateway::{ApiGateway, AuthFailureSink};
pub use marketplace::{MarketplaceApi, ProfileRefresh, RefreshError};
