//! marketplace-core: shared infrastructure for the marketplace frontend.
pub mod config;
pub mod error;
pub mod middleware;
pub mod observability;
