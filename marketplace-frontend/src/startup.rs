use axum::{
    middleware::{from_fn, from_fn_with_state},
    routing::get,
    Router,
};
use marketplace_core::middleware::{
    metrics::metrics_middleware, security_headers::security_headers_middleware,
    tracing::request_id_middleware,
};
use tower_http::trace::TraceLayer;

use crate::handlers::{
    app::{health_check, index, not_found},
    auth::{login_handler, login_page, logout_handler, register_handler, register_page},
    dashboard::{create_meal, dashboard_handler, profile_action, shell_page},
    meals::{meal_details, meals_page, order_page, place_order},
    metrics::metrics,
};
use crate::middleware::guard::route_guard_middleware;
use crate::shells::{AdminShell, ChefShell, UserShell};
use crate::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/health", get(health_check))
        .route("/metrics", get(metrics))
        .route("/meals", get(meals_page))
        .route("/meals/:id", get(meal_details))
        .route("/order/:id", get(order_page).post(place_order))
        .route("/login", get(login_page).post(login_handler))
        .route("/register", get(register_page).post(register_handler))
        .route("/logout", get(logout_handler).post(logout_handler))
        .route("/dashboard", get(dashboard_handler))
        // Role shells
        .route(
            "/dashboard/user",
            get(shell_page::<UserShell>).post(profile_action::<UserShell>),
        )
        .route("/dashboard/user/*rest", get(shell_page::<UserShell>))
        .route(
            "/dashboard/chef",
            get(shell_page::<ChefShell>).post(profile_action::<ChefShell>),
        )
        .route(
            "/dashboard/chef/*rest",
            get(shell_page::<ChefShell>).post(create_meal::<ChefShell>),
        )
        .route(
            "/dashboard/admin",
            get(shell_page::<AdminShell>).post(profile_action::<AdminShell>),
        )
        .route("/dashboard/admin/*rest", get(shell_page::<AdminShell>))
        .fallback(not_found)
        .layer(from_fn_with_state(state.clone(), route_guard_middleware))
        .layer(from_fn(security_headers_middleware))
        .layer(from_fn(metrics_middleware))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                let request_id = request
                    .headers()
                    .get("x-request-id")
                    .and_then(|value| value.to_str().ok())
                    .unwrap_or("-");

                tracing::info_span!(
                    "http_request",
                    request_id = %request_id,
                    method = %request.method(),
                    uri = %request.uri(),
                    version = ?request.version(),
                )
            }),
        )
        .layer(from_fn(request_id_middleware))
        .with_state(state)
}
