use crate::handlers::app::LoadingTemplate;
use crate::routing::{Access, GuardDecision, Route, RouteGuard};
use crate::AppState;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use metrics::counter;

/// Runs the route guard in front of every page.
pub async fn route_guard_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let route = Route::parse(request.uri().path());
    let access = Access::for_route(&route);
    let requested = request
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| request.uri().path().to_string());

    let decision = RouteGuard::decide(&state.session.current(), access, &requested);
    counter!("route_guard_decisions_total", "decision" => decision.label()).increment(1);

    match route {
        Route::Health | Route::Metrics => {}
        ref shell if shell.is_shell() => {
            state.shells.reconcile(&decision);
        }
        _ => {
            if matches!(decision, GuardDecision::Allow { .. }) {
                state.shells.leave();
            }
        }
    }

    match decision {
        GuardDecision::Pending => LoadingTemplate { user: None }.into_response(),
        GuardDecision::Redirect { target, reason } => {
            tracing::debug!(
                path = %requested,
                to = %target.to_uri(),
                reason = reason.as_str(),
                "Route guard redirect"
            );
            Redirect::to(&target.to_uri()).into_response()
        }
        GuardDecision::Allow { .. } => next.run(request).await,
    }
}
