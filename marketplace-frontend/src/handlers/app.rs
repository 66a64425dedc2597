use crate::models::{Identity, Meal};
use crate::AppState;
use askama::Template;
use axum::{extract::State, http::StatusCode, response::IntoResponse};

#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub user: Option<Identity>,
    pub meals: Vec<Meal>,
}

#[derive(Template)]
#[template(path = "loading.html")]
pub struct LoadingTemplate {
    pub user: Option<Identity>,
}

#[derive(Template)]
#[template(path = "error.html")]
pub struct ErrorTemplate {
    pub user: Option<Identity>,
    pub status: u16,
    pub message: String,
}

const FEATURED_MEALS: usize = 6;

pub async fn index(State(state): State<AppState>) -> impl IntoResponse {
    // The home page still renders when the catalogue is unavailable.
    let meals = match state.api.meals().await {
        Ok(meals) => meals.into_iter().take(FEATURED_MEALS).collect(),
        Err(e) => {
            tracing::warn!(error = %e, "Failed to load featured meals");
            Vec::new()
        }
    };

    IndexTemplate {
        user: state.session.current().identity().cloned(),
        meals,
    }
}

pub async fn health_check() -> &'static str {
    "OK"
}

pub async fn not_found(State(state): State<AppState>) -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        ErrorTemplate {
            user: state.session.current().identity().cloned(),
            status: StatusCode::NOT_FOUND.as_u16(),
            message: "This page does not exist.".to_string(),
        },
    )
}
