use super::app::LoadingTemplate;
use super::PageError;
use crate::models::marketplace::rows_from_json;
use crate::models::{Identity, NewMeal, Role, Row};
use crate::routing::{dispatch, Dispatch, Location};
use crate::services::ProfileRefresh;
use crate::shells::{DashboardShell, NavItem, PageKind};
use crate::AppState;
use askama::Template;
use axum::{
    extract::{Path, State},
    http::{StatusCode, Uri},
    response::{IntoResponse, Redirect, Response},
    Form,
};
use serde::Deserialize;

/// Which body a shell page renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellView {
    Profile,
    Listing,
    CreateMeal,
    NotFound,
}

#[derive(Template)]
#[template(path = "dashboard.html")]
pub struct DashboardTemplate {
    pub user: Option<Identity>,
    pub identity: Identity,
    pub shell_title: &'static str,
    pub shell_root: &'static str,
    pub page_title: &'static str,
    pub nav: Vec<NavItem>,
    pub view: ShellView,
    pub requestable: Vec<Role>,
    pub rows: Vec<Row>,
    pub notice: Option<String>,
}

#[derive(Deserialize)]
pub struct ProfileAction {
    pub action: String,
    #[serde(default)]
    pub role: Option<String>,
}

#[derive(Deserialize)]
pub struct MealForm {
    pub food_name: String,
    pub food_image: String,
    pub price: f64,
    /// Comma separated.
    pub ingredients: String,
    pub estimated_delivery_time: String,
}

/// `/dashboard`: send the identity to its own shell.
pub async fn dashboard_handler(State(state): State<AppState>) -> Response {
    match dispatch(&state.session.current()) {
        Dispatch::Pending => LoadingTemplate { user: None }.into_response(),
        Dispatch::Redirect(target) => Redirect::to(&target.to_uri()).into_response(),
    }
}

fn sub_path(rest: Option<Path<String>>) -> String {
    rest.map(|Path(rest)| rest.trim_matches('/').to_string())
        .unwrap_or_default()
}

/// Identity for a shell render, read fresh from the session. The guard ran
/// before the handler, but the session may have been torn down since.
fn shell_identity(state: &AppState, uri: &Uri) -> Result<Identity, Response> {
    state
        .session
        .current()
        .identity()
        .cloned()
        .ok_or_else(|| Redirect::to(&Location::login_from(uri.path()).to_uri()).into_response())
}

/// Roles a profile may ask to be promoted to.
fn requestable_roles(identity: &Identity) -> Vec<Role> {
    Role::ALL
        .into_iter()
        .filter(|role| *role != identity.role && *role != Role::User)
        .collect()
}

async fn render_shell<S: DashboardShell>(
    state: &AppState,
    identity: Identity,
    slug: &str,
    mut notice: Option<String>,
) -> Result<Response, PageError> {
    let Some(page) = S::page(slug) else {
        let template = DashboardTemplate {
            user: Some(identity.clone()),
            identity,
            shell_title: S::TITLE,
            shell_root: S::root(),
            page_title: "Not found",
            nav: S::nav(slug),
            view: ShellView::NotFound,
            requestable: Vec::new(),
            rows: Vec::new(),
            notice,
        };
        return Ok((StatusCode::NOT_FOUND, template).into_response());
    };

    let mut requestable = Vec::new();
    let mut rows = Vec::new();
    let view = match page.kind {
        PageKind::Profile => {
            requestable = requestable_roles(&identity);
            ShellView::Profile
        }
        PageKind::CreateMeal => ShellView::CreateMeal,
        PageKind::Listing(endpoint) => {
            let key = S::href(page);
            rows = match (state.shells.cached(&key), endpoint(&identity)) {
                (Some(rows), _) => rows,
                (None, None) => {
                    notice.get_or_insert_with(|| {
                        "Nothing to show for this account yet.".to_string()
                    });
                    Vec::new()
                }
                (None, Some(path)) => {
                    let generation = state.shells.generation();
                    let payload = state.api.listing(&path).await?;
                    let loaded = rows_from_json(&payload);
                    state.shells.remember(generation, &key, loaded.clone());
                    loaded
                }
            };
            ShellView::Listing
        }
    };

    Ok(DashboardTemplate {
        user: Some(identity.clone()),
        identity,
        shell_title: S::TITLE,
        shell_root: S::root(),
        page_title: page.title,
        nav: S::nav(slug),
        view,
        requestable,
        rows,
        notice,
    }
    .into_response())
}

pub async fn shell_page<S: DashboardShell>(
    State(state): State<AppState>,
    uri: Uri,
    rest: Option<Path<String>>,
) -> Result<Response, PageError> {
    let identity = match shell_identity(&state, &uri) {
        Ok(identity) => identity,
        Err(redirect) => return Ok(redirect),
    };

    render_shell::<S>(&state, identity, &sub_path(rest), None).await
}

pub async fn profile_action<S: DashboardShell>(
    State(state): State<AppState>,
    uri: Uri,
    Form(form): Form<ProfileAction>,
) -> Result<Response, PageError> {
    let identity = match shell_identity(&state, &uri) {
        Ok(identity) => identity,
        Err(redirect) => return Ok(redirect),
    };

    match form.action.as_str() {
        "refresh" => match state.api.refresh_profile().await? {
            ProfileRefresh::Updated(updated) if updated.role != identity.role => {
                // The identity now belongs to another shell.
                Ok(Redirect::to(crate::routing::dispatcher::DASHBOARD_PATH).into_response())
            }
            ProfileRefresh::Updated(updated) => {
                render_shell::<S>(&state, updated, "", Some("Profile refreshed.".to_string())).await
            }
            ProfileRefresh::Discarded => Ok(Redirect::to(&Location::home().to_uri()).into_response()),
        },
        "request-role" => {
            let Some(role) = form
                .role
                .as_deref()
                .and_then(|role| role.parse::<Role>().ok())
                .filter(|role| requestable_roles(&identity).contains(role))
            else {
                return Err(PageError::failed(
                    StatusCode::UNPROCESSABLE_ENTITY,
                    "That role cannot be requested.",
                ));
            };

            state.api.request_role(&identity, role).await?;
            tracing::info!(email = %identity.email, requested = %role, "Role requested");
            render_shell::<S>(
                &state,
                identity,
                "",
                Some(format!("Your request to become {} was sent.", role)),
            )
            .await
        }
        other => Err(PageError::failed(
            StatusCode::BAD_REQUEST,
            format!("Unknown action: {}", other),
        )),
    }
}

/// Form posts to nested shell pages. Only create-meal pages accept one.
pub async fn create_meal<S: DashboardShell>(
    State(state): State<AppState>,
    uri: Uri,
    Path(rest): Path<String>,
    Form(form): Form<MealForm>,
) -> Result<Response, PageError> {
    let identity = match shell_identity(&state, &uri) {
        Ok(identity) => identity,
        Err(redirect) => return Ok(redirect),
    };
    let slug = rest.trim_matches('/');
    if !S::page(slug).is_some_and(|page| matches!(page.kind, PageKind::CreateMeal)) {
        return Err(PageError::failed(
            StatusCode::METHOD_NOT_ALLOWED,
            "This page does not accept submissions.",
        ));
    }
    if identity.is_fraud() {
        return Err(PageError::failed(
            StatusCode::FORBIDDEN,
            "This account has been flagged and cannot create meals.",
        ));
    }

    let meal = NewMeal {
        food_name: form.food_name,
        chef_name: identity.name.clone(),
        chef_id: identity.chef_id.clone(),
        user_email: identity.email.clone(),
        food_image: form.food_image,
        price: form.price,
        ingredients: form
            .ingredients
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect(),
        estimated_delivery_time: form.estimated_delivery_time,
    };

    state.api.create_meal(&meal).await?;
    state.shells.forget(&format!("{}/my-meals", S::root()));
    tracing::info!(email = %identity.email, meal = %meal.food_name, "Meal created");

    render_shell::<S>(
        &state,
        identity,
        slug,
        Some(format!("{} was added to your menu.", meal.food_name)),
    )
    .await
}
