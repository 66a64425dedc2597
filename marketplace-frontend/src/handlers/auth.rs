use crate::errors::SessionError;
use crate::models::{Identity, RegisterRequest};
use crate::routing::{resume_path, HOME_PATH};
use crate::AppState;
use askama::Template;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    Form,
};
use serde::Deserialize;

#[derive(Template)]
#[template(path = "login.html")]
pub struct LoginTemplate {
    pub user: Option<Identity>,
    pub from: String,
    pub error: Option<String>,
}

#[derive(Template)]
#[template(path = "register.html")]
pub struct RegisterTemplate {
    pub user: Option<Identity>,
    pub error: Option<String>,
}

#[derive(Deserialize)]
pub struct LoginQuery {
    pub from: Option<String>,
}

#[derive(Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub from: Option<String>,
}

#[derive(Deserialize)]
pub struct RegisterForm {
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    #[serde(default)]
    pub profile_image: String,
    #[serde(default)]
    pub address: String,
}

const MIN_PASSWORD_LEN: usize = 6;

fn login_form(from: String, error: Option<String>) -> LoginTemplate {
    LoginTemplate {
        user: None,
        from,
        error,
    }
}

fn register_form(error: Option<String>) -> RegisterTemplate {
    RegisterTemplate { user: None, error }
}

pub async fn login_page(
    State(state): State<AppState>,
    Query(query): Query<LoginQuery>,
) -> Response {
    if state.session.current().identity().is_some() {
        return Redirect::to(resume_path(query.from.as_deref())).into_response();
    }

    login_form(query.from.unwrap_or_default(), None).into_response()
}

pub async fn login_handler(
    State(state): State<AppState>,
    Form(payload): Form<LoginForm>,
) -> Response {
    let from = payload.from.unwrap_or_default();

    match state.session.login(&payload.email, &payload.password).await {
        Ok(_) => Redirect::to(resume_path(Some(&from))).into_response(),
        Err(SessionError::InvalidCredentials(message)) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            login_form(from, Some(message)),
        )
            .into_response(),
        Err(SessionError::Superseded) => (
            StatusCode::CONFLICT,
            login_form(from, Some("A newer sign-in replaced this one.".to_string())),
        )
            .into_response(),
        Err(e) => (
            StatusCode::BAD_GATEWAY,
            login_form(from, Some(format!("Sign-in is unavailable: {}", e))),
        )
            .into_response(),
    }
}

pub async fn register_page(State(state): State<AppState>) -> Response {
    if state.session.current().identity().is_some() {
        return Redirect::to(HOME_PATH).into_response();
    }
    register_form(None).into_response()
}

pub async fn register_handler(
    State(state): State<AppState>,
    Form(payload): Form<RegisterForm>,
) -> Response {
    if payload.password != payload.confirm_password {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            register_form(Some("Passwords do not match.".to_string())),
        )
            .into_response();
    }
    if payload.password.len() < MIN_PASSWORD_LEN {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            register_form(Some(format!(
                "Password must be at least {} characters.",
                MIN_PASSWORD_LEN
            ))),
        )
            .into_response();
    }

    let registration = RegisterRequest {
        name: payload.name,
        email: payload.email,
        password: payload.password,
        profile_image: payload.profile_image,
        address: payload.address,
    };

    match state.session.register(registration).await {
        Ok(_) => Redirect::to(HOME_PATH).into_response(),
        Err(SessionError::RegistrationFailed(message)) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            register_form(Some(message)),
        )
            .into_response(),
        Err(e) => (
            StatusCode::BAD_GATEWAY,
            register_form(Some(format!("Registration is unavailable: {}", e))),
        )
            .into_response(),
    }
}

pub async fn logout_handler(State(state): State<AppState>) -> impl IntoResponse {
    state.session.logout().await;
    Redirect::to(HOME_PATH)
}
