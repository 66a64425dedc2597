use super::PageError;
use crate::models::{Identity, Meal, NewOrder};
use crate::AppState;
use askama::Template;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Form,
};
use serde::Deserialize;

#[derive(Template)]
#[template(path = "meals.html")]
pub struct MealsTemplate {
    pub user: Option<Identity>,
    pub meals: Vec<Meal>,
}

#[derive(Template)]
#[template(path = "meal_detail.html")]
pub struct MealDetailTemplate {
    pub user: Option<Identity>,
    pub meal: Meal,
}

#[derive(Template)]
#[template(path = "order.html")]
pub struct OrderTemplate {
    pub user: Option<Identity>,
    pub meal: Meal,
    pub message: Option<String>,
}

#[derive(Deserialize)]
pub struct OrderForm {
    pub quantity: u32,
    pub address: String,
}

fn signed_in(state: &AppState) -> Result<Identity, PageError> {
    state
        .session
        .current()
        .identity()
        .cloned()
        .ok_or(PageError::LoginRequired)
}

pub async fn meals_page(State(state): State<AppState>) -> Result<impl IntoResponse, PageError> {
    let meals = state.api.meals().await?;

    Ok(MealsTemplate {
        user: state.session.current().identity().cloned(),
        meals,
    })
}

pub async fn meal_details(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, PageError> {
    let meal = state.api.meal(&id).await?;

    Ok(MealDetailTemplate {
        user: Some(signed_in(&state)?),
        meal,
    })
}

pub async fn order_page(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, PageError> {
    let meal = state.api.meal(&id).await?;

    Ok(OrderTemplate {
        user: Some(signed_in(&state)?),
        meal,
        message: None,
    })
}

pub async fn place_order(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Form(form): Form<OrderForm>,
) -> Result<impl IntoResponse, PageError> {
    let identity = signed_in(&state)?;
    if identity.is_fraud() {
        return Err(PageError::failed(
            StatusCode::FORBIDDEN,
            "This account has been flagged and cannot place orders.",
        ));
    }
    if form.quantity == 0 || form.address.trim().is_empty() {
        return Err(PageError::failed(
            StatusCode::UNPROCESSABLE_ENTITY,
            "Quantity and delivery address are required.",
        ));
    }

    let meal = state.api.meal(&id).await?;
    let order = NewOrder::for_meal(&meal, &identity, form.quantity, form.address);
    state.api.place_order(&order).await?;

    tracing::info!(
        email = %identity.email,
        meal_id = %meal.id,
        quantity = order.quantity,
        "Order placed"
    );

    Ok(OrderTemplate {
        user: Some(identity),
        message: Some(format!(
            "Order placed: {} x {} for {:.2}. Payment is pending.",
            order.quantity, meal.food_name, order.price
        )),
        meal,
    })
}
