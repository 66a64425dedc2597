//! Payloads exchanged with the marketplace REST endpoints.
//!
//! Only the fields the pages render are modelled; everything else the backend
//! sends is ignored.

use super::identity::{Identity, Role};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Meal {
    #[serde(rename = "_id")]
    pub id: String,
    pub food_name: String,
    #[serde(default)]
    pub chef_name: String,
    #[serde(default)]
    pub chef_id: Option<String>,
    #[serde(default)]
    pub food_image: Option<String>,
    pub price: f64,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub ingredients: Vec<String>,
    #[serde(default)]
    pub estimated_delivery_time: Option<String>,
    #[serde(default)]
    pub delivery_area: Option<String>,
}

/// Order placed from `/order/:id`. Payment happens outside this app, so new
/// orders always start unpaid.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewOrder {
    pub food_id: String,
    pub meal_name: String,
    pub price: f64,
    pub quantity: u32,
    pub chef_id: Option<String>,
    pub user_email: String,
    pub user_address: String,
    pub order_status: String,
    pub payment_status: String,
}

impl NewOrder {
    pub fn for_meal(meal: &Meal, identity: &Identity, quantity: u32, address: String) -> Self {
        Self {
            food_id: meal.id.clone(),
            meal_name: meal.food_name.clone(),
            price: meal.price * f64::from(quantity),
            quantity,
            chef_id: meal.chef_id.clone(),
            user_email: identity.email.clone(),
            user_address: address,
            order_status: "pending".to_string(),
            payment_status: "pending".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewMeal {
    pub food_name: String,
    pub chef_name: String,
    pub chef_id: Option<String>,
    pub user_email: String,
    pub food_image: String,
    pub price: f64,
    pub ingredients: Vec<String>,
    pub estimated_delivery_time: String,
}

/// A user's request to be promoted to another role; an admin decides it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleRequest {
    pub user_name: String,
    pub user_email: String,
    pub request_type: Role,
    pub request_status: String,
}

impl RoleRequest {
    pub fn new(identity: &Identity, request_type: Role) -> Self {
        Self {
            user_name: identity.name.clone(),
            user_email: identity.email.clone(),
            request_type,
            request_status: "pending".to_string(),
        }
    }
}

/// One record of a listing page, flattened to display strings.
pub type Row = Vec<(String, String)>;

/// Flatten a listing payload (array of objects, or a single object) into rows.
pub fn rows_from_json(value: &Value) -> Vec<Row> {
    match value {
        Value::Array(items) => items.iter().map(row_from_json).collect(),
        Value::Null => Vec::new(),
        other => vec![row_from_json(other)],
    }
}

fn row_from_json(value: &Value) -> Row {
    match value {
        Value::Object(fields) => fields
            .iter()
            .filter(|(key, _)| key.as_str() != "_id" && key.as_str() != "password")
            .map(|(key, field)| (key.clone(), display_value(field)))
            .collect(),
        other => vec![("value".to_string(), display_value(other))],
    }
}

fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        Value::Array(items) => items
            .iter()
            .map(display_value)
            .collect::<Vec<_>>()
            .join(", "),
        other => other.to_string(),
    }
}
