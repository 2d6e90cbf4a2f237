use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::MenuItem;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateMenuItemRequest {
    pub name: String,
    pub name_fr: Option<String>,
    pub description: String,
    pub description_fr: Option<String>,
    pub price: f64,
    pub category: String,
    pub category_fr: Option<String>,
    pub preparation_time: Option<i32>,
    pub ingredients: Option<Vec<String>>,
    pub ingredients_fr: Option<Vec<String>>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateMenuItemRequest {
    pub name: Option<String>,
    pub name_fr: Option<String>,
    pub description: Option<String>,
    pub description_fr: Option<String>,
    pub price: Option<f64>,
    pub category: Option<String>,
    pub category_fr: Option<String>,
    pub preparation_time: Option<i32>,
    pub ingredients: Option<Vec<String>>,
    pub ingredients_fr: Option<Vec<String>>,
    pub available: Option<bool>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MenuItemList {
    pub items: Vec<MenuItem>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CategoryList {
    pub categories: Vec<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AvailabilityResponse {
    pub available: bool,
}
