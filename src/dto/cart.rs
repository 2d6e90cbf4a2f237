use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::CartEntry;

#[derive(Debug, Deserialize, ToSchema)]
pub struct AddToCartRequest {
    pub item_id: Uuid,
    pub quantity: i32,
}

/// Batch quantity edit, mirroring the quantity-per-item form post of the
/// storefront. Zero or negative removes the entry.
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateCartRequest {
    #[schema(value_type = Object)]
    pub quantities: HashMap<Uuid, i32>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CartView {
    pub items: Vec<CartEntry>,
    pub total: f64,
}
