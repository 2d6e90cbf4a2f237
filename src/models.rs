use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MenuItem {
    pub id: Uuid,
    pub name: String,
    pub name_fr: Option<String>,
    pub description: Option<String>,
    pub description_fr: Option<String>,
    pub price: f64,
    pub category: String,
    pub category_fr: Option<String>,
    pub image: Option<String>,
    pub available: bool,
    pub preparation_time: i32,
    pub ingredients: Vec<String>,
    pub ingredients_fr: Vec<String>,
    pub created_at: DateTime<Utc>,
}

/// Snapshot of a menu item captured at add-to-cart time. Later catalog
/// edits do not touch it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CartEntry {
    pub item_id: Uuid,
    pub name: String,
    pub price: f64,
    pub quantity: i32,
    pub image: Option<String>,
}

impl CartEntry {
    pub fn subtotal(&self) -> f64 {
        self.price * f64::from(self.quantity)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Order {
    pub id: Uuid,
    pub tracking_code: String,
    pub customer_name: String,
    pub customer_phone: Option<String>,
    pub customer_address: Option<String>,
    pub items: Vec<CartEntry>,
    pub total_amount: f64,
    /// Canonical label as stored, Arabic for every order this service writes.
    pub status: String,
    pub status_kind: OrderStatus,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Closed set of order states. Rows written before this service existed may
/// carry free-text statuses; those parse to `Unspecified` and are kept
/// verbatim in `Order::status` for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    New,
    InProgress,
    Delivered,
    Cancelled,
    Unspecified,
}

impl OrderStatus {
    pub const fn label(self) -> &'static str {
        match self {
            OrderStatus::New => "جديد",
            OrderStatus::InProgress => "قيد التحضير",
            OrderStatus::Delivered => "تم التوصيل",
            OrderStatus::Cancelled => "ملغي",
            OrderStatus::Unspecified => "غير محدد",
        }
    }

    pub fn from_label(label: &str) -> Self {
        match label {
            "جديد" => OrderStatus::New,
            "قيد التحضير" => OrderStatus::InProgress,
            "تم التوصيل" => OrderStatus::Delivered,
            "ملغي" => OrderStatus::Cancelled,
            _ => OrderStatus::Unspecified,
        }
    }

    /// Labels accepted by status updates. `Unspecified` is a read-side
    /// fallback only and cannot be assigned.
    pub fn is_assignable(label: &str) -> bool {
        Self::from_label(label) != OrderStatus::Unspecified
    }
}

/// A settings row as stored; `value`'s schema belongs to the key's consumer.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Setting {
    pub key: String,
    pub value: serde_json::Value,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_labels_round_trip() {
        for status in [
            OrderStatus::New,
            OrderStatus::InProgress,
            OrderStatus::Delivered,
            OrderStatus::Cancelled,
        ] {
            assert_eq!(OrderStatus::from_label(status.label()), status);
            assert!(OrderStatus::is_assignable(status.label()));
        }
    }

    #[test]
    fn unknown_status_falls_back_to_unspecified() {
        assert_eq!(
            OrderStatus::from_label("awaiting courier"),
            OrderStatus::Unspecified
        );
        assert!(!OrderStatus::is_assignable("awaiting courier"));
        assert!(!OrderStatus::is_assignable(OrderStatus::Unspecified.label()));
    }

    #[test]
    fn cart_entry_subtotal() {
        let entry = CartEntry {
            item_id: Uuid::new_v4(),
            name: "Couscous".into(),
            price: 45.0,
            quantity: 3,
            image: None,
        };
        assert_eq!(entry.subtotal(), 135.0);
    }
}
