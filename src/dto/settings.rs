use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

fn default_open() -> String {
    "09:00".to_string()
}

fn default_close() -> String {
    "22:00".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DayHours {
    #[serde(default = "default_open")]
    pub open: String,
    #[serde(default = "default_close")]
    pub close: String,
    #[serde(default)]
    pub closed: bool,
}

impl Default for DayHours {
    fn default() -> Self {
        Self {
            open: default_open(),
            close: default_close(),
            closed: false,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct WorkingHours {
    #[serde(default)]
    pub monday: DayHours,
    #[serde(default)]
    pub tuesday: DayHours,
    #[serde(default)]
    pub wednesday: DayHours,
    #[serde(default)]
    pub thursday: DayHours,
    #[serde(default)]
    pub friday: DayHours,
    #[serde(default)]
    pub saturday: DayHours,
    #[serde(default)]
    pub sunday: DayHours,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct SocialLinks {
    #[serde(default)]
    pub facebook: String,
    #[serde(default)]
    pub instagram: String,
    #[serde(default)]
    pub twitter: String,
}

/// The "restaurant_info" settings group.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct RestaurantInfo {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub name_fr: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub location_fr: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub address_fr: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub working_hours: WorkingHours,
    #[serde(default)]
    pub social_media: SocialLinks,
}

/// The "admin_credentials" settings group. Stored and compared in plaintext,
/// exactly like the system this replaces. Known weakness, kept on purpose.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AdminCredentials {
    pub username: String,
    pub password: String,
}

impl Default for AdminCredentials {
    fn default() -> Self {
        Self {
            username: "admin".to_string(),
            password: "admin".to_string(),
        }
    }
}

/// The "app_settings" group: app-wide pricing parameters.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AppSettings {
    pub currency: String,
    pub currency_fr: String,
    #[serde(default)]
    pub tax_rate: f64,
    #[serde(default)]
    pub delivery_fee: f64,
    #[serde(default)]
    pub min_order_amount: f64,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            currency: "د.م".to_string(),
            currency_fr: "MAD".to_string(),
            tax_rate: 0.0,
            delivery_fee: 0.0,
            min_order_amount: 0.0,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateCredentialsRequest {
    pub current_password: String,
    pub new_username: String,
    pub new_password: String,
    pub confirm_password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SettingsMap {
    #[schema(value_type = Object)]
    pub settings: HashMap<String, serde_json::Value>,
}
