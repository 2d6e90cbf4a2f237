use std::collections::HashMap;

use serde_json::Value;

use crate::{
    db::DbPool,
    dto::settings::{
        AdminCredentials, AppSettings, RestaurantInfo, SettingsMap, UpdateCredentialsRequest,
    },
    error::{AppError, AppResult},
    models::Setting,
    response::ApiResponse,
};

/// Read every settings group. Values are opaque JSON here; each key's schema
/// belongs to its caller.
pub async fn get_all(pool: &DbPool) -> AppResult<ApiResponse<SettingsMap>> {
    let rows: Vec<Setting> = sqlx::query_as("SELECT key, value, updated_at FROM settings")
        .fetch_all(pool)
        .await?;

    let settings: HashMap<String, Value> = rows.into_iter().map(|s| (s.key, s.value)).collect();
    Ok(ApiResponse::success(
        "Settings",
        SettingsMap { settings },
    ))
}

/// Fetch one settings group. A missing key is not an error; callers supply
/// their own default.
pub async fn get(pool: &DbPool, key: &str) -> AppResult<Option<Value>> {
    let row: Option<(Value,)> = sqlx::query_as("SELECT value FROM settings WHERE key = $1")
        .bind(key)
        .fetch_optional(pool)
        .await?;
    Ok(row.map(|(value,)| value))
}

/// Upsert one settings group and bump its updated_at. Commits immediately.
pub async fn update(pool: &DbPool, key: &str, value: &Value) -> AppResult<()> {
    sqlx::query(
        r#"
        INSERT INTO settings (key, value) VALUES ($1, $2)
        ON CONFLICT (key) DO UPDATE SET value = EXCLUDED.value, updated_at = now()
        "#,
    )
    .bind(key)
    .bind(value)
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn admin_credentials(pool: &DbPool) -> AppResult<AdminCredentials> {
    let creds = match get(pool, "admin_credentials").await? {
        Some(value) => serde_json::from_value(value)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("bad admin_credentials row: {e}")))?,
        None => AdminCredentials::default(),
    };
    Ok(creds)
}

pub async fn update_restaurant_info(
    pool: &DbPool,
    info: RestaurantInfo,
) -> AppResult<ApiResponse<RestaurantInfo>> {
    let value = serde_json::to_value(&info)
        .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))?;
    update(pool, "restaurant_info", &value).await?;

    tracing::info!("restaurant info updated");
    Ok(ApiResponse::success(
        "Restaurant info updated",
        info,
    ))
}

pub async fn update_admin_credentials(
    pool: &DbPool,
    payload: UpdateCredentialsRequest,
) -> AppResult<ApiResponse<serde_json::Value>> {
    // Always read through to the store; no cached credentials anywhere.
    let current = admin_credentials(pool).await?;
    if payload.current_password != current.password {
        return Err(AppError::Validation(
            "current password is incorrect".to_string(),
        ));
    }
    if payload.new_password != payload.confirm_password {
        return Err(AppError::Validation(
            "new password and confirmation do not match".to_string(),
        ));
    }
    if payload.new_username.trim().is_empty() || payload.new_password.is_empty() {
        return Err(AppError::Validation(
            "username and password must not be empty".to_string(),
        ));
    }

    let creds = AdminCredentials {
        username: payload.new_username,
        password: payload.new_password,
    };
    let value = serde_json::to_value(&creds)
        .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))?;
    update(pool, "admin_credentials", &value).await?;

    tracing::info!(username = %creds.username, "admin credentials updated");
    Ok(ApiResponse::success(
        "Credentials updated",
        serde_json::json!({}),
    ))
}

pub async fn update_app_settings(
    pool: &DbPool,
    settings: AppSettings,
) -> AppResult<ApiResponse<AppSettings>> {
    if settings.tax_rate < 0.0
        || settings.delivery_fee < 0.0
        || settings.min_order_amount < 0.0
    {
        return Err(AppError::Validation(
            "tax rate, delivery fee and minimum order amount must not be negative".to_string(),
        ));
    }

    let value = serde_json::to_value(&settings)
        .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))?;
    update(pool, "app_settings", &value).await?;

    tracing::info!("app settings updated");
    Ok(ApiResponse::success(
        "App settings updated",
        settings,
    ))
}
