use axum::{
    Json, Router,
    extract::{Multipart, Path, Query, State},
    routing::{get, patch, post, put},
};
use uuid::Uuid;

use crate::{
    dto::{
        menu::{AvailabilityResponse, CreateMenuItemRequest, MenuItemList, UpdateMenuItemRequest},
        orders::{OrderList, OrderStats, UpdateOrderStatusRequest},
        settings::{AppSettings, RestaurantInfo, SettingsMap, UpdateCredentialsRequest},
    },
    error::{AppError, AppResult},
    middleware::auth::AdminSession,
    models::{MenuItem, Order},
    response::ApiResponse,
    routes::params::OrderListQuery,
    services::{menu_service, order_service, settings_service},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/orders", get(list_all_orders))
        .route("/orders/{id}/status", patch(update_order_status))
        .route("/stats", get(order_stats))
        .route("/menu", get(list_menu_admin).post(create_menu_item))
        .route("/menu/{id}", put(update_menu_item).delete(delete_menu_item))
        .route("/menu/{id}/availability", post(toggle_availability))
        .route("/menu/{id}/image", post(upload_menu_image))
        .route("/settings", get(get_settings))
        .route("/settings/restaurant-info", put(update_restaurant_info))
        .route("/settings/credentials", put(update_admin_credentials))
        .route("/settings/app", put(update_app_settings))
}

#[utoipa::path(
    get,
    path = "/api/admin/orders",
    params(
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("per_page" = Option<i64>, Query, description = "Items per page, default 20"),
        ("status" = Option<String>, Query, description = "Filter by status label"),
        ("sort_order" = Option<String>, Query, description = "Sort order: asc, desc")
    ),
    responses(
        (status = 200, description = "All orders, newest first", body = ApiResponse<OrderList>),
        (status = 401, description = "Unauthorized"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn list_all_orders(
    State(state): State<AppState>,
    _admin: AdminSession,
    Query(query): Query<OrderListQuery>,
) -> AppResult<Json<ApiResponse<OrderList>>> {
    let resp = order_service::list_all(&state, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    patch,
    path = "/api/admin/orders/{id}/status",
    params(
        ("id" = Uuid, Path, description = "Order ID")
    ),
    request_body = UpdateOrderStatusRequest,
    responses(
        (status = 200, description = "Status updated", body = ApiResponse<Order>),
        (status = 400, description = "Unknown status label"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Order not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn update_order_status(
    State(state): State<AppState>,
    _admin: AdminSession,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateOrderStatusRequest>,
) -> AppResult<Json<ApiResponse<Order>>> {
    let resp = order_service::set_status(&state, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/admin/stats",
    responses(
        (status = 200, description = "Order counters", body = ApiResponse<OrderStats>),
        (status = 401, description = "Unauthorized"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn order_stats(
    State(state): State<AppState>,
    _admin: AdminSession,
) -> AppResult<Json<ApiResponse<OrderStats>>> {
    let resp = order_service::stats(&state).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/admin/menu",
    responses(
        (status = 200, description = "All menu items, unavailable included", body = ApiResponse<MenuItemList>),
        (status = 401, description = "Unauthorized"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn list_menu_admin(
    State(state): State<AppState>,
    _admin: AdminSession,
) -> AppResult<Json<ApiResponse<MenuItemList>>> {
    let resp = menu_service::list_all(&state).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/admin/menu",
    request_body = CreateMenuItemRequest,
    responses(
        (status = 200, description = "Menu item created", body = ApiResponse<MenuItem>),
        (status = 400, description = "Missing or invalid fields"),
        (status = 401, description = "Unauthorized"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn create_menu_item(
    State(state): State<AppState>,
    _admin: AdminSession,
    Json(payload): Json<CreateMenuItemRequest>,
) -> AppResult<Json<ApiResponse<MenuItem>>> {
    let resp = menu_service::create_item(&state, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/admin/menu/{id}",
    params(
        ("id" = Uuid, Path, description = "Menu item ID")
    ),
    request_body = UpdateMenuItemRequest,
    responses(
        (status = 200, description = "Menu item updated", body = ApiResponse<MenuItem>),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Menu item not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn update_menu_item(
    State(state): State<AppState>,
    _admin: AdminSession,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateMenuItemRequest>,
) -> AppResult<Json<ApiResponse<MenuItem>>> {
    let resp = menu_service::update_item(&state, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/admin/menu/{id}",
    params(
        ("id" = Uuid, Path, description = "Menu item ID")
    ),
    responses(
        (status = 200, description = "Menu item deleted"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Menu item not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn delete_menu_item(
    State(state): State<AppState>,
    _admin: AdminSession,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = menu_service::delete_item(&state, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/admin/menu/{id}/availability",
    params(
        ("id" = Uuid, Path, description = "Menu item ID")
    ),
    responses(
        (status = 200, description = "Availability flipped", body = ApiResponse<AvailabilityResponse>),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Menu item not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn toggle_availability(
    State(state): State<AppState>,
    _admin: AdminSession,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<AvailabilityResponse>>> {
    let resp = menu_service::toggle_availability(&state, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/admin/menu/{id}/image",
    params(
        ("id" = Uuid, Path, description = "Menu item ID")
    ),
    request_body(content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Image stored and attached", body = ApiResponse<MenuItem>),
        (status = 400, description = "Missing file or disallowed extension"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Menu item not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn upload_menu_image(
    State(state): State<AppState>,
    _admin: AdminSession,
    Path(id): Path<Uuid>,
    mut multipart: Multipart,
) -> AppResult<Json<ApiResponse<MenuItem>>> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(e.to_string()))?
    {
        if field.name() != Some("image") {
            continue;
        }
        let filename = field
            .file_name()
            .map(str::to_string)
            .ok_or_else(|| AppError::Validation("image field has no filename".to_string()))?;
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(e.to_string()))?;

        let resp = menu_service::attach_image(&state, id, &filename, &bytes).await?;
        return Ok(Json(resp));
    }

    Err(AppError::Validation("missing image field".to_string()))
}

#[utoipa::path(
    get,
    path = "/api/admin/settings",
    responses(
        (status = 200, description = "Every settings group", body = ApiResponse<SettingsMap>),
        (status = 401, description = "Unauthorized"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn get_settings(
    State(state): State<AppState>,
    _admin: AdminSession,
) -> AppResult<Json<ApiResponse<SettingsMap>>> {
    let resp = settings_service::get_all(&state.pool).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/admin/settings/restaurant-info",
    request_body = RestaurantInfo,
    responses(
        (status = 200, description = "Restaurant info updated", body = ApiResponse<RestaurantInfo>),
        (status = 401, description = "Unauthorized"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn update_restaurant_info(
    State(state): State<AppState>,
    _admin: AdminSession,
    Json(payload): Json<RestaurantInfo>,
) -> AppResult<Json<ApiResponse<RestaurantInfo>>> {
    let resp = settings_service::update_restaurant_info(&state.pool, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/admin/settings/credentials",
    request_body = UpdateCredentialsRequest,
    responses(
        (status = 200, description = "Credentials rotated"),
        (status = 400, description = "Wrong current password or mismatched confirmation"),
        (status = 401, description = "Unauthorized"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn update_admin_credentials(
    State(state): State<AppState>,
    _admin: AdminSession,
    Json(payload): Json<UpdateCredentialsRequest>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = settings_service::update_admin_credentials(&state.pool, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/admin/settings/app",
    request_body = AppSettings,
    responses(
        (status = 200, description = "App settings updated", body = ApiResponse<AppSettings>),
        (status = 400, description = "Negative pricing parameter"),
        (status = 401, description = "Unauthorized"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn update_app_settings(
    State(state): State<AppState>,
    _admin: AdminSession,
    Json(payload): Json<AppSettings>,
) -> AppResult<Json<ApiResponse<AppSettings>>> {
    let resp = settings_service::update_app_settings(&state.pool, payload).await?;
    Ok(Json(resp))
}
