use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post},
};

use crate::{
    dto::orders::PlaceOrderRequest,
    error::AppResult,
    middleware::session::SessionId,
    models::Order,
    response::ApiResponse,
    services::order_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(place_order))
        .route("/track/{code}", get(track_order))
}

#[utoipa::path(
    post,
    path = "/api/orders",
    params(
        ("x-session-id" = String, Header, description = "Client session id")
    ),
    request_body = PlaceOrderRequest,
    responses(
        (status = 200, description = "Order placed", body = ApiResponse<Order>),
        (status = 400, description = "Empty cart or missing customer name"),
    ),
    tag = "Orders"
)]
pub async fn place_order(
    State(state): State<AppState>,
    session: SessionId,
    Json(payload): Json<PlaceOrderRequest>,
) -> AppResult<Json<ApiResponse<Order>>> {
    let resp = order_service::place(&state, &session.0, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/orders/track/{code}",
    params(
        ("code" = String, Path, description = "Tracking code from the order confirmation")
    ),
    responses(
        (status = 200, description = "Order status", body = ApiResponse<Order>),
        (status = 404, description = "Unknown tracking code"),
    ),
    tag = "Orders"
)]
pub async fn track_order(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> AppResult<Json<ApiResponse<Order>>> {
    let resp = order_service::track(&state, &code).await?;
    Ok(Json(resp))
}
