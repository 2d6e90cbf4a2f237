use axum::{
    Json, Router,
    extract::State,
    routing::{get, post},
};

use crate::{
    dto::cart::{AddToCartRequest, CartView, UpdateCartRequest},
    error::AppResult,
    middleware::session::SessionId,
    response::ApiResponse,
    services::cart_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(view_cart).put(update_cart))
        .route("/items", post(add_to_cart))
}

#[utoipa::path(
    get,
    path = "/api/cart",
    params(
        ("x-session-id" = String, Header, description = "Client session id")
    ),
    responses(
        (status = 200, description = "Cart contents and total", body = ApiResponse<CartView>),
        (status = 400, description = "Missing session id"),
    ),
    tag = "Cart"
)]
pub async fn view_cart(
    State(state): State<AppState>,
    session: SessionId,
) -> AppResult<Json<ApiResponse<CartView>>> {
    let resp = cart_service::view(&state, &session.0).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/cart/items",
    params(
        ("x-session-id" = String, Header, description = "Client session id")
    ),
    request_body = AddToCartRequest,
    responses(
        (status = 200, description = "Item added", body = ApiResponse<CartView>),
        (status = 400, description = "Invalid quantity"),
        (status = 404, description = "Menu item not found"),
    ),
    tag = "Cart"
)]
pub async fn add_to_cart(
    State(state): State<AppState>,
    session: SessionId,
    Json(payload): Json<AddToCartRequest>,
) -> AppResult<Json<ApiResponse<CartView>>> {
    let resp = cart_service::add(&state, &session.0, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/cart",
    params(
        ("x-session-id" = String, Header, description = "Client session id")
    ),
    request_body = UpdateCartRequest,
    responses(
        (status = 200, description = "Cart updated", body = ApiResponse<CartView>),
    ),
    tag = "Cart"
)]
pub async fn update_cart(
    State(state): State<AppState>,
    session: SessionId,
    Json(payload): Json<UpdateCartRequest>,
) -> AppResult<Json<ApiResponse<CartView>>> {
    let resp = cart_service::update(&state, &session.0, payload).await?;
    Ok(Json(resp))
}
