use sea_orm::EntityTrait;

use crate::{
    dto::cart::{AddToCartRequest, CartView, UpdateCartRequest},
    entity::MenuItems,
    error::{AppError, AppResult},
    models::CartEntry,
    response::ApiResponse,
    state::AppState,
};

pub async fn view(state: &AppState, session: &str) -> AppResult<ApiResponse<CartView>> {
    let cart = state.carts.snapshot(session).await;
    let total = cart.total();
    Ok(ApiResponse::success(
        "Cart",
        CartView {
            items: cart.into_entries(),
            total,
        },
    ))
}

/// Add a quantity of one menu item. The entry snapshots the item's current
/// name, price and image; later catalog edits leave the cart untouched.
pub async fn add(
    state: &AppState,
    session: &str,
    payload: AddToCartRequest,
) -> AppResult<ApiResponse<CartView>> {
    if payload.quantity <= 0 {
        return Err(AppError::Validation(
            "quantity must be greater than 0".to_string(),
        ));
    }

    let item = MenuItems::find_by_id(payload.item_id)
        .one(&*state.orm)
        .await?;
    let item = match item {
        Some(i) => i,
        None => return Err(AppError::NotFound),
    };

    let entry = CartEntry {
        item_id: item.id,
        name: item.name,
        price: item.price,
        quantity: payload.quantity,
        image: item.image,
    };

    let (items, total) = state
        .carts
        .with(session, |cart| {
            cart.add(entry);
            (cart.entries().to_vec(), cart.total())
        })
        .await;

    Ok(ApiResponse::success(
        "Added to cart",
        CartView { items, total },
    ))
}

/// Batch quantity update; non-positive quantities remove entries.
pub async fn update(
    state: &AppState,
    session: &str,
    payload: UpdateCartRequest,
) -> AppResult<ApiResponse<CartView>> {
    let (items, total) = state
        .carts
        .with(session, |cart| {
            cart.update(&payload.quantities);
            (cart.entries().to_vec(), cart.total())
        })
        .await;

    Ok(ApiResponse::success(
        "Cart updated",
        CartView { items, total },
    ))
}
