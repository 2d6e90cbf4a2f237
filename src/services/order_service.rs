use chrono::Utc;
use sea_orm::ActiveValue::NotSet;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, SqlErr,
};
use uuid::Uuid;

use crate::{
    dto::orders::{OrderList, OrderStats, PlaceOrderRequest, UpdateOrderStatusRequest},
    entity::orders::{ActiveModel as OrderActive, Column as OrderCol, Entity as Orders, Model as OrderModel},
    error::{AppError, AppResult},
    models::{CartEntry, Order, OrderStatus},
    response::{ApiResponse, Meta},
    routes::params::{OrderListQuery, SortOrder},
    state::AppState,
};

const TRACKING_CODE_LEN: usize = 8;
const PLACE_ATTEMPTS: usize = 3;

/// Place an order from the session cart. The cart entries are frozen into
/// the order row as a JSON snapshot and the cart is cleared only after the
/// insert committed.
pub async fn place(
    state: &AppState,
    session: &str,
    payload: PlaceOrderRequest,
) -> AppResult<ApiResponse<Order>> {
    if payload.customer_name.trim().is_empty() {
        return Err(AppError::Validation("customer name is required".to_string()));
    }

    let cart = state.carts.snapshot(session).await;
    if cart.is_empty() {
        return Err(AppError::Validation("cart is empty".to_string()));
    }

    let total_amount = cart.total();
    let items = serde_json::to_value(cart.entries())
        .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))?;

    // The uniqueness constraint is the source of truth for tracking codes;
    // a collision just means we roll a new code.
    let mut attempt = 0;
    let order = loop {
        attempt += 1;
        let active = OrderActive {
            id: Set(Uuid::new_v4()),
            tracking_code: Set(generate_tracking_code()),
            customer_name: Set(payload.customer_name.clone()),
            customer_phone: Set(payload.customer_phone.clone()),
            customer_address: Set(payload.customer_address.clone()),
            items: Set(items.clone()),
            total_amount: Set(total_amount),
            status: Set(OrderStatus::New.label().to_string()),
            notes: Set(payload.notes.clone()),
            created_at: NotSet,
            updated_at: NotSet,
        };

        match active.insert(&*state.orm).await {
            Ok(order) => break order,
            Err(err) => {
                if attempt < PLACE_ATTEMPTS
                    && matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
                {
                    tracing::warn!(attempt, "tracking code collision, retrying");
                    continue;
                }
                return Err(err.into());
            }
        }
    };

    state.carts.clear(session).await;

    tracing::info!(
        order_id = %order.id,
        tracking_code = %order.tracking_code,
        total = order.total_amount,
        "order placed"
    );
    Ok(ApiResponse::success(
        "Order placed",
        order_from_entity(order),
    ))
}

/// Public status lookup. The tracking code is the capability; no auth.
pub async fn track(state: &AppState, code: &str) -> AppResult<ApiResponse<Order>> {
    let order = Orders::find()
        .filter(OrderCol::TrackingCode.eq(code))
        .one(&*state.orm)
        .await?;
    let order = match order {
        Some(o) => o,
        None => return Err(AppError::NotFound),
    };

    Ok(ApiResponse::success(
        "Order",
        order_from_entity(order),
    ))
}

pub async fn list_all(
    state: &AppState,
    query: OrderListQuery,
) -> AppResult<ApiResponse<OrderList>> {
    let (page, limit, offset) = query.normalize();

    let mut condition = Condition::all();
    if let Some(status) = query.status.as_ref().filter(|s| !s.is_empty()) {
        condition = condition.add(OrderCol::Status.eq(status.clone()));
    }

    let mut finder = Orders::find().filter(condition);
    let sort_order = query.sort_order.unwrap_or(SortOrder::Desc);
    finder = match sort_order {
        SortOrder::Asc => finder.order_by_asc(OrderCol::CreatedAt),
        SortOrder::Desc => finder.order_by_desc(OrderCol::CreatedAt),
    };

    let total = finder.clone().count(&*state.orm).await? as i64;

    let orders = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&*state.orm)
        .await?
        .into_iter()
        .map(order_from_entity)
        .collect();

    let meta = Meta {
        page,
        per_page: limit,
        total,
    };
    Ok(ApiResponse::paginated(
        "Orders",
        OrderList { items: orders },
        meta,
    ))
}

pub async fn set_status(
    state: &AppState,
    id: Uuid,
    payload: UpdateOrderStatusRequest,
) -> AppResult<ApiResponse<Order>> {
    if !OrderStatus::is_assignable(&payload.status) {
        return Err(AppError::Validation(format!(
            "unknown order status: {}",
            payload.status
        )));
    }

    let existing = Orders::find_by_id(id).one(&*state.orm).await?;
    let existing = match existing {
        Some(o) => o,
        None => return Err(AppError::NotFound),
    };

    let mut active: OrderActive = existing.into();
    active.status = Set(payload.status);
    active.updated_at = Set(Utc::now().into());
    let order = active.update(&*state.orm).await?;

    tracing::info!(order_id = %order.id, status = %order.status, "order status updated");
    Ok(ApiResponse::success(
        "Order status updated",
        order_from_entity(order),
    ))
}

pub async fn stats(state: &AppState) -> AppResult<ApiResponse<OrderStats>> {
    let total_orders = Orders::find().count(&*state.orm).await? as i64;
    let pending_orders = Orders::find()
        .filter(OrderCol::Status.eq(OrderStatus::New.label()))
        .count(&*state.orm)
        .await? as i64;
    let completed_orders = Orders::find()
        .filter(OrderCol::Status.eq(OrderStatus::Delivered.label()))
        .count(&*state.orm)
        .await? as i64;

    Ok(ApiResponse::success(
        "Order stats",
        OrderStats {
            total_orders,
            pending_orders,
            completed_orders,
        },
    ))
}

/// Short public lookup code: the first half of a v4 UUID's hex, uppercased.
fn generate_tracking_code() -> String {
    Uuid::new_v4().simple().to_string()[..TRACKING_CODE_LEN].to_uppercase()
}

fn order_from_entity(model: OrderModel) -> Order {
    let items: Vec<CartEntry> = serde_json::from_value(model.items).unwrap_or_default();

    // Orders imported from the old JSON exports can carry a zero total;
    // recompute from the snapshot instead of trusting the stored field.
    let total_amount = if model.total_amount > 0.0 {
        model.total_amount
    } else {
        items.iter().map(CartEntry::subtotal).sum()
    };

    Order {
        id: model.id,
        tracking_code: model.tracking_code,
        customer_name: model.customer_name,
        customer_phone: model.customer_phone,
        customer_address: model.customer_address,
        items,
        total_amount,
        status_kind: OrderStatus::from_label(&model.status),
        status: model.status,
        notes: model.notes,
        created_at: model.created_at.with_timezone(&Utc),
        updated_at: model.updated_at.with_timezone(&Utc),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tracking_code_shape() {
        let code = generate_tracking_code();
        assert_eq!(code.len(), TRACKING_CODE_LEN);
        assert!(code.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(code, code.to_uppercase());
    }

    #[test]
    fn tracking_codes_do_not_repeat_in_a_small_sample() {
        let mut codes: Vec<String> = (0..64).map(|_| generate_tracking_code()).collect();
        codes.sort();
        codes.dedup();
        assert_eq!(codes.len(), 64);
    }
}
