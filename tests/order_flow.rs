use std::sync::Arc;

use axum_restaurant_api::{
    cart::CartStore,
    db::{create_orm_conn, create_pool, run_migrations},
    dto::{
        cart::AddToCartRequest,
        menu::{CreateMenuItemRequest, UpdateMenuItemRequest},
        orders::{PlaceOrderRequest, UpdateOrderStatusRequest},
        settings::{AdminCredentials, UpdateCredentialsRequest},
    },
    error::AppError,
    models::OrderStatus,
    routes::params::OrderListQuery,
    services::{auth_service, cart_service, menu_service, order_service, settings_service},
    state::AppState,
    storage::FsImageStore,
};
use sea_orm::ConnectionTrait;
use uuid::Uuid;

// Integration flow: browse -> cart -> place -> track; admin edits prices,
// toggles availability, updates status, rotates credentials.
#[tokio::test]
async fn cart_checkout_and_admin_flow() -> anyhow::Result<()> {
    // Allow skipping when no DB is configured in the environment.
    let database_url = match std::env::var("TEST_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
    {
        Ok(url) => url,
        Err(_) => {
            eprintln!(
                "Skipping test: set TEST_DATABASE_URL or DATABASE_URL to run integration flow tests."
            );
            return Ok(());
        }
    };

    let state = setup_state(&database_url).await?;
    let session = format!("sess-{}", Uuid::new_v4());

    // Seed one catalog item.
    let item = menu_service::create_item(
        &state,
        CreateMenuItemRequest {
            name: "Couscous".into(),
            name_fr: Some("Couscous".into()),
            description: "Traditional couscous".into(),
            description_fr: None,
            price: 45.0,
            category: "Plats".into(),
            category_fr: None,
            preparation_time: None,
            ingredients: Some(vec!["semoule".into(), "légumes".into()]),
            ingredients_fr: None,
        },
    )
    .await?
    .data
    .unwrap();
    assert!(item.available);
    assert_eq!(item.preparation_time, 15);

    // Placing with an empty cart is rejected and writes nothing.
    let err = order_service::place(
        &state,
        &session,
        PlaceOrderRequest {
            customer_name: "Amina".into(),
            customer_phone: None,
            customer_address: None,
            notes: None,
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    // Repeated adds of the same item merge into one entry.
    cart_service::add(
        &state,
        &session,
        AddToCartRequest {
            item_id: item.id,
            quantity: 2,
        },
    )
    .await?;
    let cart = cart_service::add(
        &state,
        &session,
        AddToCartRequest {
            item_id: item.id,
            quantity: 1,
        },
    )
    .await?
    .data
    .unwrap();
    assert_eq!(cart.items.len(), 1);
    assert_eq!(cart.items[0].quantity, 3);
    assert_eq!(cart.total, 135.0);

    // Adding an unknown item is a NotFound.
    let err = cart_service::add(
        &state,
        &session,
        AddToCartRequest {
            item_id: Uuid::new_v4(),
            quantity: 1,
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::NotFound));

    // Place the order.
    let order = order_service::place(
        &state,
        &session,
        PlaceOrderRequest {
            customer_name: "Amina".into(),
            customer_phone: Some("+212600000000".into()),
            customer_address: None,
            notes: Some("no onions".into()),
        },
    )
    .await?
    .data
    .unwrap();
    assert_eq!(order.total_amount, 135.0);
    assert_eq!(order.status, "جديد");
    assert_eq!(order.status_kind, OrderStatus::New);
    assert_eq!(order.tracking_code.len(), 8);
    assert_eq!(order.items.len(), 1);
    assert_eq!(order.items[0].quantity, 3);

    // The cart is gone after placement.
    let cart = cart_service::view(&state, &session).await?.data.unwrap();
    assert!(cart.items.is_empty());

    // Tracking returns the same order.
    let tracked = order_service::track(&state, &order.tracking_code)
        .await?
        .data
        .unwrap();
    assert_eq!(tracked.id, order.id);
    assert_eq!(tracked.total_amount, 135.0);

    let err = order_service::track(&state, "ZZZZZZZZ").await.unwrap_err();
    assert!(matches!(err, AppError::NotFound));

    // Editing the price afterwards does not move the stored total.
    menu_service::update_item(
        &state,
        item.id,
        UpdateMenuItemRequest {
            price: Some(60.0),
            name: None,
            name_fr: None,
            description: None,
            description_fr: None,
            category: None,
            category_fr: None,
            preparation_time: None,
            ingredients: None,
            ingredients_fr: None,
            available: None,
        },
    )
    .await?;
    let tracked = order_service::track(&state, &order.tracking_code)
        .await?
        .data
        .unwrap();
    assert_eq!(tracked.total_amount, 135.0);

    // Toggling availability twice restores it, and the available listing follows.
    let first = menu_service::toggle_availability(&state, item.id)
        .await?
        .data
        .unwrap();
    assert!(!first.available);
    let listed = menu_service::list_available(&state, None).await?.data.unwrap();
    assert!(!listed.items.iter().any(|i| i.id == item.id));

    let second = menu_service::toggle_availability(&state, item.id)
        .await?
        .data
        .unwrap();
    assert!(second.available);
    let listed = menu_service::list_available(&state, None).await?.data.unwrap();
    assert!(listed.items.iter().any(|i| i.id == item.id));

    // Status updates accept only known labels and bump updated_at.
    let err = order_service::set_status(
        &state,
        order.id,
        UpdateOrderStatusRequest {
            status: "on the moon".into(),
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    let updated = order_service::set_status(
        &state,
        order.id,
        UpdateOrderStatusRequest {
            status: OrderStatus::Delivered.label().into(),
        },
    )
    .await?
    .data
    .unwrap();
    assert_eq!(updated.status_kind, OrderStatus::Delivered);
    assert!(updated.updated_at >= order.updated_at);

    // Admin listing and stats see the order.
    let orders = order_service::list_all(
        &state,
        OrderListQuery {
            page: Some(1),
            per_page: Some(20),
            status: Some(OrderStatus::Delivered.label().to_string()),
            sort_order: None,
        },
    )
    .await?
    .data
    .unwrap();
    assert!(orders.items.iter().any(|o| o.id == order.id));

    let stats = order_service::stats(&state).await?.data.unwrap();
    assert_eq!(stats.total_orders, 1);
    assert_eq!(stats.pending_orders, 0);
    assert_eq!(stats.completed_orders, 1);

    Ok(())
}

#[tokio::test]
async fn credential_rotation_switches_which_login_succeeds() -> anyhow::Result<()> {
    let database_url = match std::env::var("TEST_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
    {
        Ok(url) => url,
        Err(_) => {
            eprintln!(
                "Skipping test: set TEST_DATABASE_URL or DATABASE_URL to run integration flow tests."
            );
            return Ok(());
        }
    };

    let state = setup_state(&database_url).await?;

    // Missing key means the built-in default applies.
    assert!(auth_service::verify_credentials(&state.pool, "admin", "admin").await?);

    let creds = AdminCredentials {
        username: "owner".into(),
        password: "first-password".into(),
    };
    settings_service::update(
        &state.pool,
        "admin_credentials",
        &serde_json::to_value(&creds)?,
    )
    .await?;

    assert!(auth_service::verify_credentials(&state.pool, "owner", "first-password").await?);
    assert!(!auth_service::verify_credentials(&state.pool, "admin", "admin").await?);

    // Rotation through the typed endpoint requires the current password.
    let err = settings_service::update_admin_credentials(
        &state.pool,
        UpdateCredentialsRequest {
            current_password: "wrong".into(),
            new_username: "owner".into(),
            new_password: "second-password".into(),
            confirm_password: "second-password".into(),
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    settings_service::update_admin_credentials(
        &state.pool,
        UpdateCredentialsRequest {
            current_password: "first-password".into(),
            new_username: "owner".into(),
            new_password: "second-password".into(),
            confirm_password: "second-password".into(),
        },
    )
    .await?;

    assert!(auth_service::verify_credentials(&state.pool, "owner", "second-password").await?);
    assert!(!auth_service::verify_credentials(&state.pool, "owner", "first-password").await?);

    // The stored group is visible through the settings listing.
    let all = settings_service::get_all(&state.pool).await?.data.unwrap();
    assert!(all.settings.contains_key("admin_credentials"));

    Ok(())
}

async fn setup_state(database_url: &str) -> anyhow::Result<AppState> {
    let pool = create_pool(database_url).await?;
    let orm = create_orm_conn(database_url).await?;
    run_migrations(&orm).await?;

    // Clean tables between runs.
    let backend = orm.get_database_backend();
    orm.execute(sea_orm::Statement::from_string(
        backend,
        "TRUNCATE TABLE orders, menu_items, settings",
    ))
    .await?;

    let upload_dir = std::env::temp_dir().join(format!("restaurant-images-{}", Uuid::new_v4()));
    Ok(AppState {
        pool,
        orm,
        carts: CartStore::default(),
        images: Arc::new(FsImageStore::new(upload_dir)?),
        jwt_secret: "integration-test-secret".to_string(),
    })
}
