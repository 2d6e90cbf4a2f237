use utoipa::{
    Modify, OpenApi,
    openapi::{
        self,
        OpenApi as OpenApiSpec,
        security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::{
        cart::{AddToCartRequest, CartView, UpdateCartRequest},
        menu::{
            AvailabilityResponse, CategoryList, CreateMenuItemRequest, MenuItemList,
            UpdateMenuItemRequest,
        },
        orders::{OrderList, OrderStats, PlaceOrderRequest, UpdateOrderStatusRequest},
        settings::{
            AdminCredentials, AppSettings, DayHours, RestaurantInfo, SettingsMap, SocialLinks,
            UpdateCredentialsRequest, WorkingHours,
        },
        auth::{LoginRequest, LoginResponse},
    },
    models::{CartEntry, MenuItem, Order, OrderStatus},
    response::{ApiResponse, ErrorBody, Meta},
    routes::{admin, auth, cart, health, menu, orders, params},
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        auth::login,
        menu::list_menu,
        menu::list_featured,
        menu::list_categories,
        menu::get_menu_item,
        cart::view_cart,
        cart::add_to_cart,
        cart::update_cart,
        orders::place_order,
        orders::track_order,
        admin::list_all_orders,
        admin::update_order_status,
        admin::order_stats,
        admin::list_menu_admin,
        admin::create_menu_item,
        admin::update_menu_item,
        admin::delete_menu_item,
        admin::toggle_availability,
        admin::upload_menu_image,
        admin::get_settings,
        admin::update_restaurant_info,
        admin::update_admin_credentials,
        admin::update_app_settings
    ),
    components(
        schemas(
            MenuItem,
            CartEntry,
            Order,
            OrderStatus,
            LoginRequest,
            LoginResponse,
            AddToCartRequest,
            UpdateCartRequest,
            CartView,
            CreateMenuItemRequest,
            UpdateMenuItemRequest,
            MenuItemList,
            CategoryList,
            AvailabilityResponse,
            PlaceOrderRequest,
            UpdateOrderStatusRequest,
            OrderList,
            OrderStats,
            RestaurantInfo,
            WorkingHours,
            DayHours,
            SocialLinks,
            AdminCredentials,
            AppSettings,
            UpdateCredentialsRequest,
            SettingsMap,
            params::MenuListQuery,
            params::OrderListQuery,
            Meta,
            ErrorBody,
            ApiResponse<MenuItem>,
            ApiResponse<MenuItemList>,
            ApiResponse<Order>,
            ApiResponse<OrderList>,
            ApiResponse<CartView>
        )
    ),
    security(
        ("bearer_auth" = [])
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Menu", description = "Public menu browsing"),
        (name = "Cart", description = "Session cart endpoints"),
        (name = "Orders", description = "Order placement and tracking"),
        (name = "Auth", description = "Admin authentication"),
        (name = "Admin", description = "Admin panel endpoints"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
