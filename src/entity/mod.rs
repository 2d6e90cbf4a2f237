pub mod menu_items;
pub mod orders;

pub use menu_items::Entity as MenuItems;
pub use orders::Entity as Orders;
