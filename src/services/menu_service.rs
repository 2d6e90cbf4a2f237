use chrono::Utc;
use sea_orm::ActiveValue::NotSet;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, QueryFilter, QueryOrder, QuerySelect,
    Set,
};
use uuid::Uuid;

use crate::{
    dto::menu::{
        AvailabilityResponse, CategoryList, CreateMenuItemRequest, MenuItemList,
        UpdateMenuItemRequest,
    },
    entity::menu_items::{ActiveModel, Column, Entity as MenuItems, Model as MenuItemModel},
    error::{AppError, AppResult},
    models::MenuItem,
    response::ApiResponse,
    state::AppState,
    storage,
};

const FEATURED_LIMIT: u64 = 6;

/// Customer-facing listing: available items, optionally one category.
pub async fn list_available(
    state: &AppState,
    category: Option<String>,
) -> AppResult<ApiResponse<MenuItemList>> {
    let mut condition = Condition::all().add(Column::Available.eq(true));
    if let Some(category) = category.as_ref().filter(|c| !c.is_empty()) {
        condition = condition.add(Column::Category.eq(category.clone()));
    }

    let items = MenuItems::find()
        .filter(condition)
        .order_by_asc(Column::Category)
        .order_by_asc(Column::Name)
        .all(&*state.orm)
        .await?
        .into_iter()
        .map(menu_item_from_entity)
        .collect();

    Ok(ApiResponse::success(
        "Menu",
        MenuItemList { items },
    ))
}

/// Front-page teaser: newest available items, capped at six.
pub async fn list_featured(state: &AppState) -> AppResult<ApiResponse<MenuItemList>> {
    let items = MenuItems::find()
        .filter(Column::Available.eq(true))
        .order_by_desc(Column::CreatedAt)
        .limit(FEATURED_LIMIT)
        .all(&*state.orm)
        .await?
        .into_iter()
        .map(menu_item_from_entity)
        .collect();

    Ok(ApiResponse::success(
        "Featured",
        MenuItemList { items },
    ))
}

/// Distinct categories among available items.
pub async fn list_categories(state: &AppState) -> AppResult<ApiResponse<CategoryList>> {
    let categories: Vec<String> = MenuItems::find()
        .select_only()
        .column(Column::Category)
        .filter(Column::Available.eq(true))
        .distinct()
        .order_by_asc(Column::Category)
        .into_tuple()
        .all(&*state.orm)
        .await?;

    Ok(ApiResponse::success(
        "Categories",
        CategoryList { categories },
    ))
}

/// Admin listing: everything, including unavailable items.
pub async fn list_all(state: &AppState) -> AppResult<ApiResponse<MenuItemList>> {
    let items = MenuItems::find()
        .order_by_asc(Column::CreatedAt)
        .all(&*state.orm)
        .await?
        .into_iter()
        .map(menu_item_from_entity)
        .collect();

    Ok(ApiResponse::success(
        "Menu items",
        MenuItemList { items },
    ))
}

pub async fn get_item(state: &AppState, id: Uuid) -> AppResult<ApiResponse<MenuItem>> {
    let item = MenuItems::find_by_id(id)
        .one(&*state.orm)
        .await?
        .map(menu_item_from_entity);
    let item = match item {
        Some(i) => i,
        None => return Err(AppError::NotFound),
    };
    Ok(ApiResponse::success("Menu item", item))
}

pub async fn create_item(
    state: &AppState,
    payload: CreateMenuItemRequest,
) -> AppResult<ApiResponse<MenuItem>> {
    if payload.name.trim().is_empty() || payload.category.trim().is_empty() {
        return Err(AppError::Validation(
            "name and category are required".to_string(),
        ));
    }
    if payload.price < 0.0 {
        return Err(AppError::Validation("price must not be negative".to_string()));
    }
    let preparation_time = payload.preparation_time.unwrap_or(15);
    if preparation_time <= 0 {
        return Err(AppError::Validation(
            "preparation time must be positive".to_string(),
        ));
    }

    let active = ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(payload.name),
        name_fr: Set(payload.name_fr),
        description: Set(Some(payload.description)),
        description_fr: Set(payload.description_fr),
        price: Set(payload.price),
        category: Set(payload.category),
        category_fr: Set(payload.category_fr),
        image: Set(None),
        available: Set(true),
        preparation_time: Set(preparation_time),
        ingredients: Set(string_list_json(payload.ingredients.unwrap_or_default())),
        ingredients_fr: Set(string_list_json(payload.ingredients_fr.unwrap_or_default())),
        created_at: NotSet,
    };
    let item = active.insert(&*state.orm).await?;

    tracing::info!(item_id = %item.id, name = %item.name, "menu item created");
    Ok(ApiResponse::success(
        "Menu item created",
        menu_item_from_entity(item),
    ))
}

pub async fn update_item(
    state: &AppState,
    id: Uuid,
    payload: UpdateMenuItemRequest,
) -> AppResult<ApiResponse<MenuItem>> {
    let existing = MenuItems::find_by_id(id).one(&*state.orm).await?;
    let existing = match existing {
        Some(i) => i,
        None => return Err(AppError::NotFound),
    };

    if let Some(price) = payload.price {
        if price < 0.0 {
            return Err(AppError::Validation("price must not be negative".to_string()));
        }
    }
    if let Some(preparation_time) = payload.preparation_time {
        if preparation_time <= 0 {
            return Err(AppError::Validation(
                "preparation time must be positive".to_string(),
            ));
        }
    }

    let mut active: ActiveModel = existing.into();
    if let Some(name) = payload.name {
        active.name = Set(name);
    }
    if let Some(name_fr) = payload.name_fr {
        active.name_fr = Set(Some(name_fr));
    }
    if let Some(description) = payload.description {
        active.description = Set(Some(description));
    }
    if let Some(description_fr) = payload.description_fr {
        active.description_fr = Set(Some(description_fr));
    }
    if let Some(price) = payload.price {
        active.price = Set(price);
    }
    if let Some(category) = payload.category {
        active.category = Set(category);
    }
    if let Some(category_fr) = payload.category_fr {
        active.category_fr = Set(Some(category_fr));
    }
    if let Some(preparation_time) = payload.preparation_time {
        active.preparation_time = Set(preparation_time);
    }
    if let Some(ingredients) = payload.ingredients {
        active.ingredients = Set(string_list_json(ingredients));
    }
    if let Some(ingredients_fr) = payload.ingredients_fr {
        active.ingredients_fr = Set(string_list_json(ingredients_fr));
    }
    if let Some(available) = payload.available {
        active.available = Set(available);
    }

    let item = active.update(&*state.orm).await?;

    tracing::info!(item_id = %item.id, "menu item updated");
    Ok(ApiResponse::success(
        "Menu item updated",
        menu_item_from_entity(item),
    ))
}

pub async fn delete_item(
    state: &AppState,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let existing = MenuItems::find_by_id(id).one(&*state.orm).await?;
    let existing = match existing {
        Some(i) => i,
        None => return Err(AppError::NotFound),
    };

    MenuItems::delete_by_id(id).exec(&*state.orm).await?;

    // The row is gone; a leftover file is only worth a warning.
    if let Some(image) = existing.image {
        if let Err(err) = state.images.remove(&image) {
            tracing::warn!(error = %err, image, "failed to remove menu item image");
        }
    }

    tracing::info!(item_id = %id, "menu item deleted");
    Ok(ApiResponse::success(
        "Menu item deleted",
        serde_json::json!({}),
    ))
}

/// Flip the availability flag and report the new value.
pub async fn toggle_availability(
    state: &AppState,
    id: Uuid,
) -> AppResult<ApiResponse<AvailabilityResponse>> {
    let existing = MenuItems::find_by_id(id).one(&*state.orm).await?;
    let existing = match existing {
        Some(i) => i,
        None => return Err(AppError::NotFound),
    };

    let available = !existing.available;
    let mut active: ActiveModel = existing.into();
    active.available = Set(available);
    active.update(&*state.orm).await?;

    Ok(ApiResponse::success(
        "Availability toggled",
        AvailabilityResponse { available },
    ))
}

/// Store an uploaded image for an item and drop the previous file.
pub async fn attach_image(
    state: &AppState,
    id: Uuid,
    original_filename: &str,
    bytes: &[u8],
) -> AppResult<ApiResponse<MenuItem>> {
    if !storage::allowed_file(original_filename) {
        return Err(AppError::Validation(format!(
            "file type not allowed, expected one of: {}",
            storage::ALLOWED_EXTENSIONS.join(", ")
        )));
    }

    let existing = MenuItems::find_by_id(id).one(&*state.orm).await?;
    let existing = match existing {
        Some(i) => i,
        None => return Err(AppError::NotFound),
    };

    let filename = storage::unique_filename(original_filename);
    state.images.save(&filename, bytes)?;

    let old_image = existing.image.clone();
    let mut active: ActiveModel = existing.into();
    active.image = Set(Some(filename.clone()));
    let item = match active.update(&*state.orm).await {
        Ok(item) => item,
        Err(err) => {
            // The row never pointed at the new file; drop it.
            if let Err(rm_err) = state.images.remove(&filename) {
                tracing::warn!(error = %rm_err, image = filename, "failed to remove orphaned image");
            }
            return Err(err.into());
        }
    };

    if let Some(old) = old_image {
        if let Err(err) = state.images.remove(&old) {
            tracing::warn!(error = %err, image = old, "failed to remove replaced image");
        }
    }

    tracing::info!(item_id = %item.id, image = filename, "menu item image updated");
    Ok(ApiResponse::success(
        "Image uploaded",
        menu_item_from_entity(item),
    ))
}

fn string_list_json(list: Vec<String>) -> serde_json::Value {
    serde_json::Value::Array(list.into_iter().map(serde_json::Value::String).collect())
}

fn string_list(value: &serde_json::Value) -> Vec<String> {
    serde_json::from_value(value.clone()).unwrap_or_default()
}

pub(crate) fn menu_item_from_entity(model: MenuItemModel) -> MenuItem {
    MenuItem {
        id: model.id,
        name: model.name,
        name_fr: model.name_fr,
        description: model.description,
        description_fr: model.description_fr,
        price: model.price,
        category: model.category,
        category_fr: model.category_fr,
        image: model.image,
        available: model.available,
        preparation_time: model.preparation_time,
        ingredients: string_list(&model.ingredients),
        ingredients_fr: string_list(&model.ingredients_fr),
        created_at: model.created_at.with_timezone(&Utc),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    use sea_orm::{DatabaseBackend, DbErr, MockDatabase};

    use crate::{cart::CartStore, state::AppState, storage::BlobStore};

    #[derive(Default)]
    struct RecordingStore {
        saved: Mutex<Vec<String>>,
        removed: Mutex<Vec<String>>,
    }

    impl BlobStore for RecordingStore {
        fn save(&self, filename: &str, _bytes: &[u8]) -> anyhow::Result<()> {
            self.saved.lock().unwrap().push(filename.to_string());
            Ok(())
        }

        fn remove(&self, filename: &str) -> anyhow::Result<()> {
            self.removed.lock().unwrap().push(filename.to_string());
            Ok(())
        }
    }

    fn existing_item() -> MenuItemModel {
        MenuItemModel {
            id: Uuid::new_v4(),
            name: "Couscous".to_string(),
            name_fr: None,
            description: None,
            description_fr: None,
            price: 45.0,
            category: "Plats".to_string(),
            category_fr: None,
            image: None,
            available: true,
            preparation_time: 15,
            ingredients: serde_json::json!([]),
            ingredients_fr: serde_json::json!([]),
            created_at: Utc::now().into(),
        }
    }

    fn state_with(orm: sea_orm::DatabaseConnection, store: Arc<RecordingStore>) -> AppState {
        let orm = Arc::new(orm);
        AppState {
            pool: sqlx::postgres::PgPoolOptions::new()
                .connect_lazy("postgres://postgres@localhost/unused")
                .unwrap(),
            orm,
            carts: CartStore::default(),
            images: store,
            jwt_secret: "test".to_string(),
        }
    }

    #[tokio::test]
    async fn attach_image_removes_the_new_file_when_the_row_update_fails() {
        let orm = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![existing_item()]])
            .append_query_errors([DbErr::Custom("update failed".to_string())])
            .into_connection();
        let store = Arc::new(RecordingStore::default());
        let state = state_with(orm, store.clone());

        let err = attach_image(&state, Uuid::new_v4(), "photo.png", b"bytes")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::OrmError(_)));

        let saved = store.saved.lock().unwrap().clone();
        let removed = store.removed.lock().unwrap().clone();
        assert_eq!(saved.len(), 1);
        assert_eq!(removed, saved);
    }

    #[tokio::test]
    async fn attach_image_rejects_disallowed_extensions_before_touching_storage() {
        let orm = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let store = Arc::new(RecordingStore::default());
        let state = state_with(orm, store.clone());

        let err = attach_image(&state, Uuid::new_v4(), "menu.pdf", b"bytes")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert!(store.saved.lock().unwrap().is_empty());
    }
}
