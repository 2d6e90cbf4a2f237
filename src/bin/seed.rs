use axum_restaurant_api::{
    db::create_pool,
    dto::settings::{AdminCredentials, AppSettings, RestaurantInfo},
};
use serde_json::json;
use uuid::Uuid;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let database_url = std::env::var("DATABASE_URL")?;

    let pool = create_pool(&database_url).await?;
    // Ensure migrations are applied.
    sqlx::migrate!("./migrations").run(&pool).await?;

    seed_settings(&pool).await?;
    seed_menu(&pool).await?;

    println!("Seed completed");
    Ok(())
}

async fn seed_settings(pool: &sqlx::PgPool) -> anyhow::Result<()> {
    let restaurant_info = RestaurantInfo {
        name: "مطعم فودي".to_string(),
        name_fr: "Restaurant Foodie".to_string(),
        phone: "+212 5XX-XXXXXX".to_string(),
        address: "الدار البيضاء، المغرب".to_string(),
        address_fr: "Casablanca, Maroc".to_string(),
        email: "info@foodie.ma".to_string(),
        ..RestaurantInfo::default()
    };

    let groups = [
        ("restaurant_info", serde_json::to_value(restaurant_info)?),
        (
            "admin_credentials",
            serde_json::to_value(AdminCredentials {
                username: "restaurant_admin".to_string(),
                password: "SecurePass@2024!".to_string(),
            })?,
        ),
        ("app_settings", serde_json::to_value(AppSettings::default())?),
    ];

    for (key, value) in groups {
        sqlx::query(
            r#"
            INSERT INTO settings (key, value) VALUES ($1, $2)
            ON CONFLICT (key) DO NOTHING
            "#,
        )
        .bind(key)
        .bind(value)
        .execute(pool)
        .await?;

        println!("Ensured setting {key}");
    }

    Ok(())
}

async fn seed_menu(pool: &sqlx::PgPool) -> anyhow::Result<()> {
    // Only seed an empty catalog; reruns must not duplicate items.
    let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM menu_items")
        .fetch_one(pool)
        .await?;
    if count.0 > 0 {
        println!("Menu already seeded");
        return Ok(());
    }

    let items = vec![
        (
            "كسكس",
            "Couscous",
            "كسكس تقليدي بالخضار",
            "Couscous traditionnel aux légumes",
            45.0,
            "أطباق رئيسية",
            "Plats principaux",
            30,
            json!(["سميد", "خضار", "لحم"]),
            json!(["semoule", "légumes", "viande"]),
        ),
        (
            "طاجين",
            "Tajine",
            "طاجين لحم بالبرقوق",
            "Tajine de viande aux pruneaux",
            60.0,
            "أطباق رئيسية",
            "Plats principaux",
            45,
            json!(["لحم", "برقوق", "لوز"]),
            json!(["viande", "pruneaux", "amandes"]),
        ),
        (
            "شاي بالنعناع",
            "Thé à la menthe",
            "شاي أخضر منعش",
            "Thé vert rafraîchissant",
            10.0,
            "مشروبات",
            "Boissons",
            5,
            json!(["شاي أخضر", "نعناع", "سكر"]),
            json!(["thé vert", "menthe", "sucre"]),
        ),
    ];

    for (name, name_fr, desc, desc_fr, price, category, category_fr, prep, ing, ing_fr) in items {
        sqlx::query(
            r#"
            INSERT INTO menu_items
                (id, name, name_fr, description, description_fr, price,
                 category, category_fr, preparation_time, ingredients, ingredients_fr)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(name)
        .bind(name_fr)
        .bind(desc)
        .bind(desc_fr)
        .bind(price)
        .bind(category)
        .bind(category_fr)
        .bind(prep)
        .bind(ing)
        .bind(ing_fr)
        .execute(pool)
        .await?;
    }

    println!("Seeded menu items");
    Ok(())
}
