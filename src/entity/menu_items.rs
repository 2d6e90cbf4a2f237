use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "menu_items")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: Uuid,
    pub name: String,
    pub name_fr: Option<String>,
    pub description: Option<String>,
    pub description_fr: Option<String>,
    pub price: f64,
    pub category: String,
    pub category_fr: Option<String>,
    pub image: Option<String>,
    pub available: bool,
    pub preparation_time: i32,
    pub ingredients: Json,
    pub ingredients_fr: Json,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
