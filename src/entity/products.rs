use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "products")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub title: String,
    pub description: String,
    #[sea_orm(unique)]
    pub code: String,
    #[sea_orm(column_type = "Double")]
    pub price: f64,
    pub status: bool,
    pub stock: i64,
    pub category: String,
    #[sea_orm(column_type = "JsonBinary")]
    pub thumbnails: Json,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
