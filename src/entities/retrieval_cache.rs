use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "retrieval_cache")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    /// SHA-256 hex of "{query}-{user_id}"
    #[sea_orm(unique)]
    pub query_hash: String,
    pub user_id: i32,
    /// JSON array of form ids the query resolved to
    #[sea_orm(column_type = "Text")]
    pub form_ids: String,
    pub created_at: String, // SQLite doesn't strictly enforce types, but typically strings for ISO8601
    pub expires_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
