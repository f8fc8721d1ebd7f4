use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "forms")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub user_id: i32,

    pub title: String,

    pub purpose: String,

    /// JSON array of lower-case keyword strings
    #[sea_orm(column_type = "Text")]
    pub keywords: String,

    /// JSON array of field definitions, order preserved
    #[sea_orm(column_type = "Text")]
    pub fields: String,

    /// Public identifier for the anonymous endpoints. Unique, never rewritten.
    #[sea_orm(unique)]
    pub share_token: String,

    /// JSON array of f32; only present when the embedding backend was
    /// configured at creation time.
    #[sea_orm(column_type = "Text", nullable)]
    pub embedding: Option<String>,

    pub created_at: String,

    pub updated_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Users,
    #[sea_orm(has_many = "super::submissions::Entity")]
    Submissions,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Users.def()
    }
}

impl Related<super::submissions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Submissions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
