use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "submissions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub form_id: i32,

    /// JSON object of field name -> submitted value
    #[sea_orm(column_type = "Text")]
    pub responses: String,

    /// JSON object of field name -> hosted image URL
    #[sea_orm(column_type = "Text")]
    pub image_urls: String,

    pub submitted_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::forms::Entity",
        from = "Column::FormId",
        to = "super::forms::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Forms,
}

impl Related<super::forms::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Forms.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
