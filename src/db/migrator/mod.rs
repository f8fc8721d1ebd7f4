use sea_orm_migration::prelude::*;

mod m20260805_initial;
mod m20260809_add_retrieval_cache;
mod m20260812_add_cache_entries;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260805_initial::Migration),
            Box::new(m20260809_add_retrieval_cache::Migration),
            Box::new(m20260812_add_cache_entries::Migration),
        ]
    }
}
