use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(RetrievalCache::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(RetrievalCache::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(RetrievalCache::QueryHash)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(RetrievalCache::UserId).integer().not_null())
                    .col(ColumnDef::new(RetrievalCache::FormIds).text().not_null())
                    .col(
                        ColumnDef::new(RetrievalCache::CreatedAt)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(RetrievalCache::ExpiresAt)
                            .string()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // One cached result per query hash; refreshes replace the row
        manager
            .create_index(
                Index::create()
                    .name("idx_retrieval_cache_query_hash")
                    .table(RetrievalCache::Table)
                    .col(RetrievalCache::QueryHash)
                    .unique()
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_retrieval_cache_expires_at")
                    .table(RetrievalCache::Table)
                    .col(RetrievalCache::ExpiresAt)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(RetrievalCache::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum RetrievalCache {
    Table,
    Id,
    QueryHash,
    UserId,
    FormIds,
    CreatedAt,
    ExpiresAt,
}
