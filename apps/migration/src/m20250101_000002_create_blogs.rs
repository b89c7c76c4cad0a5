use sea_orm_migration::prelude::*;

use crate::m20250101_000001_create_users::Users;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Blogs::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Blogs::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Blogs::UserId).uuid().not_null())
                    .col(ColumnDef::new(Blogs::Title).string().not_null())
                    .col(ColumnDef::new(Blogs::Content).text().not_null())
                    .col(ColumnDef::new(Blogs::Topic).string().null())
                    .col(
                        ColumnDef::new(Blogs::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Blogs::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_blogs_user_id")
                            .from(Blogs::Table, Blogs::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Listing is always "one owner, newest first".
        manager
            .create_index(
                Index::create()
                    .name("idx_blogs_user_id_created_at")
                    .table(Blogs::Table)
                    .col(Blogs::UserId)
                    .col(Blogs::CreatedAt)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Blogs::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Blogs {
    Table,
    Id,
    UserId,
    Title,
    Content,
    Topic,
    CreatedAt,
    UpdatedAt,
}
