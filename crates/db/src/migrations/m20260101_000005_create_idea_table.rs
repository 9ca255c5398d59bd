//! Create idea table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Idea::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Idea::Id).string_len(32).not_null().primary_key())
                    .col(ColumnDef::new(Idea::IdeaId).string_len(20).not_null())
                    .col(ColumnDef::new(Idea::Title).string_len(100).not_null())
                    .col(ColumnDef::new(Idea::Body).text().not_null())
                    .col(ColumnDef::new(Idea::AuthorId).string_len(32).not_null())
                    .col(
                        ColumnDef::new(Idea::Visibility)
                            .string_len(10)
                            .not_null()
                            .default("Public"),
                    )
                    .col(ColumnDef::new(Idea::Active).boolean().not_null().default(true))
                    .col(ColumnDef::new(Idea::Slug).string_len(128).not_null())
                    .col(ColumnDef::new(Idea::Views).integer().not_null().default(0))
                    .col(
                        ColumnDef::new(Idea::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Idea::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_idea_author")
                            .from(Idea::Table, Idea::AuthorId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_idea_idea_id")
                    .table(Idea::Table)
                    .col(Idea::IdeaId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_idea_slug")
                    .table(Idea::Table)
                    .col(Idea::Slug)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Index: author_id (for listing a user's ideas)
        manager
            .create_index(
                Index::create()
                    .name("idx_idea_author_id")
                    .table(Idea::Table)
                    .col(Idea::AuthorId)
                    .to_owned(),
            )
            .await?;

        // Index: created_at (listings are newest first)
        manager
            .create_index(
                Index::create()
                    .name("idx_idea_created_at")
                    .table(Idea::Table)
                    .col(Idea::CreatedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Idea::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Idea {
    Table,
    Id,
    IdeaId,
    Title,
    Body,
    AuthorId,
    Visibility,
    Active,
    Slug,
    Views,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum User {
    Table,
    Id,
}
