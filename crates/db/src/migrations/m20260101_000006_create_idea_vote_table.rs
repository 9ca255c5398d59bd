//! Create `idea_vote` table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(IdeaVote::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(IdeaVote::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(IdeaVote::IdeaId).string_len(32).not_null())
                    .col(ColumnDef::new(IdeaVote::UserId).string_len(32).not_null())
                    .col(ColumnDef::new(IdeaVote::Kind).string_len(10).not_null())
                    .col(
                        ColumnDef::new(IdeaVote::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_idea_vote_idea")
                            .from(IdeaVote::Table, IdeaVote::IdeaId)
                            .to(Idea::Table, Idea::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_idea_vote_user")
                            .from(IdeaVote::Table, IdeaVote::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Unique index: (idea_id, user_id) - one vote per user per idea
        manager
            .create_index(
                Index::create()
                    .name("idx_idea_vote_idea_user")
                    .table(IdeaVote::Table)
                    .col(IdeaVote::IdeaId)
                    .col(IdeaVote::UserId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Index: (idea_id, kind) - for counting likes/dislikes
        manager
            .create_index(
                Index::create()
                    .name("idx_idea_vote_idea_kind")
                    .table(IdeaVote::Table)
                    .col(IdeaVote::IdeaId)
                    .col(IdeaVote::Kind)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(IdeaVote::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum IdeaVote {
    Table,
    Id,
    IdeaId,
    UserId,
    Kind,
    CreatedAt,
}

#[derive(Iden)]
enum Idea {
    Table,
    Id,
}

#[derive(Iden)]
enum User {
    Table,
    Id,
}
