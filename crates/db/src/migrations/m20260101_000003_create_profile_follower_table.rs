//! Create `profile_follower` table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ProfileFollower::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ProfileFollower::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(ProfileFollower::ProfileId)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ProfileFollower::FollowerId)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ProfileFollower::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    // A profile never follows itself
                    .check(
                        Expr::col(ProfileFollower::ProfileId)
                            .ne(Expr::col(ProfileFollower::FollowerId)),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_profile_follower_profile")
                            .from(ProfileFollower::Table, ProfileFollower::ProfileId)
                            .to(Profile::Table, Profile::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_profile_follower_follower")
                            .from(ProfileFollower::Table, ProfileFollower::FollowerId)
                            .to(Profile::Table, Profile::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Unique index: (profile_id, follower_id) - an edge is present at most once
        manager
            .create_index(
                Index::create()
                    .name("idx_profile_follower_profile_follower")
                    .table(ProfileFollower::Table)
                    .col(ProfileFollower::ProfileId)
                    .col(ProfileFollower::FollowerId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Index: follower_id (for listing following)
        manager
            .create_index(
                Index::create()
                    .name("idx_profile_follower_follower_id")
                    .table(ProfileFollower::Table)
                    .col(ProfileFollower::FollowerId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ProfileFollower::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum ProfileFollower {
    Table,
    Id,
    ProfileId,
    FollowerId,
    CreatedAt,
}

#[derive(Iden)]
enum Profile {
    Table,
    Id,
}
