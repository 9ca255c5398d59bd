//! Create profile table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Profile::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Profile::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Profile::ProfileId).string_len(20).not_null())
                    .col(ColumnDef::new(Profile::UserId).string_len(32).not_null())
                    .col(ColumnDef::new(Profile::Username).string_len(50).not_null())
                    .col(ColumnDef::new(Profile::FullName).string_len(100))
                    .col(ColumnDef::new(Profile::Bio).text())
                    .col(ColumnDef::new(Profile::Country).string_len(50))
                    .col(ColumnDef::new(Profile::City).string_len(50))
                    .col(
                        ColumnDef::new(Profile::Verified)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Profile::Slug).string_len(128).not_null())
                    .col(
                        ColumnDef::new(Profile::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_profile_user")
                            .from(Profile::Table, Profile::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Unique index: user_id (one profile per user)
        manager
            .create_index(
                Index::create()
                    .name("idx_profile_user_id")
                    .table(Profile::Table)
                    .col(Profile::UserId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_profile_profile_id")
                    .table(Profile::Table)
                    .col(Profile::ProfileId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_profile_slug")
                    .table(Profile::Table)
                    .col(Profile::Slug)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Index: verified (for the verified listing)
        manager
            .create_index(
                Index::create()
                    .name("idx_profile_verified")
                    .table(Profile::Table)
                    .col(Profile::Verified)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Profile::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Profile {
    Table,
    Id,
    ProfileId,
    UserId,
    Username,
    FullName,
    Bio,
    Country,
    City,
    Verified,
    Slug,
    CreatedAt,
}

#[derive(Iden)]
enum User {
    Table,
    Id,
}
