use sea_orm_migration::prelude::*;

use super::m20240101_000001_create_users::Users;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(UserProfiles::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(UserProfiles::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(UserProfiles::UserId)
                            .uuid()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(UserProfiles::FirstName).string_len(50).null())
                    .col(ColumnDef::new(UserProfiles::LastName).string_len(50).null())
                    .col(ColumnDef::new(UserProfiles::Phone).string_len(15).null())
                    .col(
                        ColumnDef::new(UserProfiles::DateOfBirth)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(UserProfiles::Gender)
                            .string_len(16)
                            .not_null()
                            .default("male"),
                    )
                    .col(ColumnDef::new(UserProfiles::Address).string_len(255).null())
                    .col(
                        ColumnDef::new(UserProfiles::Created)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(UserProfiles::Modified)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    // Rows are removed explicitly by the user deletion cascade.
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_user_profiles_user_id")
                            .from(UserProfiles::Table, UserProfiles::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(UserProfiles::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum UserProfiles {
    Table,
    Id,
    UserId,
    FirstName,
    LastName,
    Phone,
    DateOfBirth,
    Gender,
    Address,
    Created,
    Modified,
}
