use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Musics::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Musics::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Musics::Title).string_len(100).null())
                    .col(ColumnDef::new(Musics::AlbumName).string_len(100).null())
                    .col(
                        ColumnDef::new(Musics::ReleaseDate)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Musics::Genre)
                            .string_len(8)
                            .not_null()
                            .default("rnb"),
                    )
                    .col(
                        ColumnDef::new(Musics::Created)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Musics::Modified)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_musics_title")
                    .table(Musics::Table)
                    .col(Musics::Title)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Musics::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Musics {
    Table,
    Id,
    Title,
    AlbumName,
    ReleaseDate,
    Genre,
    Created,
    Modified,
}
