use sea_orm_migration::prelude::*;

use super::m20240101_000003_create_artists::Artists;
use super::m20240101_000004_create_musics::Musics;

/// Join relation between musics and artists.
///
/// No uniqueness on (music_id, artist_id): the write path deduplicates.
/// `position` keeps the order in which the caller listed the artists.
#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(MusicArtists::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(MusicArtists::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(MusicArtists::MusicId).uuid().not_null())
                    .col(ColumnDef::new(MusicArtists::ArtistId).uuid().not_null())
                    .col(
                        ColumnDef::new(MusicArtists::Position)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_music_artists_music_id")
                            .from(MusicArtists::Table, MusicArtists::MusicId)
                            .to(Musics::Table, Musics::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_music_artists_artist_id")
                            .from(MusicArtists::Table, MusicArtists::ArtistId)
                            .to(Artists::Table, Artists::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_music_artists_music_id")
                    .table(MusicArtists::Table)
                    .col(MusicArtists::MusicId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_music_artists_artist_id")
                    .table(MusicArtists::Table)
                    .col(MusicArtists::ArtistId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(MusicArtists::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum MusicArtists {
    Table,
    Id,
    MusicId,
    ArtistId,
    Position,
}
