use std::collections::HashMap;

use harmony_db::entities::{artist, music, music::Genre};
use harmony_db::repo::{self, musics::MusicFields, Page};
use sea_orm::ConnectionTrait;
use serde::Deserialize;
use uuid::Uuid;

use super::artists::ARTIST_NOT_FOUND;
use super::past_date_field;
use crate::error::{ApiError, ApiResult};

pub const MUSIC_NOT_FOUND: &str = "Music not found.";
const FUTURE_RELEASE_DATE: &str = "Release date must not be greater than present date.";

#[derive(Debug, Default, Deserialize)]
pub struct MusicInput {
    pub title: Option<String>,
    pub album_name: Option<String>,
    pub release_date: Option<String>,
    pub genre: Option<Genre>,
    #[serde(default)]
    pub artist_ids: Vec<Uuid>,
}

impl MusicInput {
    fn split(self) -> ApiResult<(MusicFields, Vec<Uuid>)> {
        let fields = MusicFields {
            release_date: past_date_field(self.release_date.as_deref(), FUTURE_RELEASE_DATE)?,
            title: self.title,
            album_name: self.album_name,
            genre: self.genre,
        };
        Ok((fields, self.artist_ids))
    }
}

/// A music row with the names of its credited artists, in credit order.
#[derive(Debug, Clone)]
pub struct MusicWithArtists {
    pub music: music::Model,
    pub artists: Vec<String>,
}

/// Look up every id (first occurrence wins on repeats) and return the
/// artists in the caller's order. Any unknown id is `NotFound`.
async fn resolve_artists<C: ConnectionTrait>(
    db: &C,
    ids: &[Uuid],
) -> ApiResult<Vec<artist::Model>> {
    let ids = repo::musics::dedup_ids(ids);
    let mut found: HashMap<Uuid, artist::Model> = repo::artists::find_by_ids(db, &ids)
        .await?
        .into_iter()
        .map(|a| (a.id, a))
        .collect();
    ids.iter()
        .map(|id| {
            found
                .remove(id)
                .ok_or_else(|| ApiError::NotFound(ARTIST_NOT_FOUND.to_string()))
        })
        .collect()
}

fn names(artists: &[artist::Model]) -> Vec<String> {
    artists
        .iter()
        .map(|a| a.name.clone().unwrap_or_default())
        .collect()
}

async fn with_artists<C: ConnectionTrait>(
    db: &C,
    musics: Vec<music::Model>,
) -> ApiResult<Vec<MusicWithArtists>> {
    let ids: Vec<Uuid> = musics.iter().map(|m| m.id).collect();
    let mut credited = repo::musics::artist_names(db, &ids).await?;
    Ok(musics
        .into_iter()
        .map(|music| MusicWithArtists {
            artists: credited.remove(&music.id).unwrap_or_default(),
            music,
        })
        .collect())
}

pub async fn get<C: ConnectionTrait>(db: &C, id: Uuid) -> ApiResult<MusicWithArtists> {
    let music = repo::musics::find_by_id(db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound(MUSIC_NOT_FOUND.to_string()))?;
    let mut rows = with_artists(db, vec![music]).await?;
    rows.pop()
        .ok_or_else(|| ApiError::NotFound(MUSIC_NOT_FOUND.to_string()))
}

pub async fn list<C: ConnectionTrait>(
    db: &C,
    page: u64,
    page_size: u64,
) -> ApiResult<Page<MusicWithArtists>> {
    let page = repo::musics::list(db, page, page_size).await?;
    Ok(Page {
        items: with_artists(db, page.items).await?,
        total: page.total,
    })
}

/// Music credited to the artist. Unknown artists give an empty list.
pub async fn by_artist<C: ConnectionTrait>(db: &C, artist_id: Uuid) -> ApiResult<Vec<music::Model>> {
    Ok(repo::musics::find_by_artist(db, artist_id).await?)
}

/// Run inside a transaction: an unknown artist id aborts after the music row
/// has been written.
pub async fn create<C: ConnectionTrait>(db: &C, input: MusicInput) -> ApiResult<MusicWithArtists> {
    let (fields, artist_ids) = input.split()?;
    let music = repo::musics::create(db, fields).await?;

    let artists = resolve_artists(db, &artist_ids).await?;
    let ids: Vec<Uuid> = artists.iter().map(|a| a.id).collect();
    repo::musics::link_artists(db, music.id, &ids).await?;

    tracing::info!(music_id = %music.id, artists = ids.len(), "music created");
    Ok(MusicWithArtists {
        music,
        artists: names(&artists),
    })
}

/// A non-empty `artist_ids` replaces every credit; an empty one keeps them.
pub async fn update<C: ConnectionTrait>(
    db: &C,
    id: Uuid,
    input: MusicInput,
) -> ApiResult<MusicWithArtists> {
    let current = repo::musics::find_by_id(db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound(MUSIC_NOT_FOUND.to_string()))?;
    let (changes, artist_ids) = input.split()?;
    let music = repo::musics::update(db, current, changes).await?;

    if !artist_ids.is_empty() {
        let artists = resolve_artists(db, &artist_ids).await?;
        let ids: Vec<Uuid> = artists.iter().map(|a| a.id).collect();
        repo::musics::replace_artists(db, music.id, &ids).await?;
        return Ok(MusicWithArtists {
            music,
            artists: names(&artists),
        });
    }

    let mut rows = with_artists(db, vec![music]).await?;
    rows.pop()
        .ok_or_else(|| ApiError::NotFound(MUSIC_NOT_FOUND.to_string()))
}

pub async fn delete<C: ConnectionTrait>(db: &C, id: Uuid) -> ApiResult<()> {
    let music = repo::musics::find_by_id(db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound(MUSIC_NOT_FOUND.to_string()))?;
    repo::musics::delete(db, music).await?;
    tracing::info!(music_id = %id, "music deleted");
    Ok(())
}
