use std::collections::{HashMap, HashSet};

use chrono::{DateTime, FixedOffset, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, JoinType, ModelTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, RelationTrait, Set,
};
use uuid::Uuid;

use super::{merge_field, merge_option, page_bounds, Page};
use crate::entities::{artist, music, music::Genre, music_artist};

#[derive(Debug, Clone, Default)]
pub struct MusicFields {
    pub title: Option<String>,
    pub album_name: Option<String>,
    pub release_date: Option<DateTime<FixedOffset>>,
    pub genre: Option<Genre>,
}

/// Drop repeated ids, keeping the first occurrence of each.
pub fn dedup_ids(ids: &[Uuid]) -> Vec<Uuid> {
    let mut seen = HashSet::with_capacity(ids.len());
    ids.iter().copied().filter(|id| seen.insert(*id)).collect()
}

pub async fn find_by_id<C: ConnectionTrait>(
    db: &C,
    id: Uuid,
) -> Result<Option<music::Model>, DbErr> {
    music::Entity::find_by_id(id).one(db).await
}

pub async fn list<C: ConnectionTrait>(
    db: &C,
    page: u64,
    page_size: u64,
) -> Result<Page<music::Model>, DbErr> {
    let (index, size) = page_bounds(page, page_size);
    let paginator = music::Entity::find()
        .order_by_asc(music::Column::Created)
        .order_by_asc(music::Column::Id)
        .paginate(db, size);
    let total = paginator.num_items().await?;
    let items = paginator.fetch_page(index).await?;
    Ok(Page { items, total })
}

/// Music rows credited to `artist_id`, in one joined query.
pub async fn find_by_artist<C: ConnectionTrait>(
    db: &C,
    artist_id: Uuid,
) -> Result<Vec<music::Model>, DbErr> {
    music::Entity::find()
        .join(JoinType::InnerJoin, music::Relation::MusicArtist.def())
        .filter(music_artist::Column::ArtistId.eq(artist_id))
        .order_by_asc(music::Column::Created)
        .order_by_asc(music::Column::Id)
        .all(db)
        .await
}

pub async fn create<C: ConnectionTrait>(db: &C, fields: MusicFields) -> Result<music::Model, DbErr> {
    let now = Utc::now().fixed_offset();
    music::ActiveModel {
        id: Set(Uuid::new_v4()),
        title: Set(fields.title),
        album_name: Set(fields.album_name),
        release_date: Set(fields.release_date),
        genre: Set(fields.genre.unwrap_or_default()),
        created: Set(now),
        modified: Set(now),
    }
    .insert(db)
    .await
}

/// Merge `changes` over `current` and write every column back.
pub async fn update<C: ConnectionTrait>(
    db: &C,
    current: music::Model,
    changes: MusicFields,
) -> Result<music::Model, DbErr> {
    let merged = music::ActiveModel {
        id: Set(current.id),
        title: Set(merge_option(changes.title, current.title)),
        album_name: Set(merge_option(changes.album_name, current.album_name)),
        release_date: Set(merge_option(changes.release_date, current.release_date)),
        genre: Set(merge_field(changes.genre, current.genre)),
        created: Set(current.created),
        modified: Set(Utc::now().fixed_offset()),
    };
    merged.update(db).await
}

pub async fn delete<C: ConnectionTrait>(db: &C, music: music::Model) -> Result<(), DbErr> {
    music_artist::Entity::delete_many()
        .filter(music_artist::Column::MusicId.eq(music.id))
        .exec(db)
        .await?;
    music.delete(db).await?;
    Ok(())
}

/// Credit rows of one music record in the order they were added.
pub async fn links<C: ConnectionTrait>(
    db: &C,
    music_id: Uuid,
) -> Result<Vec<music_artist::Model>, DbErr> {
    music_artist::Entity::find()
        .filter(music_artist::Column::MusicId.eq(music_id))
        .order_by_asc(music_artist::Column::Position)
        .all(db)
        .await
}

/// Credit the given artists to `music_id`, positions following slice order.
/// Callers pass ids already deduplicated and resolved.
pub async fn link_artists<C: ConnectionTrait>(
    db: &C,
    music_id: Uuid,
    artist_ids: &[Uuid],
) -> Result<(), DbErr> {
    for (position, artist_id) in artist_ids.iter().enumerate() {
        music_artist::ActiveModel {
            id: Set(Uuid::new_v4()),
            music_id: Set(music_id),
            artist_id: Set(*artist_id),
            position: Set(position as i32),
        }
        .insert(db)
        .await?;
    }
    Ok(())
}

/// Replace the full set of credits on `music_id` with `artist_ids`.
pub async fn replace_artists<C: ConnectionTrait>(
    db: &C,
    music_id: Uuid,
    artist_ids: &[Uuid],
) -> Result<(), DbErr> {
    music_artist::Entity::delete_many()
        .filter(music_artist::Column::MusicId.eq(music_id))
        .exec(db)
        .await?;
    link_artists(db, music_id, artist_ids).await
}

/// Artist names credited on each music id, in credit order. Artists with no
/// name contribute an empty string so the list stays aligned with credits.
pub async fn artist_names<C: ConnectionTrait>(
    db: &C,
    music_ids: &[Uuid],
) -> Result<HashMap<Uuid, Vec<String>>, DbErr> {
    let mut names: HashMap<Uuid, Vec<String>> = HashMap::new();
    if music_ids.is_empty() {
        return Ok(names);
    }

    let rows = music_artist::Entity::find()
        .filter(music_artist::Column::MusicId.is_in(music_ids.iter().copied()))
        .order_by_asc(music_artist::Column::MusicId)
        .order_by_asc(music_artist::Column::Position)
        .all(db)
        .await?;

    let artist_ids: Vec<Uuid> = rows
        .iter()
        .map(|l| l.artist_id)
        .collect::<HashSet<_>>()
        .into_iter()
        .collect();
    let artists: HashMap<Uuid, artist::Model> = artist::Entity::find()
        .filter(artist::Column::Id.is_in(artist_ids))
        .all(db)
        .await?
        .into_iter()
        .map(|a| (a.id, a))
        .collect();

    for link in rows {
        if let Some(artist) = artists.get(&link.artist_id) {
            names
                .entry(link.music_id)
                .or_default()
                .push(artist.name.clone().unwrap_or_default());
        }
    }
    Ok(names)
}
