use chrono::{DateTime, FixedOffset, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, ModelTrait,
    PaginatorTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use super::{merge_field, merge_option, page_bounds, Page};
use crate::entities::{artist, music_artist, Gender};

#[derive(Debug, Clone, Default)]
pub struct ArtistFields {
    pub name: Option<String>,
    pub first_release_year: Option<i32>,
    pub no_of_albums_released: Option<i32>,
    pub date_of_birth: Option<DateTime<FixedOffset>>,
    pub gender: Option<Gender>,
    pub address: Option<String>,
}

pub async fn find_by_id<C: ConnectionTrait>(
    db: &C,
    id: Uuid,
) -> Result<Option<artist::Model>, DbErr> {
    artist::Entity::find_by_id(id).one(db).await
}

pub async fn find_by_ids<C: ConnectionTrait>(
    db: &C,
    ids: &[Uuid],
) -> Result<Vec<artist::Model>, DbErr> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }
    artist::Entity::find()
        .filter(artist::Column::Id.is_in(ids.iter().copied()))
        .all(db)
        .await
}

pub async fn list<C: ConnectionTrait>(
    db: &C,
    page: u64,
    page_size: u64,
) -> Result<Page<artist::Model>, DbErr> {
    let (index, size) = page_bounds(page, page_size);
    let paginator = artist::Entity::find()
        .order_by_asc(artist::Column::Created)
        .order_by_asc(artist::Column::Id)
        .paginate(db, size);
    let total = paginator.num_items().await?;
    let items = paginator.fetch_page(index).await?;
    Ok(Page { items, total })
}

pub async fn create<C: ConnectionTrait>(
    db: &C,
    fields: ArtistFields,
) -> Result<artist::Model, DbErr> {
    let now = Utc::now().fixed_offset();
    artist::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(fields.name),
        first_release_year: Set(fields.first_release_year),
        no_of_albums_released: Set(fields.no_of_albums_released),
        date_of_birth: Set(fields.date_of_birth),
        gender: Set(fields.gender.unwrap_or_default()),
        address: Set(fields.address),
        created: Set(now),
        modified: Set(now),
    }
    .insert(db)
    .await
}

/// Merge `changes` over `current` and write every column back.
pub async fn update<C: ConnectionTrait>(
    db: &C,
    current: artist::Model,
    changes: ArtistFields,
) -> Result<artist::Model, DbErr> {
    let merged = artist::ActiveModel {
        id: Set(current.id),
        name: Set(merge_option(changes.name, current.name)),
        first_release_year: Set(merge_option(
            changes.first_release_year,
            current.first_release_year,
        )),
        no_of_albums_released: Set(merge_option(
            changes.no_of_albums_released,
            current.no_of_albums_released,
        )),
        date_of_birth: Set(merge_option(changes.date_of_birth, current.date_of_birth)),
        gender: Set(merge_field(changes.gender, current.gender)),
        address: Set(merge_option(changes.address, current.address)),
        created: Set(current.created),
        modified: Set(Utc::now().fixed_offset()),
    };
    merged.update(db).await
}

/// Remove the artist and every music credit pointing at it. Music rows stay.
pub async fn delete<C: ConnectionTrait>(db: &C, artist: artist::Model) -> Result<(), DbErr> {
    music_artist::Entity::delete_many()
        .filter(music_artist::Column::ArtistId.eq(artist.id))
        .exec(db)
        .await?;
    artist.delete(db).await?;
    Ok(())
}
