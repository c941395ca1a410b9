use harmony_db::entities::{artist, Gender};
use harmony_db::repo::{self, artists::ArtistFields, Page};
use sea_orm::ConnectionTrait;
use serde::Deserialize;
use serde_json::Value;
use uuid::Uuid;

use super::{count_field, past_date_field};
use crate::error::{ApiError, ApiResult};

pub const ARTIST_NOT_FOUND: &str = "Artist not found.";
const INVALID_RELEASE_YEAR: &str = "Please enter a valid release year";
const INVALID_ALBUM_COUNT: &str = "Please enter a valid number of albums released.";
const FUTURE_BIRTH_DATE: &str = "Date of birth must not be greater than present date.";

/// Artist fields as they arrive over the wire. The counters accept numbers or
/// numeric strings.
#[derive(Debug, Default, Deserialize)]
pub struct ArtistInput {
    pub name: Option<String>,
    pub first_release_year: Option<Value>,
    pub no_of_albums_released: Option<Value>,
    pub date_of_birth: Option<String>,
    pub gender: Option<Gender>,
    pub address: Option<String>,
}

impl ArtistInput {
    fn into_fields(self) -> ApiResult<ArtistFields> {
        Ok(ArtistFields {
            first_release_year: count_field(
                self.first_release_year.as_ref(),
                INVALID_RELEASE_YEAR,
            )?,
            no_of_albums_released: count_field(
                self.no_of_albums_released.as_ref(),
                INVALID_ALBUM_COUNT,
            )?,
            date_of_birth: past_date_field(self.date_of_birth.as_deref(), FUTURE_BIRTH_DATE)?,
            name: self.name,
            gender: self.gender,
            address: self.address,
        })
    }
}

pub async fn get<C: ConnectionTrait>(db: &C, id: Uuid) -> ApiResult<artist::Model> {
    repo::artists::find_by_id(db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound(ARTIST_NOT_FOUND.to_string()))
}

pub async fn list<C: ConnectionTrait>(
    db: &C,
    page: u64,
    page_size: u64,
) -> ApiResult<Page<artist::Model>> {
    Ok(repo::artists::list(db, page, page_size).await?)
}

pub async fn create<C: ConnectionTrait>(db: &C, input: ArtistInput) -> ApiResult<artist::Model> {
    let fields = input.into_fields()?;
    Ok(repo::artists::create(db, fields).await?)
}

pub async fn update<C: ConnectionTrait>(
    db: &C,
    id: Uuid,
    input: ArtistInput,
) -> ApiResult<artist::Model> {
    let current = get(db, id).await?;
    let changes = input.into_fields()?;
    Ok(repo::artists::update(db, current, changes).await?)
}

/// Drops the artist's music credits with it. Music rows are kept.
pub async fn delete<C: ConnectionTrait>(db: &C, id: Uuid) -> ApiResult<()> {
    let artist = get(db, id).await?;
    repo::artists::delete(db, artist).await?;
    tracing::info!(artist_id = %id, "artist deleted");
    Ok(())
}
