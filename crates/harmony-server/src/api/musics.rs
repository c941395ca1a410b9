use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use chrono::NaiveDate;
use harmony_db::entities::music::{self, Genre};
use harmony_db::AppState;
use sea_orm::TransactionTrait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use super::extract::{JsonBody, UrlPath, UrlQuery};
use super::{MessageResponse, PaginatedResponse, PaginationParams};
use crate::error::ApiResult;
use crate::service::musics::{self, MusicInput, MusicWithArtists};

/// Music fields without artist credits.
#[derive(Debug, Serialize, Deserialize)]
pub struct MusicSummary {
    pub id: Uuid,
    pub title: Option<String>,
    pub album_name: Option<String>,
    pub release_date: Option<NaiveDate>,
    pub genre: Genre,
}

impl From<music::Model> for MusicSummary {
    fn from(m: music::Model) -> Self {
        Self {
            id: m.id,
            title: m.title,
            album_name: m.album_name,
            release_date: m.release_date.map(|d| d.date_naive()),
            genre: m.genre,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MusicResponse {
    #[serde(flatten)]
    pub music: MusicSummary,
    pub artists: Vec<String>,
}

impl From<MusicWithArtists> for MusicResponse {
    fn from(m: MusicWithArtists) -> Self {
        Self {
            music: m.music.into(),
            artists: m.artists,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MusicMessage {
    pub message: String,
    pub music: MusicResponse,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MusicListResponse {
    pub musics: Vec<MusicSummary>,
}

/// GET /musics
pub async fn list_musics(
    State(state): State<Arc<AppState>>,
    UrlQuery(params): UrlQuery<PaginationParams>,
) -> ApiResult<Json<PaginatedResponse<MusicResponse>>> {
    let (page, page_size) = params.resolve();
    let result = musics::list(&state.db, page, page_size).await?;
    Ok(Json(PaginatedResponse::from_page(result, page, page_size)))
}

/// GET /musics/{id}
pub async fn get_music(
    State(state): State<Arc<AppState>>,
    UrlPath(id): UrlPath<Uuid>,
) -> ApiResult<Json<MusicResponse>> {
    Ok(Json(musics::get(&state.db, id).await?.into()))
}

/// GET /musics/by_artist/{artist_id}
pub async fn musics_by_artist(
    State(state): State<Arc<AppState>>,
    UrlPath(artist_id): UrlPath<Uuid>,
) -> ApiResult<Json<MusicListResponse>> {
    let rows = musics::by_artist(&state.db, artist_id).await?;
    Ok(Json(MusicListResponse {
        musics: rows.into_iter().map(MusicSummary::from).collect(),
    }))
}

/// POST /musics
pub async fn create_music(
    State(state): State<Arc<AppState>>,
    JsonBody(input): JsonBody<MusicInput>,
) -> ApiResult<(StatusCode, Json<MusicMessage>)> {
    let txn = state.db.begin().await?;
    let created = musics::create(&txn, input).await?;
    txn.commit().await?;

    Ok((
        StatusCode::CREATED,
        Json(MusicMessage {
            message: "Music added successfully.".to_string(),
            music: created.into(),
        }),
    ))
}

/// PUT|PATCH /musics/{id}
pub async fn update_music(
    State(state): State<Arc<AppState>>,
    UrlPath(id): UrlPath<Uuid>,
    JsonBody(input): JsonBody<MusicInput>,
) -> ApiResult<Json<MusicMessage>> {
    let txn = state.db.begin().await?;
    let updated = musics::update(&txn, id, input).await?;
    txn.commit().await?;

    Ok(Json(MusicMessage {
        message: "Music updated successfully".to_string(),
        music: updated.into(),
    }))
}

/// DELETE /musics/{id} (admin)
pub async fn delete_music(
    State(state): State<Arc<AppState>>,
    UrlPath(id): UrlPath<Uuid>,
) -> ApiResult<Json<MessageResponse>> {
    let txn = state.db.begin().await?;
    musics::delete(&txn, id).await?;
    txn.commit().await?;

    Ok(Json(MessageResponse::new("Music deleted successfully.")))
}
