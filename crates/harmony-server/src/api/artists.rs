use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use chrono::NaiveDate;
use harmony_db::entities::{artist, Gender};
use harmony_db::AppState;
use sea_orm::TransactionTrait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use super::extract::{JsonBody, UrlPath, UrlQuery};
use super::{MessageResponse, PaginatedResponse, PaginationParams};
use crate::error::ApiResult;
use crate::service::artists::{self, ArtistInput};

#[derive(Debug, Serialize, Deserialize)]
pub struct ArtistResponse {
    pub id: Uuid,
    pub name: Option<String>,
    pub first_release_year: Option<i32>,
    pub no_of_albums_released: Option<i32>,
    pub date_of_birth: Option<NaiveDate>,
    pub gender: Gender,
    pub address: Option<String>,
}

impl From<artist::Model> for ArtistResponse {
    fn from(a: artist::Model) -> Self {
        Self {
            id: a.id,
            name: a.name,
            first_release_year: a.first_release_year,
            no_of_albums_released: a.no_of_albums_released,
            date_of_birth: a.date_of_birth.map(|d| d.date_naive()),
            gender: a.gender,
            address: a.address,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ArtistMessage {
    pub message: String,
    pub artist: ArtistResponse,
}

/// GET /artists
pub async fn list_artists(
    State(state): State<Arc<AppState>>,
    UrlQuery(params): UrlQuery<PaginationParams>,
) -> ApiResult<Json<PaginatedResponse<ArtistResponse>>> {
    let (page, page_size) = params.resolve();
    let result = artists::list(&state.db, page, page_size).await?;
    Ok(Json(PaginatedResponse::from_page(result, page, page_size)))
}

/// GET /artists/{id}
pub async fn get_artist(
    State(state): State<Arc<AppState>>,
    UrlPath(id): UrlPath<Uuid>,
) -> ApiResult<Json<ArtistResponse>> {
    Ok(Json(artists::get(&state.db, id).await?.into()))
}

/// POST /artists
pub async fn create_artist(
    State(state): State<Arc<AppState>>,
    JsonBody(input): JsonBody<ArtistInput>,
) -> ApiResult<(StatusCode, Json<ArtistMessage>)> {
    let txn = state.db.begin().await?;
    let artist = artists::create(&txn, input).await?;
    txn.commit().await?;

    Ok((
        StatusCode::CREATED,
        Json(ArtistMessage {
            message: "Artist created successfully".to_string(),
            artist: artist.into(),
        }),
    ))
}

/// PUT|PATCH /artists/{id}
pub async fn update_artist(
    State(state): State<Arc<AppState>>,
    UrlPath(id): UrlPath<Uuid>,
    JsonBody(input): JsonBody<ArtistInput>,
) -> ApiResult<Json<ArtistMessage>> {
    let txn = state.db.begin().await?;
    let artist = artists::update(&txn, id, input).await?;
    txn.commit().await?;

    Ok(Json(ArtistMessage {
        message: "Artist updated successfully".to_string(),
        artist: artist.into(),
    }))
}

/// DELETE /artists/{id}
pub async fn delete_artist(
    State(state): State<Arc<AppState>>,
    UrlPath(id): UrlPath<Uuid>,
) -> ApiResult<Json<MessageResponse>> {
    let txn = state.db.begin().await?;
    artists::delete(&txn, id).await?;
    txn.commit().await?;

    Ok(Json(MessageResponse::new("Artist deleted successfully.")))
}
