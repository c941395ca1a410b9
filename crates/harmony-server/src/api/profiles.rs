use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use chrono::NaiveDate;
use harmony_db::entities::Gender;
use harmony_db::AppState;
use sea_orm::TransactionTrait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use super::extract::{JsonBody, UrlPath, UrlQuery};
use super::{PaginatedResponse, PaginationParams};
use crate::error::ApiResult;
use crate::service::profiles::{self, CreateProfileRequest, ProfileInput, ProfileWithUser};

#[derive(Debug, Serialize, Deserialize)]
pub struct ProfileResponse {
    pub id: Uuid,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub full_name: String,
    pub date_of_birth: Option<NaiveDate>,
    pub gender: Gender,
    pub address: Option<String>,
    pub phone: Option<String>,
}

impl From<ProfileWithUser> for ProfileResponse {
    fn from((p, u): ProfileWithUser) -> Self {
        Self {
            id: p.id,
            email: u.email,
            full_name: p.full_name(),
            first_name: p.first_name,
            last_name: p.last_name,
            date_of_birth: p.date_of_birth.map(|d| d.date_naive()),
            gender: p.gender,
            address: p.address,
            phone: p.phone,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ProfileMessage {
    pub message: String,
    pub profile: ProfileResponse,
}

/// GET /profiles
pub async fn list_profiles(
    State(state): State<Arc<AppState>>,
    UrlQuery(params): UrlQuery<PaginationParams>,
) -> ApiResult<Json<PaginatedResponse<ProfileResponse>>> {
    let (page, page_size) = params.resolve();
    let result = profiles::list(&state.db, page, page_size).await?;
    Ok(Json(PaginatedResponse::from_page(result, page, page_size)))
}

/// GET /profiles/{id}
pub async fn get_profile(
    State(state): State<Arc<AppState>>,
    UrlPath(id): UrlPath<Uuid>,
) -> ApiResult<Json<ProfileResponse>> {
    Ok(Json(profiles::get(&state.db, id).await?.into()))
}

/// POST /profiles
pub async fn create_profile(
    State(state): State<Arc<AppState>>,
    JsonBody(req): JsonBody<CreateProfileRequest>,
) -> ApiResult<(StatusCode, Json<ProfileMessage>)> {
    let txn = state.db.begin().await?;
    let created = profiles::create(&txn, req).await?;
    txn.commit().await?;

    Ok((
        StatusCode::CREATED,
        Json(ProfileMessage {
            message: "Profile created successfully".to_string(),
            profile: created.into(),
        }),
    ))
}

/// PUT|PATCH /profiles/{id}
pub async fn update_profile(
    State(state): State<Arc<AppState>>,
    UrlPath(id): UrlPath<Uuid>,
    JsonBody(input): JsonBody<ProfileInput>,
) -> ApiResult<Json<ProfileMessage>> {
    let txn = state.db.begin().await?;
    let updated = profiles::update(&txn, id, input).await?;
    txn.commit().await?;

    Ok(Json(ProfileMessage {
        message: "Profile updated successfully.".to_string(),
        profile: updated.into(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use harmony_db::entities::{profile, user};

    #[test]
    fn test_profile_response_flattens_user_and_date() {
        let now = Utc::now().fixed_offset();
        let user = user::Model {
            id: Uuid::new_v4(),
            email: "ada@example.com".into(),
            password: "hash".into(),
            is_staff: false,
            is_superuser: false,
            is_active: true,
            date_joined: now,
            created: now,
            modified: now,
        };
        let profile = profile::Model {
            id: Uuid::new_v4(),
            user_id: user.id,
            first_name: Some("Ada".into()),
            last_name: Some("Lovelace".into()),
            phone: Some("9800000000".into()),
            date_of_birth: Some(Utc.with_ymd_and_hms(1815, 12, 10, 13, 30, 0).unwrap().fixed_offset()),
            gender: Gender::Female,
            address: None,
            created: now,
            modified: now,
        };

        let json = serde_json::to_value(ProfileResponse::from((profile, user))).unwrap();
        assert_eq!(json["email"], "ada@example.com");
        assert_eq!(json["full_name"], "Ada Lovelace");
        assert_eq!(json["date_of_birth"], "1815-12-10");
        assert_eq!(json["gender"], "female");
        assert!(json["address"].is_null());
    }

    #[test]
    fn test_create_request_flattens_fields() {
        let req: CreateProfileRequest = serde_json::from_str(
            r#"{"email":"ada@example.com","first_name":"Ada","gender":"others"}"#,
        )
        .unwrap();
        assert_eq!(req.email, "ada@example.com");
        assert_eq!(req.fields.first_name.as_deref(), Some("Ada"));
        assert_eq!(req.fields.gender, Some(Gender::Others));
        assert!(req.fields.date_of_birth.is_none());
    }
}
