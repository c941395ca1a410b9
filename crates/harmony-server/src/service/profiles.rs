use harmony_db::entities::{profile, user, Gender};
use harmony_db::repo::{self, profiles::ProfileFields, Page};
use sea_orm::ConnectionTrait;
use serde::Deserialize;
use uuid::Uuid;

use super::past_date_field;
use crate::error::{ApiError, ApiResult};
use crate::validation::normalize_email;

pub const PROFILE_NOT_FOUND: &str = "Profile not found.";
const FUTURE_BIRTH_DATE: &str = "Date of birth must not be greater than present date.";

/// Editable profile fields as they arrive over the wire.
#[derive(Debug, Default, Deserialize)]
pub struct ProfileInput {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub date_of_birth: Option<String>,
    pub gender: Option<Gender>,
    pub address: Option<String>,
}

impl ProfileInput {
    fn into_fields(self) -> ApiResult<ProfileFields> {
        Ok(ProfileFields {
            date_of_birth: past_date_field(self.date_of_birth.as_deref(), FUTURE_BIRTH_DATE)?,
            first_name: self.first_name,
            last_name: self.last_name,
            phone: self.phone,
            gender: self.gender,
            address: self.address,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateProfileRequest {
    /// Email of the user the profile belongs to
    pub email: String,
    #[serde(flatten)]
    pub fields: ProfileInput,
}

pub type ProfileWithUser = (profile::Model, user::Model);

fn attach_user(row: repo::profiles::ProfileWithUser) -> ApiResult<ProfileWithUser> {
    match row {
        (profile, Some(user)) => Ok((profile, user)),
        (profile, None) => Err(ApiError::Internal(format!(
            "profile {} has no owning user",
            profile.id
        ))),
    }
}

pub async fn get<C: ConnectionTrait>(db: &C, id: Uuid) -> ApiResult<ProfileWithUser> {
    let row = repo::profiles::find_with_user(db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound(PROFILE_NOT_FOUND.to_string()))?;
    attach_user(row)
}

pub async fn list<C: ConnectionTrait>(
    db: &C,
    page: u64,
    page_size: u64,
) -> ApiResult<Page<ProfileWithUser>> {
    let page = repo::profiles::list_with_users(db, page, page_size).await?;
    let items = page
        .items
        .into_iter()
        .map(attach_user)
        .collect::<ApiResult<Vec<_>>>()?;
    Ok(Page {
        items,
        total: page.total,
    })
}

pub async fn create<C: ConnectionTrait>(
    db: &C,
    req: CreateProfileRequest,
) -> ApiResult<ProfileWithUser> {
    let email = normalize_email(&req.email);
    let user = repo::users::find_by_email(db, &email)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("User with email '{email}' not found.")))?;
    let fields = req.fields.into_fields()?;

    if repo::profiles::find_by_user_id(db, user.id).await?.is_some() {
        return Err(ApiError::Conflict("Profile already exists.".to_string()));
    }

    let profile = repo::profiles::create(db, user.id, fields).await?;
    Ok((profile, user))
}

/// Supplied non-empty fields overwrite; everything else keeps its stored value.
pub async fn update<C: ConnectionTrait>(
    db: &C,
    id: Uuid,
    input: ProfileInput,
) -> ApiResult<ProfileWithUser> {
    let (current, user) = get(db, id).await?;
    let changes = input.into_fields()?;
    let profile = repo::profiles::update(db, current, changes).await?;
    Ok((profile, user))
}
