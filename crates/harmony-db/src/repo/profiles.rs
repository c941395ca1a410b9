use chrono::{DateTime, FixedOffset, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use super::{merge_field, merge_option, page_bounds, Page};
use crate::entities::{profile, user, Gender};

/// Profile row together with its owning user.
pub type ProfileWithUser = (profile::Model, Option<user::Model>);

/// Profile fields as supplied by a caller. On create, `None` means "not set";
/// on update, `None` or an empty string means "keep the stored value".
#[derive(Debug, Clone, Default)]
pub struct ProfileFields {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub date_of_birth: Option<DateTime<FixedOffset>>,
    pub gender: Option<Gender>,
    pub address: Option<String>,
}

pub async fn find_by_id<C: ConnectionTrait>(
    db: &C,
    id: Uuid,
) -> Result<Option<profile::Model>, DbErr> {
    profile::Entity::find_by_id(id).one(db).await
}

pub async fn find_with_user<C: ConnectionTrait>(
    db: &C,
    id: Uuid,
) -> Result<Option<ProfileWithUser>, DbErr> {
    profile::Entity::find_by_id(id)
        .find_also_related(user::Entity)
        .one(db)
        .await
}

pub async fn find_by_user_id<C: ConnectionTrait>(
    db: &C,
    user_id: Uuid,
) -> Result<Option<profile::Model>, DbErr> {
    profile::Entity::find()
        .filter(profile::Column::UserId.eq(user_id))
        .one(db)
        .await
}

pub async fn list_with_users<C: ConnectionTrait>(
    db: &C,
    page: u64,
    page_size: u64,
) -> Result<Page<ProfileWithUser>, DbErr> {
    let (index, size) = page_bounds(page, page_size);
    let paginator = profile::Entity::find()
        .find_also_related(user::Entity)
        .order_by_asc(profile::Column::Created)
        .order_by_asc(profile::Column::Id)
        .paginate(db, size);
    let total = paginator.num_items().await?;
    let items = paginator.fetch_page(index).await?;
    Ok(Page { items, total })
}

pub async fn create<C: ConnectionTrait>(
    db: &C,
    user_id: Uuid,
    fields: ProfileFields,
) -> Result<profile::Model, DbErr> {
    let now = Utc::now().fixed_offset();
    profile::ActiveModel {
        id: Set(Uuid::new_v4()),
        user_id: Set(user_id),
        first_name: Set(fields.first_name),
        last_name: Set(fields.last_name),
        phone: Set(fields.phone),
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
    current: profile::Model,
    changes: ProfileFields,
) -> Result<profile::Model, DbErr> {
    let merged = profile::ActiveModel {
        id: Set(current.id),
        user_id: Set(current.user_id),
        first_name: Set(merge_option(changes.first_name, current.first_name)),
        last_name: Set(merge_option(changes.last_name, current.last_name)),
        phone: Set(merge_option(changes.phone, current.phone)),
        date_of_birth: Set(merge_option(changes.date_of_birth, current.date_of_birth)),
        gender: Set(merge_field(changes.gender, current.gender)),
        address: Set(merge_option(changes.address, current.address)),
        created: Set(current.created),
        modified: Set(Utc::now().fixed_offset()),
    };
    merged.update(db).await
}

/// Returns how many rows were removed (zero or one).
pub async fn delete_for_user<C: ConnectionTrait>(db: &C, user_id: Uuid) -> Result<u64, DbErr> {
    let res = profile::Entity::delete_many()
        .filter(profile::Column::UserId.eq(user_id))
        .exec(db)
        .await?;
    Ok(res.rows_affected)
}
