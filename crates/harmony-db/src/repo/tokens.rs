use chrono::{DateTime, FixedOffset, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, Set,
};
use uuid::Uuid;

use crate::entities::auth_token;

pub async fn create<C: ConnectionTrait>(
    db: &C,
    user_id: Uuid,
    expires_at: DateTime<FixedOffset>,
) -> Result<auth_token::Model, DbErr> {
    auth_token::ActiveModel {
        id: Set(Uuid::new_v4()),
        user_id: Set(user_id),
        created: Set(Utc::now().fixed_offset()),
        expires_at: Set(expires_at),
    }
    .insert(db)
    .await
}

pub async fn find_by_id<C: ConnectionTrait>(
    db: &C,
    id: Uuid,
) -> Result<Option<auth_token::Model>, DbErr> {
    auth_token::Entity::find_by_id(id).one(db).await
}

pub async fn count_for_user<C: ConnectionTrait>(db: &C, user_id: Uuid) -> Result<u64, DbErr> {
    auth_token::Entity::find()
        .filter(auth_token::Column::UserId.eq(user_id))
        .count(db)
        .await
}

/// Returns how many tokens were revoked.
pub async fn delete_for_user<C: ConnectionTrait>(db: &C, user_id: Uuid) -> Result<u64, DbErr> {
    let res = auth_token::Entity::delete_many()
        .filter(auth_token::Column::UserId.eq(user_id))
        .exec(db)
        .await?;
    Ok(res.rows_affected)
}
