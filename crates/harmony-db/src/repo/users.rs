use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, ModelTrait,
    PaginatorTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use super::{page_bounds, Page};
use crate::entities::user;

/// Fields for inserting a user. `password_hash` must already be hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
    pub is_staff: bool,
    pub is_superuser: bool,
}

pub async fn find_by_id<C: ConnectionTrait>(db: &C, id: Uuid) -> Result<Option<user::Model>, DbErr> {
    user::Entity::find_by_id(id).one(db).await
}

pub async fn find_by_email<C: ConnectionTrait>(
    db: &C,
    email: &str,
) -> Result<Option<user::Model>, DbErr> {
    user::Entity::find()
        .filter(user::Column::Email.eq(email))
        .one(db)
        .await
}

pub async fn email_exists<C: ConnectionTrait>(db: &C, email: &str) -> Result<bool, DbErr> {
    let count = user::Entity::find()
        .filter(user::Column::Email.eq(email))
        .count(db)
        .await?;
    Ok(count > 0)
}

pub async fn list<C: ConnectionTrait>(
    db: &C,
    page: u64,
    page_size: u64,
) -> Result<Page<user::Model>, DbErr> {
    let (index, size) = page_bounds(page, page_size);
    let paginator = user::Entity::find()
        .order_by_asc(user::Column::DateJoined)
        .order_by_asc(user::Column::Id)
        .paginate(db, size);
    let total = paginator.num_items().await?;
    let items = paginator.fetch_page(index).await?;
    Ok(Page { items, total })
}

pub async fn create<C: ConnectionTrait>(db: &C, new: NewUser) -> Result<user::Model, DbErr> {
    let now = Utc::now().fixed_offset();
    user::ActiveModel {
        id: Set(Uuid::new_v4()),
        email: Set(new.email),
        password: Set(new.password_hash),
        is_staff: Set(new.is_staff),
        is_superuser: Set(new.is_superuser),
        is_active: Set(true),
        date_joined: Set(now),
        created: Set(now),
        modified: Set(now),
    }
    .insert(db)
    .await
}

pub async fn set_password<C: ConnectionTrait>(
    db: &C,
    user: user::Model,
    password_hash: String,
) -> Result<user::Model, DbErr> {
    let mut active: user::ActiveModel = user.into();
    active.password = Set(password_hash);
    active.modified = Set(Utc::now().fixed_offset());
    active.update(db).await
}

pub async fn delete<C: ConnectionTrait>(db: &C, user: user::Model) -> Result<(), DbErr> {
    user.delete(db).await?;
    Ok(())
}
