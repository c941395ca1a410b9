use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Server-side record of an issued access token. The id doubles as the
/// token's `jti` claim; deleting the row revokes the token.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "auth_tokens")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    pub created: DateTimeWithTimeZone,
    pub expires_at: DateTimeWithTimeZone,
}

impl Model {
    pub fn is_expired_at(&self, now: DateTimeWithTimeZone) -> bool {
        self.expires_at <= now
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id"
    )]
    User,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
