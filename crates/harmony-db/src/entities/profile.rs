use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::Gender;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "user_profiles")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub user_id: Uuid,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub date_of_birth: Option<DateTimeWithTimeZone>,
    pub gender: Gender,
    pub address: Option<String>,
    pub created: DateTimeWithTimeZone,
    pub modified: DateTimeWithTimeZone,
}

impl Model {
    /// "first last", skipping whichever half is missing.
    pub fn full_name(&self) -> String {
        [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
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

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn profile(first: Option<&str>, last: Option<&str>) -> Model {
        let now = Utc::now().fixed_offset();
        Model {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            first_name: first.map(str::to_string),
            last_name: last.map(str::to_string),
            phone: None,
            date_of_birth: None,
            gender: Gender::default(),
            address: None,
            created: now,
            modified: now,
        }
    }

    #[test]
    fn test_full_name_both_parts() {
        assert_eq!(profile(Some("Ada"), Some("Lovelace")).full_name(), "Ada Lovelace");
    }

    #[test]
    fn test_full_name_partial() {
        assert_eq!(profile(Some("Ada"), None).full_name(), "Ada");
        assert_eq!(profile(None, Some("Lovelace")).full_name(), "Lovelace");
        assert_eq!(profile(Some(""), Some("Lovelace")).full_name(), "Lovelace");
    }

    #[test]
    fn test_full_name_empty() {
        assert_eq!(profile(None, None).full_name(), "");
    }
}
