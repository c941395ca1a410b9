use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::Gender;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "artists")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: Option<String>,
    pub first_release_year: Option<i32>,
    pub no_of_albums_released: Option<i32>,
    pub date_of_birth: Option<DateTimeWithTimeZone>,
    pub gender: Gender,
    pub address: Option<String>,
    pub created: DateTimeWithTimeZone,
    pub modified: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::music_artist::Entity")]
    MusicArtist,
}

impl Related<super::music_artist::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MusicArtist.def()
    }
}

impl Related<super::music::Entity> for Entity {
    fn to() -> RelationDef {
        super::music_artist::Relation::Music.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::music_artist::Relation::Artist.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
