use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "lowercase")]
pub enum Genre {
    #[default]
    #[sea_orm(string_value = "rnb")]
    Rnb,
    #[sea_orm(string_value = "country")]
    Country,
    #[sea_orm(string_value = "classic")]
    Classic,
    #[sea_orm(string_value = "rock")]
    Rock,
    #[sea_orm(string_value = "jazz")]
    Jazz,
    #[sea_orm(string_value = "pop")]
    Pop,
}

impl Genre {
    pub fn as_str(&self) -> &str {
        match self {
            Genre::Rnb => "rnb",
            Genre::Country => "country",
            Genre::Classic => "classic",
            Genre::Rock => "rock",
            Genre::Jazz => "jazz",
            Genre::Pop => "pop",
        }
    }
}

impl std::fmt::Display for Genre {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "musics")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub title: Option<String>,
    pub album_name: Option<String>,
    pub release_date: Option<DateTimeWithTimeZone>,
    pub genre: Genre,
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

impl Related<super::artist::Entity> for Entity {
    fn to() -> RelationDef {
        super::music_artist::Relation::Artist.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::music_artist::Relation::Music.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
