pub mod artist;
pub mod auth_token;
pub mod music;
pub mod music_artist;
pub mod profile;
pub mod user;

pub use artist::Entity as Artist;
pub use auth_token::Entity as AuthToken;
pub use music::Entity as Music;
pub use music_artist::Entity as MusicArtist;
pub use profile::Entity as Profile;
pub use user::Entity as User;

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Gender choice shared by profiles and artists.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    #[default]
    #[sea_orm(string_value = "male")]
    Male,
    #[sea_orm(string_value = "female")]
    Female,
    #[sea_orm(string_value = "others")]
    Others,
}

impl Gender {
    pub fn as_str(&self) -> &str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
            Gender::Others => "others",
        }
    }
}

impl std::fmt::Display for Gender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
