pub use sea_orm_migration::prelude::*;

mod m20240101_000001_create_users;
mod m20240101_000002_create_user_profiles;
mod m20240101_000003_create_artists;
mod m20240101_000004_create_musics;
mod m20240101_000005_create_music_artists;
mod m20240101_000006_create_auth_tokens;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_create_users::Migration),
            Box::new(m20240101_000002_create_user_profiles::Migration),
            Box::new(m20240101_000003_create_artists::Migration),
            Box::new(m20240101_000004_create_musics::Migration),
            Box::new(m20240101_000005_create_music_artists::Migration),
            Box::new(m20240101_000006_create_auth_tokens::Migration),
        ]
    }
}
