pub use sea_orm_migration::prelude::*;

mod m20241023_221153_create_table_users;
mod m20241101_171000_create_table_pools;
mod m20241210_211300_create_table_games;
mod m20241230_125700_create_table_guesses;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20241023_221153_create_table_users::Migration),
            Box::new(m20241101_171000_create_table_pools::Migration),
            Box::new(m20241210_211300_create_table_games::Migration),
            Box::new(m20241230_125700_create_table_guesses::Migration),
        ]
    }
}
