use sea_orm_migration::{
    prelude::*,
    schema::{pk_uuid, text, timestamp_with_time_zone},
};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Game::Table)
                    .comment("Matches whose result can be guessed")
                    .if_not_exists()
                    .col(
                        pk_uuid(Game::Id)
                            .comment("UUID of the game")
                            .default(PgFunc::gen_random_uuid()),
                    )
                    .col(
                        timestamp_with_time_zone(Game::Date)
                            .comment("Kick-off of the game. No guesses are accepted after this moment"),
                    )
                    .col(
                        text(Game::FirstTeam)
                            .comment("Name of the first team")
                            .check(Expr::expr(Func::char_length(Expr::col(Game::FirstTeam))).gt(0)),
                    )
                    .col(
                        text(Game::SecondTeam)
                            .comment("Name of the second team, different from the first")
                            .check(Expr::expr(Func::char_length(Expr::col(Game::SecondTeam))).gt(0))
                            .check(Expr::col(Game::SecondTeam).ne(Expr::col(Game::FirstTeam))),
                    )
                    .col(
                        timestamp_with_time_zone(Game::CreatedAt)
                            .comment("Timestamp marking when the game was registered, defaults to the current time")
                            .default(Expr::current_timestamp()),
                    )
                    .take(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("game_date_idx")
                    .table(Game::Table)
                    .col(Game::Date)
                    .if_not_exists()
                    .take(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Game::Table).if_exists().take())
            .await
    }
}

#[derive(DeriveIden)]
pub(super) enum Game {
    Table,
    Id,
    Date,
    FirstTeam,
    SecondTeam,
    CreatedAt,
}
