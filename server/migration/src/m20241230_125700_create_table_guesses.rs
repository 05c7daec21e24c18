use sea_orm_migration::{
    prelude::*,
    schema::{integer, pk_uuid, timestamp_with_time_zone, uuid},
};

use crate::{
    m20241101_171000_create_table_pools::Participant, m20241210_211300_create_table_games::Game,
};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Guess::Table)
                    .comment("Predicted score of a game, made by a participant of a pool")
                    .if_not_exists()
                    .col(
                        pk_uuid(Guess::Id)
                            .comment("UUID of the guess")
                            .default(PgFunc::gen_random_uuid()),
                    )
                    .col(uuid(Guess::ParticipantId).comment("Participation under which the guess was made"))
                    .foreign_key(
                        ForeignKey::create()
                            .from(Guess::Table, Guess::ParticipantId)
                            .to(Participant::Table, Participant::Id)
                            .on_update(ForeignKeyAction::Cascade)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .col(uuid(Guess::GameId).comment("Game that is guessed"))
                    .foreign_key(
                        ForeignKey::create()
                            .from(Guess::Table, Guess::GameId)
                            .to(Game::Table, Game::Id)
                            .on_update(ForeignKeyAction::Cascade)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .index(
                        Index::create()
                            .name("guess_participant_game_unique")
                            .unique()
                            .col(Guess::ParticipantId)
                            .col(Guess::GameId),
                    )
                    .col(
                        integer(Guess::FirstTeamPoints)
                            .comment("Points predicted for the first team")
                            .check(Expr::col(Guess::FirstTeamPoints).gte(0)),
                    )
                    .col(
                        integer(Guess::SecondTeamPoints)
                            .comment("Points predicted for the second team")
                            .check(Expr::col(Guess::SecondTeamPoints).gte(0)),
                    )
                    .col(
                        timestamp_with_time_zone(Guess::CreatedAt)
                            .comment("Timestamp marking when the guess was sent, defaults to the current time")
                            .default(Expr::current_timestamp()),
                    )
                    .take(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Guess::Table).if_exists().take())
            .await
    }
}

#[derive(DeriveIden)]
enum Guess {
    Table,
    Id,
    ParticipantId,
    GameId,
    FirstTeamPoints,
    SecondTeamPoints,
    CreatedAt,
}
