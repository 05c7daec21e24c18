use sea_orm_migration::{
    prelude::*,
    schema::{pk_uuid, text, timestamp_with_time_zone, uuid, uuid_null},
};

use crate::m20241023_221153_create_table_users::User;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Pool::Table)
                    .comment("Pools in which users compete guessing the result of games")
                    .if_not_exists()
                    .col(
                        pk_uuid(Pool::Id)
                            .comment("UUID of the pool")
                            .default(PgFunc::gen_random_uuid()),
                    )
                    .col(
                        text(Pool::Title)
                            .comment("Title of the pool, cannot be empty")
                            .check(Expr::expr(Func::char_length(Expr::col(Pool::Title))).gt(0)),
                    )
                    .col(
                        text(Pool::Code)
                            .comment("Short code other users can use to join the pool")
                            .unique_key()
                            .check(Expr::expr(Func::char_length(Expr::col(Pool::Code))).eq(6)),
                    )
                    .col(
                        uuid_null(Pool::OwnerId)
                            .comment("Owner of the pool. `null` for pools created anonymously, until someone joins"),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Pool::Table, Pool::OwnerId)
                            .to(User::Table, User::Id)
                            .on_update(ForeignKeyAction::Cascade)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .col(
                        timestamp_with_time_zone(Pool::CreatedAt)
                            .comment("Timestamp marking when the pool was created, defaults to the current time")
                            .default(Expr::current_timestamp()),
                    )
                    .take(),
            )
            .await?;
        manager
            .create_table(
                Table::create()
                    .table(Participant::Table)
                    .comment("Membership of users into pools")
                    .if_not_exists()
                    .col(
                        pk_uuid(Participant::Id)
                            .comment("UUID of the participation")
                            .default(PgFunc::gen_random_uuid()),
                    )
                    .col(uuid(Participant::PoolId).comment("Identifier of the pool joined"))
                    .foreign_key(
                        ForeignKey::create()
                            .from(Participant::Table, Participant::PoolId)
                            .to(Pool::Table, Pool::Id)
                            .on_update(ForeignKeyAction::Cascade)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .col(uuid(Participant::UserId).comment("Identifier of the user joining the pool"))
                    .foreign_key(
                        ForeignKey::create()
                            .from(Participant::Table, Participant::UserId)
                            .to(User::Table, User::Id)
                            .on_update(ForeignKeyAction::Cascade)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .index(
                        Index::create()
                            .name("participant_user_pool_unique")
                            .unique()
                            .col(Participant::UserId)
                            .col(Participant::PoolId),
                    )
                    .col(
                        timestamp_with_time_zone(Participant::JoinedAt)
                            .comment("Timestamp marking when the user joined the pool, defaults to the current time")
                            .default(Expr::current_timestamp()),
                    )
                    .take(),
            )
            .await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Participant::Table).if_exists().take())
            .await?;
        manager
            .drop_table(Table::drop().table(Pool::Table).if_exists().take())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
pub(super) enum Pool {
    Table,
    Id,
    Title,
    Code,
    OwnerId,
    CreatedAt,
}

#[derive(DeriveIden)]
pub(super) enum Participant {
    Table,
    Id,
    PoolId,
    UserId,
    JoinedAt,
}
