use sea_orm::entity::prelude::*;

crate::id_type!(
    /// Id of a game
    GameId
);

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "game")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub date: DateTimeWithTimeZone,
    #[sea_orm(column_type = "Text")]
    pub first_team: String,
    #[sea_orm(column_type = "Text")]
    pub second_team: String,
    pub created_at: DateTimeWithTimeZone,
}

impl Model {
    pub fn game_id(&self) -> GameId {
        GameId::from(self.id)
    }

    /// If the game started before `now`, so it can no longer be guessed
    pub fn started_before(&self, now: DateTimeWithTimeZone) -> bool {
        self.date < now
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::guess::Entity")]
    Guess,
}

impl Related<super::guess::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Guess.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
