use sea_orm::entity::prelude::*;

crate::id_type!(
    /// Id of the membership of a user into a pool
    ParticipantId
);

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "participant")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub pool_id: Uuid,
    pub user_id: Uuid,
    pub joined_at: DateTimeWithTimeZone,
}

impl Model {
    pub fn participant_id(&self) -> ParticipantId {
        ParticipantId::from(self.id)
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::pool::Entity",
        from = "Column::PoolId",
        to = "super::pool::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Pool,
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    User,
    #[sea_orm(has_many = "super::guess::Entity")]
    Guess,
}

impl Related<super::pool::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Pool.def()
    }
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::guess::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Guess.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
