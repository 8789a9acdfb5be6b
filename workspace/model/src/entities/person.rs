use chrono::NaiveDate;
use sea_orm::entity::prelude::*;

/// A tracked individual, either a trainer or one of a trainer's clients.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "persons")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub last_name: String,
    /// Height in meters.
    pub height: f64,
    /// Weight in kilograms.
    pub weight: f64,
    pub age: f64,
    pub arm: f64,
    pub chest: f64,
    pub waist: f64,
    pub leg: f64,
    pub enrolled_on: NaiveDate,
    /// Whether the person is currently in an active training program.
    pub training: bool,
    pub end_reason: Option<String>,
    pub ended_on: Option<NaiveDate>,
    /// Login account that owns this person. Deleting the user deletes the person.
    pub user_id: Option<i32>,
    /// Trainer assigned to this person (self-referencing).
    pub trainer_id: Option<i32>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    User,
    #[sea_orm(belongs_to = "Entity", from = "Column::TrainerId", to = "Column::Id")]
    Trainer,
    #[sea_orm(has_many = "super::training::Entity")]
    Training,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::training::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Training.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
