use chrono::{NaiveDate, NaiveTime, Timelike};
use sea_orm::entity::prelude::*;

/// One logged performance of an exercise by a person.
/// A training with a routine belongs to a routine session; without one it is
/// a free-standing exercise session.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "trainings")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    /// Elapsed time stored as a time of day.
    pub duration: NaiveTime,
    pub repetitions: i32,
    pub date: NaiveDate,
    pub exercise_id: i32,
    pub person_id: i32,
    pub routine_id: Option<i32>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::exercise::Entity",
        from = "Column::ExerciseId",
        to = "super::exercise::Column::Id"
    )]
    Exercise,
    #[sea_orm(
        belongs_to = "super::person::Entity",
        from = "Column::PersonId",
        to = "super::person::Column::Id"
    )]
    Person,
    #[sea_orm(
        belongs_to = "super::routine::Entity",
        from = "Column::RoutineId",
        to = "super::routine::Column::Id"
    )]
    Routine,
}

impl Related<super::exercise::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Exercise.def()
    }
}

impl Related<super::person::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Person.def()
    }
}

impl Related<super::routine::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Routine.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Duration of the session in whole seconds.
    pub fn duration_seconds(&self) -> u32 {
        self.duration.num_seconds_from_midnight()
    }
}
