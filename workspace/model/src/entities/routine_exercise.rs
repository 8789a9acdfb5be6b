use super::{exercise, routine};
use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "routines_exercises")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub routine_id: i32,
    #[sea_orm(primary_key, auto_increment = false)]
    pub exercise_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "routine::Entity",
        from = "Column::RoutineId",
        to = "routine::Column::Id",
        on_delete = "Cascade"
    )]
    Routine,
    #[sea_orm(
        belongs_to = "exercise::Entity",
        from = "Column::ExerciseId",
        to = "exercise::Column::Id",
        on_delete = "Cascade"
    )]
    Exercise,
}

impl Related<routine::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Routine.def()
    }
}

impl Related<exercise::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Exercise.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
