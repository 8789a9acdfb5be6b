use sea_orm::entity::prelude::*;

/// A reusable movement definition.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "exercises")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub description: String,
    /// Link to a demonstration video.
    pub video: String,
    /// Coefficient used to estimate calories burned per session.
    pub calories: f64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::training::Entity")]
    Training,
    #[sea_orm(has_many = "super::routine_exercise::Entity")]
    RoutineExercise,
}

impl Related<super::training::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Training.def()
    }
}

impl Related<super::routine::Entity> for Entity {
    fn to() -> RelationDef {
        super::routine_exercise::Relation::Routine.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::routine_exercise::Relation::Exercise.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
