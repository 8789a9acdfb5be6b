use sea_orm::entity::prelude::*;
use sea_orm::{ConnectionTrait, QueryFilter};
use tracing::trace;

/// A named set of exercises performed together.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "routines")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    /// Lower-cased name. Unique, which makes routine names unique ignoring case.
    #[sea_orm(unique)]
    pub name_key: String,
    pub description: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::routine_exercise::Entity")]
    RoutineExercise,
    #[sea_orm(has_many = "super::training::Entity")]
    Training,
}

impl Related<super::exercise::Entity> for Entity {
    fn to() -> RelationDef {
        super::routine_exercise::Relation::Exercise.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::routine_exercise::Relation::Routine.def().rev())
    }
}

impl Related<super::training::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Training.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Ids of the exercises associated with this routine, in association order.
    pub async fn exercise_ids<C: ConnectionTrait>(&self, db: &C) -> Result<Vec<i32>, DbErr> {
        let links = super::routine_exercise::Entity::find()
            .filter(super::routine_exercise::Column::RoutineId.eq(self.id))
            .all(db)
            .await?;
        trace!("Routine {} has {} associated exercises", self.id, links.len());
        Ok(links.into_iter().map(|link| link.exercise_id).collect())
    }
}

/// Normalized form of a routine name used for the uniqueness check.
pub fn name_key(name: &str) -> String {
    name.trim().to_lowercase()
}
