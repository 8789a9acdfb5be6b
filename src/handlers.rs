pub mod auth;
pub mod exercises;
pub mod health;
pub mod persons;
pub mod reports;
pub mod routines;
pub mod trainers;
pub mod trainings;

use crate::error::{ApiError, ApiResult};
use model::entities::{exercise, person, routine};
use sea_orm::{ConnectionTrait, EntityTrait};
use tracing::warn;

pub(crate) async fn find_person<C: ConnectionTrait>(db: &C, person_id: i32) -> ApiResult<person::Model> {
    person::Entity::find_by_id(person_id)
        .one(db)
        .await?
        .ok_or_else(|| {
            warn!("Person with ID {} not found", person_id);
            ApiError::not_found("Person", person_id)
        })
}

pub(crate) async fn find_exercise<C: ConnectionTrait>(db: &C, exercise_id: i32) -> ApiResult<exercise::Model> {
    exercise::Entity::find_by_id(exercise_id)
        .one(db)
        .await?
        .ok_or_else(|| {
            warn!("Exercise with ID {} not found", exercise_id);
            ApiError::not_found("Exercise", exercise_id)
        })
}

pub(crate) async fn find_routine<C: ConnectionTrait>(db: &C, routine_id: i32) -> ApiResult<routine::Model> {
    routine::Entity::find_by_id(routine_id)
        .one(db)
        .await?
        .ok_or_else(|| {
            warn!("Routine with ID {} not found", routine_id);
            ApiError::not_found("Routine", routine_id)
        })
}

pub(crate) fn not_in_routine(exercise_id: i32, routine_id: i32) -> ApiError {
    warn!("Exercise {} is not part of routine {}", exercise_id, routine_id);
    ApiError::Conflict(format!(
        "Exercise {} is not part of routine {}",
        exercise_id, routine_id
    ))
}

/// Loads the routine and checks that the exercise is one of its members.
pub(crate) async fn find_routine_with_exercise<C: ConnectionTrait>(
    db: &C,
    routine_id: i32,
    exercise_id: i32,
) -> ApiResult<routine::Model> {
    let routine_model = find_routine(db, routine_id).await?;
    if !routine_model.exercise_ids(db).await?.contains(&exercise_id) {
        return Err(not_in_routine(exercise_id, routine_id));
    }
    Ok(routine_model)
}
