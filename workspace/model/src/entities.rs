//! SeaORM entities for the training tracker.
//! Persons, exercises, routines and trainings all live in one relational
//! schema; the join table `routines_exercises` links routines and exercises.

pub mod exercise;
pub mod person;
pub mod routine;
pub mod routine_exercise;
pub mod training;
pub mod user;

pub mod prelude {
    //! A prelude module for easy importing of all entities.
    pub use super::exercise::Entity as Exercise;
    pub use super::person::Entity as Person;
    pub use super::routine::Entity as Routine;
    pub use super::routine_exercise::Entity as RoutineExercise;
    pub use super::training::Entity as Training;
    pub use super::user::Entity as User;
}
