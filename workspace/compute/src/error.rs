use thiserror::Error;

/// Error types for the report calculator
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ComputeError {
    /// Calories are estimated per second, so a zero duration has no estimate
    #[error("Training {0} has a zero duration")]
    ZeroDuration(i32),

    /// The exercise referenced by a training was not supplied
    #[error("Exercise {exercise_id} referenced by training {training_id} is missing")]
    MissingExercise { training_id: i32, exercise_id: i32 },
}

/// Type alias for Result with ComputeError
pub type Result<T> = std::result::Result<T, ComputeError>;
