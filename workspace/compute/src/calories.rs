use model::entities::{exercise, training};
use tracing::{instrument, warn};

use crate::error::{ComputeError, Result};

/// Estimated calories burned in one training:
/// `4 * repetitions^2 * exercise.calories / duration_in_seconds`.
#[instrument(skip_all, fields(training_id = training.id, exercise_id = exercise.id))]
pub fn estimate_calories(training: &training::Model, exercise: &exercise::Model) -> Result<f64> {
    let seconds = training.duration_seconds();
    if seconds == 0 {
        warn!("Cannot estimate calories for training {} without duration", training.id);
        return Err(ComputeError::ZeroDuration(training.id));
    }

    let repetitions = f64::from(training.repetitions);
    Ok(4.0 * repetitions * repetitions * exercise.calories / f64::from(seconds))
}
