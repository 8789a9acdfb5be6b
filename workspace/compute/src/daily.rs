use chrono::NaiveDate;
use common::{DailyResult, TOTAL_ROW_LABEL};
use model::entities::{exercise, training};
use std::collections::HashMap;
use tracing::{debug, instrument};

use crate::calories::estimate_calories;
use crate::error::{ComputeError, Result};

/// The contribution of a single training to a per-date report.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingEntry {
    pub date: NaiveDate,
    pub repetitions: i32,
    pub calories: f64,
}

impl TrainingEntry {
    /// Builds an entry from a training and the exercise it performed.
    pub fn from_models(training: &training::Model, exercise: &exercise::Model) -> Result<Self> {
        Ok(Self {
            date: training.date,
            repetitions: training.repetitions,
            calories: estimate_calories(training, exercise)?,
        })
    }
}

/// Groups entries by date, keeping dates in order of first occurrence, and
/// appends a `"Total"` row with the sums over all entries.
pub fn aggregate_by_date(entries: &[TrainingEntry]) -> Vec<DailyResult> {
    let mut rows: Vec<DailyResult> = Vec::new();
    let mut index: HashMap<NaiveDate, usize> = HashMap::new();
    let mut total_repetitions = 0i64;
    let mut total_calories = 0.0f64;

    for entry in entries {
        let position = *index.entry(entry.date).or_insert_with(|| {
            rows.push(DailyResult {
                date: entry.date.format("%Y-%m-%d").to_string(),
                repetitions: 0,
                calories: 0.0,
            });
            rows.len() - 1
        });

        let row = &mut rows[position];
        row.repetitions += i64::from(entry.repetitions);
        row.calories += entry.calories;

        total_repetitions += i64::from(entry.repetitions);
        total_calories += entry.calories;
    }

    rows.push(DailyResult {
        date: TOTAL_ROW_LABEL.to_string(),
        repetitions: total_repetitions,
        calories: total_calories,
    });
    rows
}

/// Per-date report for a set of trainings whose exercises are looked up in
/// `exercises` by id.
#[instrument(skip_all, fields(num_trainings = trainings.len()))]
pub fn daily_report(
    trainings: &[training::Model],
    exercises: &HashMap<i32, exercise::Model>,
) -> Result<Vec<DailyResult>> {
    let entries = trainings
        .iter()
        .map(|training| {
            let exercise = exercises.get(&training.exercise_id).ok_or(
                ComputeError::MissingExercise {
                    training_id: training.id,
                    exercise_id: training.exercise_id,
                },
            )?;
            TrainingEntry::from_models(training, exercise)
        })
        .collect::<Result<Vec<_>>>()?;

    let rows = aggregate_by_date(&entries);
    debug!("Aggregated {} trainings into {} dated rows", entries.len(), rows.len() - 1);
    Ok(rows)
}
