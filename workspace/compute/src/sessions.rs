use chrono::NaiveDate;
use common::{RoutineSession, SessionDuration, TrainingRecord};
use model::entities::training;
use std::collections::HashMap;
use tracing::{debug, instrument};

/// Transport view of a stored training.
pub fn training_record(model: &training::Model) -> TrainingRecord {
    TrainingRecord {
        id: model.id,
        duration: model.duration,
        repetitions: model.repetitions,
        date: model.date,
        exercise_id: model.exercise_id,
        person_id: model.person_id,
        routine_id: model.routine_id,
    }
}

/// Groups the routine trainings by (date, routine, person).
///
/// Trainings without a routine are skipped. Groups appear in order of their
/// first training and keep their members in input order; repetitions are
/// summed and durations added with carry.
#[instrument(skip_all, fields(num_trainings = trainings.len()))]
pub fn aggregate_routine_sessions(trainings: &[training::Model]) -> Vec<RoutineSession> {
    let mut sessions: Vec<RoutineSession> = Vec::new();
    let mut index: HashMap<(NaiveDate, i32, i32), usize> = HashMap::new();

    for training in trainings {
        let Some(routine_id) = training.routine_id else {
            continue;
        };

        let key = (training.date, routine_id, training.person_id);
        let position = *index.entry(key).or_insert_with(|| {
            sessions.push(RoutineSession {
                date: training.date,
                routine_id,
                person_id: training.person_id,
                total_repetitions: 0,
                total_duration: SessionDuration::default(),
                trainings: Vec::new(),
            });
            sessions.len() - 1
        });

        let session = &mut sessions[position];
        session.total_repetitions += i64::from(training.repetitions);
        session.total_duration = session
            .total_duration
            .add(SessionDuration::from(training.duration));
        session.trainings.push(training_record(training));
    }

    debug!("Built {} routine sessions", sessions.len());
    sessions
}
