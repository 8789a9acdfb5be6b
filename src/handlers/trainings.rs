use super::exercises::ExerciseResponse;
use super::{find_exercise, find_person, find_routine_with_exercise};
use crate::error::{ApiError, ApiResult};
use crate::schemas::{ApiResponse, AppState};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use axum_valid::Valid;
use chrono::{NaiveDate, NaiveTime, Timelike};
use common::TrainingRecord;
use compute::training_record;
use model::entities::{exercise, training};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, trace, warn};
use utoipa::ToSchema;
use validator::Validate;

/// Request body for logging or replacing a training
#[derive(Debug, Deserialize, Serialize, ToSchema, Validate)]
pub struct TrainingRequest {
    /// Elapsed time as `HH:MM:SS`
    #[serde(rename = "tiempo")]
    #[schema(value_type = String, example = "00:12:30")]
    pub duration: NaiveTime,
    #[serde(rename = "repeticiones")]
    #[validate(range(min = 0))]
    pub repetitions: i32,
    #[serde(rename = "fecha")]
    pub date: NaiveDate,
    #[serde(rename = "ejercicio")]
    pub exercise_id: i32,
    /// Moves the training to another person on update; ignored on create
    #[serde(rename = "persona", default)]
    pub person_id: Option<i32>,
    #[serde(rename = "rutina", default)]
    pub routine_id: Option<i32>,
}

/// A training with its exercise embedded
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TrainingWithExercise {
    pub id: i32,
    #[serde(rename = "tiempo")]
    #[schema(value_type = String, example = "00:12:30")]
    pub duration: NaiveTime,
    #[serde(rename = "repeticiones")]
    pub repetitions: i32,
    #[serde(rename = "fecha")]
    pub date: NaiveDate,
    #[serde(rename = "ejercicio")]
    pub exercise: ExerciseResponse,
    #[serde(rename = "persona")]
    pub person_id: i32,
    #[serde(rename = "rutina")]
    pub routine_id: Option<i32>,
}

impl TrainingWithExercise {
    fn new(training: training::Model, exercise: exercise::Model) -> Self {
        Self {
            id: training.id,
            duration: training.duration,
            repetitions: training.repetitions,
            date: training.date,
            exercise: ExerciseResponse::from(exercise),
            person_id: training.person_id,
            routine_id: training.routine_id,
        }
    }
}

fn ensure_positive_duration(duration: NaiveTime) -> ApiResult<()> {
    if duration.num_seconds_from_midnight() == 0 {
        warn!("Rejected training with zero duration");
        return Err(ApiError::Validation(
            "Training duration must be greater than 00:00:00".to_string(),
        ));
    }
    Ok(())
}

/// Get the trainings of a person with their exercises
#[utoipa::path(
    get,
    path = "/entrenamientos/{person_id}",
    tag = "trainings",
    params(
        ("person_id" = i32, Path, description = "Person ID"),
    ),
    responses(
        (status = 200, description = "Trainings retrieved successfully", body = ApiResponse<Vec<TrainingWithExercise>>),
        (status = 404, description = "Person not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_person_trainings(
    Path(person_id): Path<i32>,
    State(state): State<AppState>,
) -> ApiResult<Json<ApiResponse<Vec<TrainingWithExercise>>>> {
    trace!("Entering get_person_trainings function for person_id: {}", person_id);
    find_person(&state.db, person_id).await?;

    let rows = training::Entity::find()
        .filter(training::Column::PersonId.eq(person_id))
        .order_by_asc(training::Column::Date)
        .order_by_asc(training::Column::Id)
        .find_also_related(exercise::Entity)
        .all(&state.db)
        .await?;

    let mut data = Vec::with_capacity(rows.len());
    for (training_model, exercise_model) in rows {
        let exercise_model = exercise_model.ok_or_else(|| {
            ApiError::Internal(format!(
                "Training {} references missing exercise {}",
                training_model.id, training_model.exercise_id
            ))
        })?;
        data.push(TrainingWithExercise::new(training_model, exercise_model));
    }

    info!("Retrieved {} trainings for person {}", data.len(), person_id);
    Ok(Json(ApiResponse::ok(data, "Trainings retrieved successfully")))
}

/// Log a training for a person
#[utoipa::path(
    post,
    path = "/entrenamientos/{person_id}",
    tag = "trainings",
    params(
        ("person_id" = i32, Path, description = "Person ID"),
    ),
    request_body = TrainingRequest,
    responses(
        (status = 201, description = "Training created successfully", body = ApiResponse<TrainingRecord>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 404, description = "Person, exercise or routine not found", body = ErrorResponse),
        (status = 409, description = "Exercise is not part of the routine", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn create_training(
    Path(person_id): Path<i32>,
    State(state): State<AppState>,
    Valid(Json(request)): Valid<Json<TrainingRequest>>,
) -> ApiResult<(StatusCode, Json<ApiResponse<TrainingRecord>>)> {
    trace!("Entering create_training function for person_id: {}", person_id);
    ensure_positive_duration(request.duration)?;

    let txn = state.db.begin().await?;
    find_person(&txn, person_id).await?;
    find_exercise(&txn, request.exercise_id).await?;
    if let Some(routine_id) = request.routine_id {
        find_routine_with_exercise(&txn, routine_id, request.exercise_id).await?;
    }

    let new_training = training::ActiveModel {
        duration: Set(request.duration),
        repetitions: Set(request.repetitions),
        date: Set(request.date),
        exercise_id: Set(request.exercise_id),
        person_id: Set(person_id),
        routine_id: Set(request.routine_id),
        ..Default::default()
    };
    let training_model = new_training.insert(&txn).await?;
    txn.commit().await?;

    info!(
        "Training {} logged for person {} on {}",
        training_model.id, person_id, training_model.date
    );
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(
            training_record(&training_model),
            "Training created successfully",
        )),
    ))
}

/// Get a training by ID
#[utoipa::path(
    get,
    path = "/entrenamiento/{training_id}",
    tag = "trainings",
    params(
        ("training_id" = i32, Path, description = "Training ID"),
    ),
    responses(
        (status = 200, description = "Training retrieved successfully", body = ApiResponse<TrainingRecord>),
        (status = 404, description = "Training not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_training(
    Path(training_id): Path<i32>,
    State(state): State<AppState>,
) -> ApiResult<Json<ApiResponse<TrainingRecord>>> {
    trace!("Entering get_training function for training_id: {}", training_id);
    let training_model = training::Entity::find_by_id(training_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| ApiError::not_found("Training", training_id))?;

    Ok(Json(ApiResponse::ok(
        training_record(&training_model),
        "Training retrieved successfully",
    )))
}

/// Update a training
#[utoipa::path(
    put,
    path = "/entrenamiento/{training_id}",
    tag = "trainings",
    params(
        ("training_id" = i32, Path, description = "Training ID"),
    ),
    request_body = TrainingRequest,
    responses(
        (status = 200, description = "Training updated successfully", body = ApiResponse<TrainingRecord>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 404, description = "Training or a referenced record not found", body = ErrorResponse),
        (status = 409, description = "Exercise is not part of the routine", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn update_training(
    Path(training_id): Path<i32>,
    State(state): State<AppState>,
    Valid(Json(request)): Valid<Json<TrainingRequest>>,
) -> ApiResult<Json<ApiResponse<TrainingRecord>>> {
    trace!("Entering update_training function for training_id: {}", training_id);
    ensure_positive_duration(request.duration)?;

    let txn = state.db.begin().await?;
    let existing = training::Entity::find_by_id(training_id)
        .one(&txn)
        .await?
        .ok_or_else(|| ApiError::not_found("Training", training_id))?;

    find_exercise(&txn, request.exercise_id).await?;
    let person_id = request.person_id.unwrap_or(existing.person_id);
    if person_id != existing.person_id {
        debug!("Moving training {} to person {}", training_id, person_id);
        find_person(&txn, person_id).await?;
    }
    if let Some(routine_id) = request.routine_id {
        find_routine_with_exercise(&txn, routine_id, request.exercise_id).await?;
    }

    let mut active: training::ActiveModel = existing.into();
    active.duration = Set(request.duration);
    active.repetitions = Set(request.repetitions);
    active.date = Set(request.date);
    active.exercise_id = Set(request.exercise_id);
    active.person_id = Set(person_id);
    active.routine_id = Set(request.routine_id);
    let updated = active.update(&txn).await?;
    txn.commit().await?;

    info!("Training with ID {} updated successfully", training_id);
    Ok(Json(ApiResponse::ok(
        training_record(&updated),
        "Training updated successfully",
    )))
}

/// Delete a training
#[utoipa::path(
    delete,
    path = "/entrenamiento/{training_id}",
    tag = "trainings",
    params(
        ("training_id" = i32, Path, description = "Training ID"),
    ),
    responses(
        (status = 204, description = "Training deleted"),
        (status = 404, description = "Training not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn delete_training(
    Path(training_id): Path<i32>,
    State(state): State<AppState>,
) -> ApiResult<StatusCode> {
    trace!("Entering delete_training function for training_id: {}", training_id);
    let result = training::Entity::delete_by_id(training_id)
        .exec(&state.db)
        .await?;

    if result.rows_affected == 0 {
        warn!("Training with ID {} not found for deletion (no rows affected)", training_id);
        return Err(ApiError::not_found("Training", training_id));
    }

    info!("Training with ID {} deleted successfully", training_id);
    Ok(StatusCode::NO_CONTENT)
}
