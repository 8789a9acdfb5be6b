use super::exercises::ExerciseResponse;
use super::{find_exercise, find_person, find_routine, not_in_routine};
use crate::error::{ApiError, ApiResult};
use crate::schemas::{ApiResponse, AppState};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use axum_valid::Valid;
use chrono::{NaiveDate, NaiveTime, Timelike};
use common::RoutineSession;
use compute::aggregate_routine_sessions;
use model::entities::{exercise, routine, routine_exercise, training};
use sea_orm::{
    sea_query::OnConflict, ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait,
    ModelTrait, PaginatorTrait, QueryFilter, QueryOrder, Set, SqlErr, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{debug, info, instrument, trace, warn};
use utoipa::ToSchema;
use validator::Validate;

/// Minimum number of exercises a routine needs before it can be trained.
pub const MIN_EXERCISES_FOR_TRAINING: usize = 3;

/// Request body for creating a routine
#[derive(Debug, Deserialize, Serialize, ToSchema, Validate)]
pub struct CreateRoutineRequest {
    /// Routine name, unique regardless of case
    #[serde(rename = "nombre")]
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[serde(rename = "descripcion", default)]
    #[validate(length(max = 512))]
    pub description: String,
    /// Exercises to associate right away
    #[serde(rename = "ejercicios", default)]
    pub exercise_ids: Vec<i32>,
}

/// Request body for renaming or describing a routine
#[derive(Debug, Deserialize, Serialize, ToSchema, Validate)]
pub struct UpdateRoutineRequest {
    #[serde(rename = "nombre")]
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[serde(rename = "descripcion", default)]
    #[validate(length(max = 512))]
    pub description: String,
}

/// Routine response model
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RoutineResponse {
    pub id: i32,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "descripcion")]
    pub description: String,
}

impl From<routine::Model> for RoutineResponse {
    fn from(model: routine::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            description: model.description,
        }
    }
}

/// Routine with its associated exercises
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RoutineDetailResponse {
    pub id: i32,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "descripcion")]
    pub description: String,
    #[serde(rename = "ejercicios")]
    pub exercises: Vec<ExerciseResponse>,
}

impl RoutineDetailResponse {
    fn new(routine: routine::Model, exercises: Vec<exercise::Model>) -> Self {
        Self {
            id: routine.id,
            name: routine.name,
            description: routine.description,
            exercises: exercises.into_iter().map(ExerciseResponse::from).collect(),
        }
    }
}

/// One exercise performed during a routine session
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema, Validate)]
pub struct RoutineSessionItem {
    #[serde(rename = "ejercicio")]
    pub exercise_id: i32,
    #[serde(rename = "repeticiones")]
    #[validate(range(min = 0))]
    pub repetitions: i32,
    /// Elapsed time as `HH:MM:SS`
    #[serde(rename = "tiempo")]
    #[schema(value_type = String, example = "00:05:00")]
    pub duration: NaiveTime,
}

/// Request body for logging a whole routine session
#[derive(Debug, Deserialize, Serialize, ToSchema, Validate)]
pub struct RoutineSessionRequest {
    #[serde(rename = "persona")]
    pub person_id: i32,
    #[serde(rename = "rutina")]
    pub routine_id: i32,
    #[serde(rename = "fecha")]
    pub date: NaiveDate,
    #[serde(rename = "ejercicios")]
    #[validate(length(min = 1), nested)]
    pub exercises: Vec<RoutineSessionItem>,
}

fn routine_write_error(db_error: DbErr, name: &str) -> ApiError {
    match db_error.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => {
            warn!("Routine name '{}' collides with an existing routine", name);
            ApiError::Conflict(format!("A routine named '{}' already exists", name))
        }
        _ => ApiError::from(db_error),
    }
}

async fn routine_exercises<C: ConnectionTrait>(
    db: &C,
    routine_model: &routine::Model,
) -> ApiResult<Vec<exercise::Model>> {
    let exercises = routine_model
        .find_related(exercise::Entity)
        .order_by_asc(exercise::Column::Id)
        .all(db)
        .await?;
    Ok(exercises)
}

async fn link_exercise<C: ConnectionTrait>(db: &C, routine_id: i32, exercise_id: i32) -> ApiResult<()> {
    let link = routine_exercise::ActiveModel {
        routine_id: Set(routine_id),
        exercise_id: Set(exercise_id),
    };
    let inserted = routine_exercise::Entity::insert(link)
        .on_conflict(
            OnConflict::columns([
                routine_exercise::Column::RoutineId,
                routine_exercise::Column::ExerciseId,
            ])
            .do_nothing()
            .to_owned(),
        )
        .exec_without_returning(db)
        .await?;
    debug!(
        "Linked exercise {} to routine {} ({} new rows)",
        exercise_id, routine_id, inserted
    );
    Ok(())
}

/// Get all routines
#[utoipa::path(
    get,
    path = "/rutinas",
    tag = "routines",
    responses(
        (status = 200, description = "Routines retrieved successfully", body = ApiResponse<Vec<RoutineResponse>>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_routines(
    State(state): State<AppState>,
) -> ApiResult<Json<ApiResponse<Vec<RoutineResponse>>>> {
    trace!("Entering get_routines function");
    let routines = routine::Entity::find()
        .order_by_asc(routine::Column::Id)
        .all(&state.db)
        .await?;

    info!("Successfully retrieved {} routines", routines.len());
    let data = routines.into_iter().map(RoutineResponse::from).collect();
    Ok(Json(ApiResponse::ok(data, "Routines retrieved successfully")))
}

/// Create a routine
#[utoipa::path(
    post,
    path = "/rutinas",
    tag = "routines",
    request_body = CreateRoutineRequest,
    responses(
        (status = 201, description = "Routine created successfully", body = ApiResponse<RoutineDetailResponse>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 404, description = "Exercise not found", body = ErrorResponse),
        (status = 409, description = "Routine name already taken", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn create_routine(
    State(state): State<AppState>,
    Valid(Json(request)): Valid<Json<CreateRoutineRequest>>,
) -> ApiResult<(StatusCode, Json<ApiResponse<RoutineDetailResponse>>)> {
    trace!("Entering create_routine function");
    let name = request.name.trim().to_string();

    let txn = state.db.begin().await?;
    let new_routine = routine::ActiveModel {
        name: Set(name.clone()),
        name_key: Set(routine::name_key(&name)),
        description: Set(request.description),
        ..Default::default()
    };
    let routine_model = new_routine
        .insert(&txn)
        .await
        .map_err(|e| routine_write_error(e, &name))?;

    for exercise_id in &request.exercise_ids {
        find_exercise(&txn, *exercise_id).await?;
        link_exercise(&txn, routine_model.id, *exercise_id).await?;
    }
    let exercises = routine_exercises(&txn, &routine_model).await?;
    txn.commit().await?;

    info!(
        "Routine created successfully with ID: {}, name: {}, {} exercises",
        routine_model.id,
        routine_model.name,
        exercises.len()
    );
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(
            RoutineDetailResponse::new(routine_model, exercises),
            "Routine created successfully",
        )),
    ))
}

/// Get a routine with its exercises
#[utoipa::path(
    get,
    path = "/rutina/{routine_id}",
    tag = "routines",
    params(
        ("routine_id" = i32, Path, description = "Routine ID"),
    ),
    responses(
        (status = 200, description = "Routine retrieved successfully", body = ApiResponse<RoutineDetailResponse>),
        (status = 404, description = "Routine not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_routine(
    Path(routine_id): Path<i32>,
    State(state): State<AppState>,
) -> ApiResult<Json<ApiResponse<RoutineDetailResponse>>> {
    trace!("Entering get_routine function for routine_id: {}", routine_id);
    let routine_model = find_routine(&state.db, routine_id).await?;
    let exercises = routine_exercises(&state.db, &routine_model).await?;

    debug!("Routine {} has {} exercises", routine_id, exercises.len());
    Ok(Json(ApiResponse::ok(
        RoutineDetailResponse::new(routine_model, exercises),
        "Routine retrieved successfully",
    )))
}

/// Update a routine's name and description
#[utoipa::path(
    put,
    path = "/rutina/{routine_id}",
    tag = "routines",
    params(
        ("routine_id" = i32, Path, description = "Routine ID"),
    ),
    request_body = UpdateRoutineRequest,
    responses(
        (status = 200, description = "Routine updated successfully", body = ApiResponse<RoutineResponse>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 404, description = "Routine not found", body = ErrorResponse),
        (status = 409, description = "Routine name already taken", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn update_routine(
    Path(routine_id): Path<i32>,
    State(state): State<AppState>,
    Valid(Json(request)): Valid<Json<UpdateRoutineRequest>>,
) -> ApiResult<Json<ApiResponse<RoutineResponse>>> {
    trace!("Entering update_routine function for routine_id: {}", routine_id);
    let existing = find_routine(&state.db, routine_id).await?;
    let name = request.name.trim().to_string();

    let mut active: routine::ActiveModel = existing.into();
    active.name_key = Set(routine::name_key(&name));
    active.name = Set(name.clone());
    active.description = Set(request.description);
    let updated = active
        .update(&state.db)
        .await
        .map_err(|e| routine_write_error(e, &name))?;

    info!("Routine with ID {} updated successfully", routine_id);
    Ok(Json(ApiResponse::ok(
        RoutineResponse::from(updated),
        "Routine updated successfully",
    )))
}

/// Delete a routine
///
/// Refused while trainings were logged against it.
#[utoipa::path(
    delete,
    path = "/rutina/{routine_id}",
    tag = "routines",
    params(
        ("routine_id" = i32, Path, description = "Routine ID"),
    ),
    responses(
        (status = 204, description = "Routine deleted"),
        (status = 404, description = "Routine not found", body = ErrorResponse),
        (status = 409, description = "Routine is referenced by trainings", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn delete_routine(
    Path(routine_id): Path<i32>,
    State(state): State<AppState>,
) -> ApiResult<StatusCode> {
    trace!("Entering delete_routine function for routine_id: {}", routine_id);
    let txn = state.db.begin().await?;
    find_routine(&txn, routine_id).await?;

    let trainings = training::Entity::find()
        .filter(training::Column::RoutineId.eq(routine_id))
        .count(&txn)
        .await?;
    if trainings > 0 {
        warn!("Refusing to delete routine {} used by {} trainings", routine_id, trainings);
        return Err(ApiError::Conflict(format!(
            "Routine {} is used by {} trainings and cannot be deleted",
            routine_id, trainings
        )));
    }

    routine::Entity::delete_by_id(routine_id).exec(&txn).await?;
    txn.commit().await?;

    info!("Routine with ID {} deleted successfully", routine_id);
    Ok(StatusCode::NO_CONTENT)
}

/// Get the exercises not yet part of a routine
#[utoipa::path(
    get,
    path = "/rutina/{routine_id}/diferente",
    tag = "routines",
    params(
        ("routine_id" = i32, Path, description = "Routine ID"),
    ),
    responses(
        (status = 200, description = "Exercises retrieved successfully", body = ApiResponse<Vec<ExerciseResponse>>),
        (status = 404, description = "Routine not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_other_exercises(
    Path(routine_id): Path<i32>,
    State(state): State<AppState>,
) -> ApiResult<Json<ApiResponse<Vec<ExerciseResponse>>>> {
    trace!("Entering get_other_exercises function for routine_id: {}", routine_id);
    let routine_model = find_routine(&state.db, routine_id).await?;
    let linked = routine_model.exercise_ids(&state.db).await?;
    debug!("Routine {} already has exercises {:?}", routine_id, linked);

    let others = exercise::Entity::find()
        .filter(exercise::Column::Id.is_not_in(linked))
        .order_by_asc(exercise::Column::Id)
        .all(&state.db)
        .await?;

    info!("Found {} exercises outside routine {}", others.len(), routine_id);
    let data = others.into_iter().map(ExerciseResponse::from).collect();
    Ok(Json(ApiResponse::ok(data, "Exercises retrieved successfully")))
}

/// Add an exercise to a routine. Adding an exercise that is already part of
/// the routine leaves it unchanged.
#[utoipa::path(
    put,
    path = "/rutina/{routine_id}/ejercicio/{exercise_id}",
    tag = "routines",
    params(
        ("routine_id" = i32, Path, description = "Routine ID"),
        ("exercise_id" = i32, Path, description = "Exercise ID"),
    ),
    responses(
        (status = 200, description = "Exercise associated", body = ApiResponse<RoutineDetailResponse>),
        (status = 404, description = "Routine or exercise not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn add_exercise_to_routine(
    Path((routine_id, exercise_id)): Path<(i32, i32)>,
    State(state): State<AppState>,
) -> ApiResult<Json<ApiResponse<RoutineDetailResponse>>> {
    trace!(
        "Entering add_exercise_to_routine function for routine_id: {}, exercise_id: {}",
        routine_id,
        exercise_id
    );
    let txn = state.db.begin().await?;
    let routine_model = find_routine(&txn, routine_id).await?;
    find_exercise(&txn, exercise_id).await?;

    link_exercise(&txn, routine_id, exercise_id).await?;
    let exercises = routine_exercises(&txn, &routine_model).await?;
    txn.commit().await?;

    info!(
        "Exercise {} associated with routine {}, now {} exercises",
        exercise_id,
        routine_id,
        exercises.len()
    );
    Ok(Json(ApiResponse::ok(
        RoutineDetailResponse::new(routine_model, exercises),
        "Exercise associated with routine",
    )))
}

/// Remove an exercise from a routine
#[utoipa::path(
    delete,
    path = "/rutina/{routine_id}/ejercicio/{exercise_id}",
    tag = "routines",
    params(
        ("routine_id" = i32, Path, description = "Routine ID"),
        ("exercise_id" = i32, Path, description = "Exercise ID"),
    ),
    responses(
        (status = 204, description = "Association removed"),
        (status = 404, description = "Exercise is not part of the routine", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn remove_exercise_from_routine(
    Path((routine_id, exercise_id)): Path<(i32, i32)>,
    State(state): State<AppState>,
) -> ApiResult<StatusCode> {
    trace!(
        "Entering remove_exercise_from_routine function for routine_id: {}, exercise_id: {}",
        routine_id,
        exercise_id
    );
    let result = routine_exercise::Entity::delete_by_id((routine_id, exercise_id))
        .exec(&state.db)
        .await?;

    if result.rows_affected == 0 {
        warn!("Exercise {} is not part of routine {}", exercise_id, routine_id);
        return Err(ApiError::NotFound(format!(
            "Exercise {} is not part of routine {}",
            exercise_id, routine_id
        )));
    }

    info!("Exercise {} removed from routine {}", exercise_id, routine_id);
    Ok(StatusCode::NO_CONTENT)
}

/// Get the routines that have enough exercises to be trained
#[utoipa::path(
    get,
    path = "/rutinasEntrenamiento",
    tag = "routines",
    responses(
        (status = 200, description = "Routines retrieved successfully", body = ApiResponse<Vec<RoutineDetailResponse>>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_trainable_routines(
    State(state): State<AppState>,
) -> ApiResult<Json<ApiResponse<Vec<RoutineDetailResponse>>>> {
    trace!("Entering get_trainable_routines function");
    let routines = routine::Entity::find()
        .order_by_asc(routine::Column::Id)
        .find_with_related(exercise::Entity)
        .all(&state.db)
        .await?;
    let total = routines.len();

    let data: Vec<RoutineDetailResponse> = routines
        .into_iter()
        .filter(|(_, exercises)| exercises.len() >= MIN_EXERCISES_FOR_TRAINING)
        .map(|(routine_model, exercises)| RoutineDetailResponse::new(routine_model, exercises))
        .collect();

    info!("{} of {} routines are ready for training", data.len(), total);
    Ok(Json(ApiResponse::ok(data, "Routines retrieved successfully")))
}

/// Log a routine session as one training per performed exercise
#[utoipa::path(
    post,
    path = "/rutinasEntrenamiento",
    tag = "routines",
    request_body = RoutineSessionRequest,
    responses(
        (status = 201, description = "Routine session logged", body = ApiResponse<RoutineSession>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 404, description = "Person or routine not found", body = ErrorResponse),
        (status = 409, description = "Exercise is not part of the routine", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn log_routine_session(
    State(state): State<AppState>,
    Valid(Json(request)): Valid<Json<RoutineSessionRequest>>,
) -> ApiResult<(StatusCode, Json<ApiResponse<RoutineSession>>)> {
    trace!("Entering log_routine_session function");
    if let Some(item) = request
        .exercises
        .iter()
        .find(|item| item.duration.num_seconds_from_midnight() == 0)
    {
        warn!("Routine session item for exercise {} has zero duration", item.exercise_id);
        return Err(ApiError::Validation(
            "Training duration must be greater than 00:00:00".to_string(),
        ));
    }

    let txn = state.db.begin().await?;
    find_person(&txn, request.person_id).await?;
    let routine_model = find_routine(&txn, request.routine_id).await?;
    let allowed: HashSet<i32> = routine_model.exercise_ids(&txn).await?.into_iter().collect();

    let mut logged = Vec::with_capacity(request.exercises.len());
    for item in &request.exercises {
        if !allowed.contains(&item.exercise_id) {
            return Err(not_in_routine(item.exercise_id, request.routine_id));
        }

        let new_training = training::ActiveModel {
            duration: Set(item.duration),
            repetitions: Set(item.repetitions),
            date: Set(request.date),
            exercise_id: Set(item.exercise_id),
            person_id: Set(request.person_id),
            routine_id: Set(Some(request.routine_id)),
            ..Default::default()
        };
        logged.push(new_training.insert(&txn).await?);
    }
    txn.commit().await?;

    let session = aggregate_routine_sessions(&logged)
        .into_iter()
        .next()
        .ok_or_else(|| ApiError::Internal("Routine session produced no trainings".to_string()))?;

    info!(
        "Logged routine {} for person {} on {} with {} trainings",
        request.routine_id,
        request.person_id,
        request.date,
        logged.len()
    );
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(session, "Routine session logged successfully")),
    ))
}
