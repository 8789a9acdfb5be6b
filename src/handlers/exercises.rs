use super::find_exercise;
use crate::error::{ApiError, ApiResult};
use crate::schemas::{ApiResponse, AppState};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use axum_valid::Valid;
use model::entities::{exercise, training};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, trace, warn};
use utoipa::ToSchema;
use validator::Validate;

/// Request body for creating or replacing an exercise
#[derive(Debug, Deserialize, Serialize, ToSchema, Validate)]
pub struct ExerciseRequest {
    #[serde(rename = "nombre")]
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[serde(rename = "descripcion", default)]
    #[validate(length(max = 512))]
    pub description: String,
    /// Link to a demonstration video
    #[serde(default)]
    #[validate(length(max = 512))]
    pub video: String,
    /// Calorie coefficient used by the training report
    #[serde(rename = "calorias")]
    #[validate(range(min = 0.0))]
    pub calories: f64,
}

/// Exercise response model
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ExerciseResponse {
    pub id: i32,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "descripcion")]
    pub description: String,
    pub video: String,
    #[serde(rename = "calorias")]
    pub calories: f64,
}

impl From<exercise::Model> for ExerciseResponse {
    fn from(model: exercise::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            description: model.description,
            video: model.video,
            calories: model.calories,
        }
    }
}

/// Get all exercises
#[utoipa::path(
    get,
    path = "/ejercicios",
    tag = "exercises",
    responses(
        (status = 200, description = "Exercises retrieved successfully", body = ApiResponse<Vec<ExerciseResponse>>),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_exercises(
    State(state): State<AppState>,
) -> ApiResult<Json<ApiResponse<Vec<ExerciseResponse>>>> {
    trace!("Entering get_exercises function");
    let exercises = exercise::Entity::find()
        .order_by_asc(exercise::Column::Id)
        .all(&state.db)
        .await?;

    info!("Successfully retrieved {} exercises", exercises.len());
    let data = exercises.into_iter().map(ExerciseResponse::from).collect();
    Ok(Json(ApiResponse::ok(data, "Exercises retrieved successfully")))
}

/// Create a new exercise
#[utoipa::path(
    post,
    path = "/ejercicios",
    tag = "exercises",
    request_body = ExerciseRequest,
    responses(
        (status = 201, description = "Exercise created successfully", body = ApiResponse<ExerciseResponse>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn create_exercise(
    State(state): State<AppState>,
    Valid(Json(request)): Valid<Json<ExerciseRequest>>,
) -> ApiResult<(StatusCode, Json<ApiResponse<ExerciseResponse>>)> {
    trace!("Entering create_exercise function");
    debug!("Creating exercise '{}' with coefficient {}", request.name, request.calories);

    let new_exercise = exercise::ActiveModel {
        name: Set(request.name),
        description: Set(request.description),
        video: Set(request.video),
        calories: Set(request.calories),
        ..Default::default()
    };
    let exercise_model = new_exercise.insert(&state.db).await?;

    info!(
        "Exercise created successfully with ID: {}, name: {}",
        exercise_model.id, exercise_model.name
    );
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(
            ExerciseResponse::from(exercise_model),
            "Exercise created successfully",
        )),
    ))
}

/// Get a specific exercise by ID
#[utoipa::path(
    get,
    path = "/ejercicio/{exercise_id}",
    tag = "exercises",
    params(
        ("exercise_id" = i32, Path, description = "Exercise ID"),
    ),
    responses(
        (status = 200, description = "Exercise retrieved successfully", body = ApiResponse<ExerciseResponse>),
        (status = 404, description = "Exercise not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_exercise(
    Path(exercise_id): Path<i32>,
    State(state): State<AppState>,
) -> ApiResult<Json<ApiResponse<ExerciseResponse>>> {
    trace!("Entering get_exercise function for exercise_id: {}", exercise_id);
    let exercise_model = find_exercise(&state.db, exercise_id).await?;
    Ok(Json(ApiResponse::ok(
        ExerciseResponse::from(exercise_model),
        "Exercise retrieved successfully",
    )))
}

/// Update an exercise
#[utoipa::path(
    put,
    path = "/ejercicio/{exercise_id}",
    tag = "exercises",
    params(
        ("exercise_id" = i32, Path, description = "Exercise ID"),
    ),
    request_body = ExerciseRequest,
    responses(
        (status = 200, description = "Exercise updated successfully", body = ApiResponse<ExerciseResponse>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 404, description = "Exercise not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn update_exercise(
    Path(exercise_id): Path<i32>,
    State(state): State<AppState>,
    Valid(Json(request)): Valid<Json<ExerciseRequest>>,
) -> ApiResult<Json<ApiResponse<ExerciseResponse>>> {
    trace!("Entering update_exercise function for exercise_id: {}", exercise_id);
    let existing = find_exercise(&state.db, exercise_id).await?;

    let mut active: exercise::ActiveModel = existing.into();
    active.name = Set(request.name);
    active.description = Set(request.description);
    active.video = Set(request.video);
    active.calories = Set(request.calories);
    let updated = active.update(&state.db).await?;

    info!("Exercise with ID {} updated successfully", exercise_id);
    Ok(Json(ApiResponse::ok(
        ExerciseResponse::from(updated),
        "Exercise updated successfully",
    )))
}

/// Delete an exercise
///
/// Refused while trainings reference it. Routine associations are removed
/// with the exercise.
#[utoipa::path(
    delete,
    path = "/ejercicio/{exercise_id}",
    tag = "exercises",
    params(
        ("exercise_id" = i32, Path, description = "Exercise ID"),
    ),
    responses(
        (status = 204, description = "Exercise deleted"),
        (status = 404, description = "Exercise not found", body = ErrorResponse),
        (status = 409, description = "Exercise is referenced by trainings", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn delete_exercise(
    Path(exercise_id): Path<i32>,
    State(state): State<AppState>,
) -> ApiResult<StatusCode> {
    trace!("Entering delete_exercise function for exercise_id: {}", exercise_id);
    let txn = state.db.begin().await?;
    find_exercise(&txn, exercise_id).await?;

    let trainings = training::Entity::find()
        .filter(training::Column::ExerciseId.eq(exercise_id))
        .count(&txn)
        .await?;
    if trainings > 0 {
        warn!("Refusing to delete exercise {} used by {} trainings", exercise_id, trainings);
        return Err(ApiError::Conflict(format!(
            "Exercise {} is used by {} trainings and cannot be deleted",
            exercise_id, trainings
        )));
    }

    exercise::Entity::delete_by_id(exercise_id).exec(&txn).await?;
    txn.commit().await?;

    info!("Exercise with ID {} deleted successfully", exercise_id);
    Ok(StatusCode::NO_CONTENT)
}
