use super::find_person;
use super::persons::PersonResponse;
use crate::error::{ApiError, ApiResult};
use crate::schemas::{ApiResponse, AppState};
use axum::{
    extract::{Path, State},
    response::Json,
};
use common::{BmiClass, DailyResult, RoutineSession, TrainingRecord};
use compute::{aggregate_routine_sessions, classify_bmi, compute_bmi, daily_report, training_record};
use model::entities::{exercise, training};
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, info, instrument, trace, warn};
use utoipa::ToSchema;

/// BMI and per-date training report of a person
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PersonReport {
    #[serde(rename = "persona")]
    pub person: PersonResponse,
    #[serde(rename = "imc")]
    pub bmi: f64,
    #[serde(rename = "clasificacion_imc")]
    pub bmi_class: BmiClass,
    /// One row per training date followed by the `Total` row
    #[serde(rename = "resultados")]
    pub results: Vec<DailyResult>,
}

/// Training history split into routine sessions and free-standing trainings
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TrainingResults {
    #[serde(rename = "rutinas")]
    pub routines: Vec<RoutineSession>,
    #[serde(rename = "ejercicios")]
    pub exercises: Vec<TrainingRecord>,
}

/// Trainings of a person in the order they were logged.
async fn person_trainings(state: &AppState, person_id: i32) -> ApiResult<Vec<training::Model>> {
    let trainings = training::Entity::find()
        .filter(training::Column::PersonId.eq(person_id))
        .order_by_asc(training::Column::Id)
        .all(&state.db)
        .await?;
    debug!("Loaded {} trainings for person {}", trainings.len(), person_id);
    Ok(trainings)
}

/// Get the BMI and training report of a person
#[utoipa::path(
    get,
    path = "/persona/{person_id}/reporte",
    tag = "reports",
    params(
        ("person_id" = i32, Path, description = "Person ID"),
    ),
    responses(
        (status = 200, description = "Report computed successfully", body = ApiResponse<PersonReport>),
        (status = 404, description = "Person not found", body = ErrorResponse),
        (status = 422, description = "Report cannot be computed from the stored data", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_person_report(
    Path(person_id): Path<i32>,
    State(state): State<AppState>,
) -> ApiResult<Json<ApiResponse<PersonReport>>> {
    trace!("Entering get_person_report function for person_id: {}", person_id);
    let person_model = find_person(&state.db, person_id).await?;

    if person_model.height <= 0.0 {
        warn!("Person {} has no height recorded, BMI is undefined", person_id);
        return Err(ApiError::Unprocessable(format!(
            "Person {} has no height recorded",
            person_id
        )));
    }
    let bmi = compute_bmi(person_model.height, person_model.weight);
    let bmi_class = classify_bmi(bmi);
    debug!("Person {} has BMI {:.2} ({:?})", person_id, bmi, bmi_class);

    let trainings = person_trainings(&state, person_id).await?;
    let mut exercise_ids: Vec<i32> = trainings.iter().map(|t| t.exercise_id).collect();
    exercise_ids.sort_unstable();
    exercise_ids.dedup();

    let exercises: HashMap<i32, exercise::Model> = exercise::Entity::find()
        .filter(exercise::Column::Id.is_in(exercise_ids))
        .all(&state.db)
        .await?
        .into_iter()
        .map(|e| (e.id, e))
        .collect();

    let results = daily_report(&trainings, &exercises).map_err(|e| {
        warn!("Report for person {} failed: {}", person_id, e);
        ApiError::from(e)
    })?;

    info!(
        "Report for person {} computed over {} trainings",
        person_id,
        trainings.len()
    );
    let report = PersonReport {
        person: PersonResponse::from(person_model),
        bmi,
        bmi_class,
        results,
    };
    Ok(Json(ApiResponse::ok(report, "Report computed successfully")))
}

/// Get the training history of a person grouped into routine sessions
#[utoipa::path(
    get,
    path = "/resultadosEntrenamientos/{person_id}",
    tag = "reports",
    params(
        ("person_id" = i32, Path, description = "Person ID"),
    ),
    responses(
        (status = 200, description = "Results retrieved successfully", body = ApiResponse<TrainingResults>),
        (status = 404, description = "Person not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_training_results(
    Path(person_id): Path<i32>,
    State(state): State<AppState>,
) -> ApiResult<Json<ApiResponse<TrainingResults>>> {
    trace!("Entering get_training_results function for person_id: {}", person_id);
    find_person(&state.db, person_id).await?;

    let trainings = person_trainings(&state, person_id).await?;
    let routines = aggregate_routine_sessions(&trainings);
    let exercises: Vec<TrainingRecord> = trainings
        .iter()
        .filter(|t| t.routine_id.is_none())
        .map(training_record)
        .collect();

    info!(
        "Person {} has {} routine sessions and {} free-standing trainings",
        person_id,
        routines.len(),
        exercises.len()
    );
    Ok(Json(ApiResponse::ok(
        TrainingResults { routines, exercises },
        "Results retrieved successfully",
    )))
}
