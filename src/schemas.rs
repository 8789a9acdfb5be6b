use crate::auth::JwtConfig;
use common::{BmiClass, DailyResult, RoutineSession, TrainingRecord};
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi, ToSchema};

pub use common::ApiResponse;

/// Application state shared across handlers
#[derive(Clone, Debug)]
pub struct AppState {
    /// Database connection
    pub db: DatabaseConnection,
    /// Token settings
    pub jwt: JwtConfig,
    /// Per-request timeout
    pub request_timeout: Duration,
}

/// Error response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
    /// Error code
    pub code: String,
    /// Success status (always false for errors)
    pub success: bool,
}

/// Health check response
#[derive(Serialize, ToSchema)]
pub struct HealthResponse {
    /// Service status
    pub status: String,
    /// Service version
    pub version: String,
    /// Database connection status
    pub database: String,
}

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::health::health_check,
        crate::handlers::auth::sign_in,
        crate::handlers::auth::log_in,
        crate::handlers::persons::get_clients,
        crate::handlers::persons::create_client,
        crate::handlers::persons::get_person,
        crate::handlers::persons::update_person,
        crate::handlers::persons::delete_person,
        crate::handlers::exercises::get_exercises,
        crate::handlers::exercises::create_exercise,
        crate::handlers::exercises::get_exercise,
        crate::handlers::exercises::update_exercise,
        crate::handlers::exercises::delete_exercise,
        crate::handlers::trainings::get_person_trainings,
        crate::handlers::trainings::create_training,
        crate::handlers::trainings::get_training,
        crate::handlers::trainings::update_training,
        crate::handlers::trainings::delete_training,
        crate::handlers::routines::get_routines,
        crate::handlers::routines::create_routine,
        crate::handlers::routines::get_routine,
        crate::handlers::routines::update_routine,
        crate::handlers::routines::delete_routine,
        crate::handlers::routines::get_other_exercises,
        crate::handlers::routines::add_exercise_to_routine,
        crate::handlers::routines::remove_exercise_from_routine,
        crate::handlers::routines::get_trainable_routines,
        crate::handlers::routines::log_routine_session,
        crate::handlers::reports::get_person_report,
        crate::handlers::reports::get_training_results,
        crate::handlers::trainers::get_trainers,
        crate::handlers::trainers::delete_trainer,
    ),
    components(
        schemas(
            ErrorResponse,
            HealthResponse,
            BmiClass,
            DailyResult,
            RoutineSession,
            TrainingRecord,
            crate::handlers::auth::SignInRequest,
            crate::handlers::auth::SignInResponse,
            crate::handlers::auth::LogInRequest,
            crate::handlers::auth::LogInResponse,
            crate::handlers::persons::PersonRequest,
            crate::handlers::persons::CreateClientRequest,
            crate::handlers::persons::PersonResponse,
            crate::handlers::exercises::ExerciseRequest,
            crate::handlers::exercises::ExerciseResponse,
            crate::handlers::trainings::TrainingRequest,
            crate::handlers::trainings::TrainingWithExercise,
            crate::handlers::routines::CreateRoutineRequest,
            crate::handlers::routines::UpdateRoutineRequest,
            crate::handlers::routines::RoutineResponse,
            crate::handlers::routines::RoutineDetailResponse,
            crate::handlers::routines::RoutineSessionRequest,
            crate::handlers::routines::RoutineSessionItem,
            crate::handlers::reports::PersonReport,
            crate::handlers::reports::TrainingResults,
        )
    ),
    modifiers(&BearerAuth),
    security(("bearer" = [])),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "auth", description = "Sign-up and login"),
        (name = "persons", description = "Trainers' clients and person records"),
        (name = "exercises", description = "Exercise catalogue"),
        (name = "trainings", description = "Logged training sessions"),
        (name = "routines", description = "Routines and their exercises"),
        (name = "reports", description = "BMI and training reports"),
        (name = "trainers", description = "Trainer administration"),
    ),
    info(
        title = "CoachTrack API",
        description = "Personal-training tracker: persons, exercises, routines, trainings and reports",
        version = "0.1.0",
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    )
)]
pub struct ApiDoc;
