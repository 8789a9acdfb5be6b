use crate::auth::require_auth;
use crate::handlers::{
    auth::{log_in, sign_in},
    exercises::{create_exercise, delete_exercise, get_exercise, get_exercises, update_exercise},
    health::health_check,
    persons::{create_client, delete_person, get_clients, get_person, update_person},
    reports::{get_person_report, get_training_results},
    routines::{
        add_exercise_to_routine, create_routine, delete_routine, get_other_exercises,
        get_routine, get_routines, get_trainable_routines, log_routine_session,
        remove_exercise_from_routine, update_routine,
    },
    trainers::{delete_trainer, get_trainers},
    trainings::{
        create_training, delete_training, get_person_trainings, get_training, update_training,
    },
};
use crate::schemas::{ApiDoc, AppState};
use axum::{
    middleware,
    routing::{delete, get, post, put},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer, cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Routes that require a bearer token
fn protected_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        // Persons
        .route("/personas/:trainer_id", get(get_clients).post(create_client))
        .route(
            "/persona/:person_id",
            get(get_person).put(update_person).delete(delete_person),
        )
        .route("/persona/:person_id/reporte", get(get_person_report))
        // Exercises
        .route("/ejercicios", get(get_exercises).post(create_exercise))
        .route(
            "/ejercicio/:exercise_id",
            get(get_exercise).put(update_exercise).delete(delete_exercise),
        )
        // Trainings
        .route(
            "/entrenamientos/:person_id",
            get(get_person_trainings).post(create_training),
        )
        .route(
            "/entrenamiento/:training_id",
            get(get_training).put(update_training).delete(delete_training),
        )
        .route("/resultadosEntrenamientos/:person_id", get(get_training_results))
        // Routines
        .route("/rutinas", get(get_routines).post(create_routine))
        .route(
            "/rutina/:routine_id",
            get(get_routine).put(update_routine).delete(delete_routine),
        )
        .route("/rutina/:routine_id/diferente", get(get_other_exercises))
        .route(
            "/rutina/:routine_id/ejercicio/:exercise_id",
            put(add_exercise_to_routine).delete(remove_exercise_from_routine),
        )
        .route(
            "/rutinasEntrenamiento",
            get(get_trainable_routines).post(log_routine_session),
        )
        // Trainers
        .route("/entrenadores", get(get_trainers))
        .route("/entrenador/:trainer_id", delete(delete_trainer))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth))
}

/// Create application router with all routes and middleware
pub fn create_router(state: AppState) -> Router {
    let timeout = state.request_timeout;

    Router::new()
        // Health check
        .route("/health", get(health_check))
        // Sign-up and login
        .route("/signin", post(sign_in))
        .route("/login", post(log_in))
        .merge(protected_routes(&state))
        // Swagger UI
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // Add middleware
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new())
                .layer(TimeoutLayer::new(timeout))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}
