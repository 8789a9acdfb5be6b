#[cfg(test)]
pub mod test_utils {
    use crate::auth::JwtConfig;
    use crate::router::create_router;
    use crate::schemas::AppState;
    use axum::http::{header, HeaderValue};
    use axum::Router;
    use axum_test::TestServer;
    use migration::{Migrator, MigratorTrait};
    use sea_orm::{Database, DatabaseConnection};
    use serde_json::{json, Value};
    use std::time::Duration;
    use tracing_subscriber::EnvFilter;

    pub const TRAINER_USERNAME: &str = "coach";
    pub const TRAINER_PASSWORD: &str = "Secret123";

    /// Create an in-memory SQLite database for testing
    pub async fn setup_test_db() -> DatabaseConnection {
        let db = Database::connect("sqlite::memory:")
            .await
            .expect("Failed to connect to in-memory database");

        // Run migrations
        Migrator::up(&db, None)
            .await
            .expect("Failed to run migrations");

        db
    }

    /// Create AppState for testing
    pub async fn setup_test_app_state() -> AppState {
        AppState {
            db: setup_test_db().await,
            jwt: JwtConfig::new("test-secret", 60),
            request_timeout: Duration::from_secs(30),
        }
    }

    /// Initialize tracing for tests. The filter comes from RUST_LOG and
    /// defaults to warnings only.
    fn init_test_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
            )
            .with_test_writer()
            .try_init();
    }

    /// Create axum app for testing
    pub async fn setup_test_app() -> Router {
        init_test_tracing();
        let state = setup_test_app_state().await;
        create_router(state)
    }

    /// Server with a plain trainer signed up and every request carrying its
    /// bearer token. Returns the trainer's person id.
    pub async fn setup_authenticated_server() -> (TestServer, i32) {
        let app = setup_test_app().await;
        let mut server = TestServer::new(app).unwrap();

        let response = server
            .post("/signin")
            .json(&json!({
                "usuario": TRAINER_USERNAME,
                "contrasena": TRAINER_PASSWORD,
                "nombre": "Ana",
                "apellido": "Trainer",
            }))
            .await;
        response.assert_status(axum::http::StatusCode::CREATED);

        let body: Value = server
            .post("/login")
            .json(&json!({"usuario": TRAINER_USERNAME, "contrasena": TRAINER_PASSWORD}))
            .await
            .json();
        let token = body["data"]["token"].as_str().unwrap().to_string();
        let trainer_id = body["data"]["persona"].as_i64().unwrap() as i32;

        server.add_header(header::AUTHORIZATION, bearer(&token));
        (server, trainer_id)
    }

    pub fn bearer(token: &str) -> HeaderValue {
        HeaderValue::from_str(&format!("Bearer {}", token)).unwrap()
    }

    pub async fn login(server: &TestServer, username: &str, password: &str) -> String {
        let body: Value = server
            .post("/login")
            .json(&json!({"usuario": username, "contrasena": password}))
            .await
            .json();
        body["data"]["token"].as_str().unwrap().to_string()
    }

    /// Extracts `data.id` from a created resource.
    pub fn created_id(body: &Value) -> i32 {
        body["data"]["id"].as_i64().unwrap() as i32
    }

    pub async fn create_exercise(server: &TestServer, name: &str, calories: f64) -> i32 {
        let body: Value = server
            .post("/ejercicios")
            .json(&json!({
                "nombre": name,
                "descripcion": format!("{} description", name),
                "video": "https://example.com/video",
                "calorias": calories,
            }))
            .await
            .json();
        created_id(&body)
    }

    pub async fn create_client(server: &TestServer, trainer_id: i32, name: &str) -> i32 {
        let body: Value = server
            .post(&format!("/personas/{}", trainer_id))
            .json(&json!({
                "nombre": name,
                "apellido": "Client",
                "talla": 2.0,
                "peso": 80.0,
                "edad": 30.0,
            }))
            .await
            .json();
        created_id(&body)
    }

    pub async fn create_routine(server: &TestServer, name: &str, exercise_ids: &[i32]) -> i32 {
        let body: Value = server
            .post("/rutinas")
            .json(&json!({
                "nombre": name,
                "descripcion": "routine",
                "ejercicios": exercise_ids,
            }))
            .await
            .json();
        created_id(&body)
    }

    pub async fn log_training(
        server: &TestServer,
        person_id: i32,
        exercise_id: i32,
        date: &str,
        repetitions: i32,
        duration: &str,
    ) -> i32 {
        let body: Value = server
            .post(&format!("/entrenamientos/{}", person_id))
            .json(&json!({
                "tiempo": duration,
                "repeticiones": repetitions,
                "fecha": date,
                "ejercicio": exercise_id,
            }))
            .await
            .json();
        created_id(&body)
    }
}
