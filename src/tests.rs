#[cfg(test)]
mod integration_tests {
    use crate::schemas::ApiResponse;
    use crate::test_utils::test_utils::{
        bearer, create_client, create_exercise, create_routine, log_training, login,
        setup_authenticated_server, setup_test_app, TRAINER_PASSWORD, TRAINER_USERNAME,
    };
    use axum::http::{header, HeaderValue, StatusCode};
    use axum_test::TestServer;
    use serde_json::{json, Value};

    #[tokio::test]
    async fn test_health_check() {
        let app = setup_test_app().await;
        let server = TestServer::new(app).unwrap();

        let response = server.get("/health").await;

        response.assert_status(StatusCode::OK);
        let body: Value = response.json();
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["database"], "connected");
    }

    #[tokio::test]
    async fn test_protected_route_requires_token() {
        let app = setup_test_app().await;
        let server = TestServer::new(app).unwrap();

        let response = server.get("/ejercicios").await;
        response.assert_status(StatusCode::UNAUTHORIZED);
        let body: Value = response.json();
        assert_eq!(body["success"], false);
        assert_eq!(body["code"], "UNAUTHORIZED");

        let response = server
            .get("/ejercicios")
            .add_header(header::AUTHORIZATION, HeaderValue::from_static("Bearer not-a-jwt"))
            .await;
        response.assert_status(StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_sign_in_trainer_creates_person_and_login_returns_token() {
        let app = setup_test_app().await;
        let server = TestServer::new(app).unwrap();

        let response = server
            .post("/signin")
            .json(&json!({"usuario": "maria", "contrasena": "Passw0rdX", "nombre": "Maria"}))
            .await;
        response.assert_status(StatusCode::CREATED);
        let body: ApiResponse<Value> = response.json();
        assert!(body.success);
        assert_eq!(body.data["rol"], "ENT");
        let person_id = body.data["persona"].as_i64().unwrap();

        let response = server
            .post("/login")
            .json(&json!({"usuario": "maria", "contrasena": "Passw0rdX"}))
            .await;
        response.assert_status(StatusCode::OK);
        let body: Value = response.json();
        assert_eq!(body["data"]["rol"], "ENT");
        assert_eq!(body["data"]["persona"].as_i64().unwrap(), person_id);
        let token = body["data"]["token"].as_str().unwrap();

        let response = server
            .get(&format!("/persona/{}", person_id))
            .add_header(
                header::AUTHORIZATION,
                HeaderValue::from_str(&format!("Bearer {}", token)).unwrap(),
            )
            .await;
        response.assert_status(StatusCode::OK);
        let body: Value = response.json();
        assert_eq!(body["data"]["nombre"], "Maria");
        assert_eq!(body["data"]["entrenando"], false);
    }

    #[tokio::test]
    async fn test_sign_in_client_role_has_no_person() {
        let app = setup_test_app().await;
        let server = TestServer::new(app).unwrap();

        let response = server
            .post("/signin")
            .json(&json!({"usuario": "client", "contrasena": "Passw0rdX", "rol": "CLI"}))
            .await;
        response.assert_status(StatusCode::CREATED);
        let body: Value = response.json();
        assert_eq!(body["data"]["rol"], "CLI");
        assert!(body["data"]["persona"].is_null());
    }

    #[tokio::test]
    async fn test_sign_in_duplicate_username_conflicts() {
        let app = setup_test_app().await;
        let server = TestServer::new(app).unwrap();
        let request = json!({"usuario": "dup", "contrasena": "Passw0rdX"});

        server.post("/signin").json(&request).await.assert_status(StatusCode::CREATED);
        let response = server.post("/signin").json(&request).await;

        response.assert_status(StatusCode::CONFLICT);
        let body: Value = response.json();
        assert_eq!(body["code"], "CONFLICT");
    }

    #[tokio::test]
    async fn test_sign_in_weak_password_conflicts() {
        let app = setup_test_app().await;
        let server = TestServer::new(app).unwrap();

        for password in ["short1A", "alllowercase1", "ALLUPPERCASE1", "NoDigitsHere"] {
            let response = server
                .post("/signin")
                .json(&json!({"usuario": "weak", "contrasena": password}))
                .await;
            response.assert_status(StatusCode::CONFLICT);
        }
    }

    #[tokio::test]
    async fn test_login_with_wrong_password_is_unauthorized() {
        let (server, _) = setup_authenticated_server().await;

        let response = server
            .post("/login")
            .json(&json!({"usuario": TRAINER_USERNAME, "contrasena": "Wrong1234"}))
            .await;
        response.assert_status(StatusCode::UNAUTHORIZED);

        let response = server
            .post("/login")
            .json(&json!({"usuario": "nobody", "contrasena": TRAINER_PASSWORD}))
            .await;
        response.assert_status(StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_create_client_with_login() {
        let (server, trainer_id) = setup_authenticated_server().await;

        let response = server
            .post(&format!("/personas/{}", trainer_id))
            .json(&json!({
                "nombre": "Luis",
                "apellido": "Perez",
                "talla": 1.8,
                "peso": 75.0,
                "usuario": "luis",
                "contrasena": "Client123",
            }))
            .await;
        response.assert_status(StatusCode::CREATED);
        let body: Value = response.json();
        assert_eq!(body["data"]["entrenador"].as_i64().unwrap() as i32, trainer_id);
        assert!(body["data"]["usuario"].as_i64().is_some());
        assert_eq!(body["data"]["entrenando"], true);

        let token = login(&server, "luis", "Client123").await;
        assert!(!token.is_empty());

        let response = server.get(&format!("/personas/{}", trainer_id)).await;
        response.assert_status(StatusCode::OK);
        let body: Value = response.json();
        assert_eq!(body["data"].as_array().unwrap().len(), 1);
        assert_eq!(body["data"][0]["nombre"], "Luis");
    }

    #[tokio::test]
    async fn test_create_client_with_taken_username_rolls_back() {
        let (server, trainer_id) = setup_authenticated_server().await;

        let response = server
            .post(&format!("/personas/{}", trainer_id))
            .json(&json!({
                "nombre": "Dup",
                "apellido": "Client",
                "usuario": TRAINER_USERNAME,
                "contrasena": "Client123",
            }))
            .await;
        response.assert_status(StatusCode::CONFLICT);

        let body: Value = server.get(&format!("/personas/{}", trainer_id)).await.json();
        assert!(body["data"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_clients_of_unknown_trainer_not_found() {
        let (server, _) = setup_authenticated_server().await;

        server.get("/personas/9999").await.assert_status(StatusCode::NOT_FOUND);
        server
            .post("/personas/9999")
            .json(&json!({"nombre": "X", "apellido": "Y"}))
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_update_person() {
        let (server, trainer_id) = setup_authenticated_server().await;
        let client_id = create_client(&server, trainer_id, "Eva").await;

        let response = server
            .put(&format!("/persona/{}", client_id))
            .json(&json!({
                "nombre": "Eva",
                "apellido": "Lopez",
                "talla": 1.65,
                "peso": 60.0,
                "entrenando": false,
                "razon": "Moved away",
                "terminado": "2024-06-30",
            }))
            .await;
        response.assert_status(StatusCode::OK);
        let body: Value = response.json();
        assert_eq!(body["data"]["apellido"], "Lopez");
        assert_eq!(body["data"]["entrenando"], false);
        assert_eq!(body["data"]["razon"], "Moved away");
        assert_eq!(body["data"]["terminado"], "2024-06-30");

        server
            .put("/persona/9999")
            .json(&json!({"nombre": "X", "apellido": "Y"}))
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_delete_person_with_trainings_conflicts() {
        let (server, trainer_id) = setup_authenticated_server().await;
        let client_id = create_client(&server, trainer_id, "Busy").await;
        let exercise_id = create_exercise(&server, "Squat", 1.0).await;
        log_training(&server, client_id, exercise_id, "2024-01-01", 10, "00:01:00").await;

        let response = server.delete(&format!("/persona/{}", client_id)).await;
        response.assert_status(StatusCode::CONFLICT);

        server
            .get(&format!("/persona/{}", client_id))
            .await
            .assert_status(StatusCode::OK);
    }

    #[tokio::test]
    async fn test_delete_person_without_trainings() {
        let (server, trainer_id) = setup_authenticated_server().await;
        let client_id = create_client(&server, trainer_id, "Idle").await;

        server
            .delete(&format!("/persona/{}", client_id))
            .await
            .assert_status(StatusCode::NO_CONTENT);
        server
            .get(&format!("/persona/{}", client_id))
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_delete_person_with_clients_conflicts() {
        let (server, trainer_id) = setup_authenticated_server().await;
        create_client(&server, trainer_id, "Kept").await;

        server
            .delete(&format!("/persona/{}", trainer_id))
            .await
            .assert_status(StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_exercise_crud() {
        let (server, _) = setup_authenticated_server().await;

        let exercise_id = create_exercise(&server, "Push up", 2.5).await;

        let response = server.get(&format!("/ejercicio/{}", exercise_id)).await;
        response.assert_status(StatusCode::OK);
        let body: Value = response.json();
        assert_eq!(body["data"]["nombre"], "Push up");
        assert_eq!(body["data"]["calorias"], 2.5);

        let response = server
            .put(&format!("/ejercicio/{}", exercise_id))
            .json(&json!({
                "nombre": "Wide push up",
                "descripcion": "Hands wide",
                "video": "https://example.com/wide",
                "calorias": 3.0,
            }))
            .await;
        response.assert_status(StatusCode::OK);
        let body: Value = response.json();
        assert_eq!(body["data"]["nombre"], "Wide push up");

        let body: Value = server.get("/ejercicios").await.json();
        assert_eq!(body["data"].as_array().unwrap().len(), 1);

        server
            .delete(&format!("/ejercicio/{}", exercise_id))
            .await
            .assert_status(StatusCode::NO_CONTENT);
        server
            .get(&format!("/ejercicio/{}", exercise_id))
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_create_exercise_rejects_invalid_body() {
        let (server, _) = setup_authenticated_server().await;

        let response = server
            .post("/ejercicios")
            .json(&json!({"nombre": "", "calorias": 1.0}))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);

        let response = server
            .post("/ejercicios")
            .json(&json!({"nombre": "Negative", "calorias": -1.0}))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_delete_exercise_with_trainings_conflicts() {
        let (server, trainer_id) = setup_authenticated_server().await;
        let client_id = create_client(&server, trainer_id, "Runner").await;
        let exercise_id = create_exercise(&server, "Run", 1.0).await;
        log_training(&server, client_id, exercise_id, "2024-01-01", 1, "00:30:00").await;

        server
            .delete(&format!("/ejercicio/{}", exercise_id))
            .await
            .assert_status(StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_training_crud() {
        let (server, trainer_id) = setup_authenticated_server().await;
        let client_id = create_client(&server, trainer_id, "Tom").await;
        let exercise_id = create_exercise(&server, "Lunge", 1.0).await;

        let training_id =
            log_training(&server, client_id, exercise_id, "2024-02-01", 12, "00:02:30").await;

        let response = server.get(&format!("/entrenamientos/{}", client_id)).await;
        response.assert_status(StatusCode::OK);
        let body: Value = response.json();
        let trainings = body["data"].as_array().unwrap();
        assert_eq!(trainings.len(), 1);
        assert_eq!(trainings[0]["tiempo"], "00:02:30");
        assert_eq!(trainings[0]["ejercicio"]["nombre"], "Lunge");

        let response = server
            .put(&format!("/entrenamiento/{}", training_id))
            .json(&json!({
                "tiempo": "00:03:00",
                "repeticiones": 15,
                "fecha": "2024-02-02",
                "ejercicio": exercise_id,
            }))
            .await;
        response.assert_status(StatusCode::OK);
        let body: Value = response.json();
        assert_eq!(body["data"]["repeticiones"], 15);
        assert_eq!(body["data"]["fecha"], "2024-02-02");
        assert_eq!(body["data"]["persona"].as_i64().unwrap() as i32, client_id);

        server
            .delete(&format!("/entrenamiento/{}", training_id))
            .await
            .assert_status(StatusCode::NO_CONTENT);
        server
            .get(&format!("/entrenamiento/{}", training_id))
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_create_training_validates_references_and_duration() {
        let (server, trainer_id) = setup_authenticated_server().await;
        let client_id = create_client(&server, trainer_id, "Val").await;
        let exercise_id = create_exercise(&server, "Plank", 1.0).await;

        let response = server
            .post(&format!("/entrenamientos/{}", client_id))
            .json(&json!({
                "tiempo": "00:01:00",
                "repeticiones": 1,
                "fecha": "2024-01-01",
                "ejercicio": 9999,
            }))
            .await;
        response.assert_status(StatusCode::NOT_FOUND);

        let response = server
            .post(&format!("/entrenamientos/{}", client_id))
            .json(&json!({
                "tiempo": "00:00:00",
                "repeticiones": 1,
                "fecha": "2024-01-01",
                "ejercicio": exercise_id,
            }))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_person_report() {
        let (server, trainer_id) = setup_authenticated_server().await;
        let client_id = create_client(&server, trainer_id, "Report").await;
        let exercise_id = create_exercise(&server, "Burpee", 1.0).await;
        // 4 * r^2 * 1.0 / seconds gives 10, 4 and 2 calories
        log_training(&server, client_id, exercise_id, "2024-01-01", 5, "00:00:10").await;
        log_training(&server, client_id, exercise_id, "2024-01-01", 3, "00:00:09").await;
        log_training(&server, client_id, exercise_id, "2024-01-02", 2, "00:00:08").await;

        let response = server.get(&format!("/persona/{}/reporte", client_id)).await;
        response.assert_status(StatusCode::OK);
        let body: Value = response.json();
        let report = &body["data"];

        assert_eq!(report["persona"]["id"].as_i64().unwrap() as i32, client_id);
        assert_eq!(report["imc"], 20.0);
        assert_eq!(report["clasificacion_imc"], "Peso saludable");
        assert_eq!(
            report["resultados"],
            json!([
                {"fecha": "2024-01-01", "repeticiones": 8, "calorias": 14.0},
                {"fecha": "2024-01-02", "repeticiones": 2, "calorias": 2.0},
                {"fecha": "Total", "repeticiones": 10, "calorias": 16.0},
            ])
        );
    }

    #[tokio::test]
    async fn test_report_without_height_is_unprocessable() {
        let (server, trainer_id) = setup_authenticated_server().await;

        // The trainer person created at sign-up has no measurements
        let response = server.get(&format!("/persona/{}/reporte", trainer_id)).await;
        response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_report_without_trainings_has_only_total_row() {
        let (server, trainer_id) = setup_authenticated_server().await;
        let client_id = create_client(&server, trainer_id, "Fresh").await;

        let body: Value = server
            .get(&format!("/persona/{}/reporte", client_id))
            .await
            .json();
        assert_eq!(
            body["data"]["resultados"],
            json!([{"fecha": "Total", "repeticiones": 0, "calorias": 0.0}])
        );
    }

    #[tokio::test]
    async fn test_routine_name_is_unique_ignoring_case() {
        let (server, _) = setup_authenticated_server().await;
        create_routine(&server, "Leg Day", &[]).await;

        let response = server
            .post("/rutinas")
            .json(&json!({"nombre": "leg day", "descripcion": "again"}))
            .await;
        response.assert_status(StatusCode::CONFLICT);

        let body: Value = server.get("/rutinas").await.json();
        assert_eq!(body["data"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_rename_routine_onto_existing_name_conflicts() {
        let (server, _) = setup_authenticated_server().await;
        create_routine(&server, "Upper", &[]).await;
        let lower_id = create_routine(&server, "Lower", &[]).await;

        server
            .put(&format!("/rutina/{}", lower_id))
            .json(&json!({"nombre": "UPPER", "descripcion": ""}))
            .await
            .assert_status(StatusCode::CONFLICT);

        let response = server
            .put(&format!("/rutina/{}", lower_id))
            .json(&json!({"nombre": "lower body", "descripcion": "renamed"}))
            .await;
        response.assert_status(StatusCode::OK);
        let body: Value = response.json();
        assert_eq!(body["data"]["nombre"], "lower body");
    }

    #[tokio::test]
    async fn test_routine_exercise_association_is_idempotent() {
        let (server, _) = setup_authenticated_server().await;
        let routine_id = create_routine(&server, "Core", &[]).await;
        let exercise_id = create_exercise(&server, "Crunch", 1.0).await;

        for _ in 0..2 {
            let response = server
                .put(&format!("/rutina/{}/ejercicio/{}", routine_id, exercise_id))
                .await;
            response.assert_status(StatusCode::OK);
        }

        let body: Value = server.get(&format!("/rutina/{}", routine_id)).await.json();
        assert_eq!(body["data"]["ejercicios"].as_array().unwrap().len(), 1);

        server
            .put(&format!("/rutina/{}/ejercicio/9999", routine_id))
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_remove_exercise_from_routine() {
        let (server, _) = setup_authenticated_server().await;
        let exercise_id = create_exercise(&server, "Row", 1.0).await;
        let routine_id = create_routine(&server, "Back", &[exercise_id]).await;

        server
            .delete(&format!("/rutina/{}/ejercicio/{}", routine_id, exercise_id))
            .await
            .assert_status(StatusCode::NO_CONTENT);
        server
            .delete(&format!("/rutina/{}/ejercicio/{}", routine_id, exercise_id))
            .await
            .assert_status(StatusCode::NOT_FOUND);

        let body: Value = server.get(&format!("/rutina/{}", routine_id)).await.json();
        assert!(body["data"]["ejercicios"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_other_exercises_uses_ids() {
        let (server, _) = setup_authenticated_server().await;
        let press = create_exercise(&server, "Press", 1.0).await;
        let bench_press = create_exercise(&server, "Bench Press", 1.0).await;
        let curl = create_exercise(&server, "Curl", 1.0).await;
        let routine_id = create_routine(&server, "Push", &[bench_press]).await;

        let body: Value = server
            .get(&format!("/rutina/{}/diferente", routine_id))
            .await
            .json();
        let ids: Vec<i64> = body["data"]
            .as_array()
            .unwrap()
            .iter()
            .map(|e| e["id"].as_i64().unwrap())
            .collect();
        assert_eq!(ids, vec![press as i64, curl as i64]);
    }

    #[tokio::test]
    async fn test_trainable_routines_need_three_exercises() {
        let (server, _) = setup_authenticated_server().await;
        let a = create_exercise(&server, "A", 1.0).await;
        let b = create_exercise(&server, "B", 1.0).await;
        let c = create_exercise(&server, "C", 1.0).await;
        create_routine(&server, "Short", &[a, b]).await;
        let full_id = create_routine(&server, "Full", &[a, b, c]).await;

        let body: Value = server.get("/rutinasEntrenamiento").await.json();
        let routines = body["data"].as_array().unwrap();
        assert_eq!(routines.len(), 1);
        assert_eq!(routines[0]["id"].as_i64().unwrap() as i32, full_id);
        assert_eq!(routines[0]["ejercicios"].as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_delete_routine() {
        let (server, trainer_id) = setup_authenticated_server().await;
        let client_id = create_client(&server, trainer_id, "Routine").await;
        let a = create_exercise(&server, "A", 1.0).await;
        let used_id = create_routine(&server, "Used", &[a]).await;
        let unused_id = create_routine(&server, "Unused", &[a]).await;

        server
            .post("/rutinasEntrenamiento")
            .json(&json!({
                "persona": client_id,
                "rutina": used_id,
                "fecha": "2024-03-01",
                "ejercicios": [{"ejercicio": a, "repeticiones": 5, "tiempo": "00:01:00"}],
            }))
            .await
            .assert_status(StatusCode::CREATED);

        server
            .delete(&format!("/rutina/{}", used_id))
            .await
            .assert_status(StatusCode::CONFLICT);
        server
            .delete(&format!("/rutina/{}", unused_id))
            .await
            .assert_status(StatusCode::NO_CONTENT);
        server
            .get(&format!("/rutina/{}", unused_id))
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_routine_session_results() {
        let (server, trainer_id) = setup_authenticated_server().await;
        let client_id = create_client(&server, trainer_id, "Session").await;
        let a = create_exercise(&server, "A", 1.0).await;
        let b = create_exercise(&server, "B", 1.0).await;
        let c = create_exercise(&server, "C", 1.0).await;
        let routine_id = create_routine(&server, "Circuit", &[a, b, c]).await;

        let response = server
            .post("/rutinasEntrenamiento")
            .json(&json!({
                "persona": client_id,
                "rutina": routine_id,
                "fecha": "2024-03-01",
                "ejercicios": [
                    {"ejercicio": a, "repeticiones": 10, "tiempo": "00:00:45"},
                    {"ejercicio": b, "repeticiones": 8, "tiempo": "00:00:45"},
                ],
            }))
            .await;
        response.assert_status(StatusCode::CREATED);
        let body: Value = response.json();
        assert_eq!(body["data"]["repeticiones"], 18);
        assert_eq!(body["data"]["tiempo"], "00:01:30");

        log_training(&server, client_id, c, "2024-03-02", 4, "00:02:00").await;

        let response = server
            .get(&format!("/resultadosEntrenamientos/{}", client_id))
            .await;
        response.assert_status(StatusCode::OK);
        let body: Value = response.json();
        let sessions = body["data"]["rutinas"].as_array().unwrap();
        assert_eq!(sessions.len(), 1);
        assert_eq!(sessions[0]["rutina"].as_i64().unwrap() as i32, routine_id);
        assert_eq!(sessions[0]["fecha"], "2024-03-01");
        assert_eq!(sessions[0]["entrenamientos"].as_array().unwrap().len(), 2);
        let free = body["data"]["ejercicios"].as_array().unwrap();
        assert_eq!(free.len(), 1);
        assert_eq!(free[0]["ejercicio"].as_i64().unwrap() as i32, c);
    }

    #[tokio::test]
    async fn test_routine_session_with_foreign_exercise_rolls_back() {
        let (server, trainer_id) = setup_authenticated_server().await;
        let client_id = create_client(&server, trainer_id, "Strict").await;
        let a = create_exercise(&server, "A", 1.0).await;
        let outsider = create_exercise(&server, "Outsider", 1.0).await;
        let routine_id = create_routine(&server, "Only A", &[a]).await;

        let response = server
            .post("/rutinasEntrenamiento")
            .json(&json!({
                "persona": client_id,
                "rutina": routine_id,
                "fecha": "2024-03-01",
                "ejercicios": [
                    {"ejercicio": a, "repeticiones": 10, "tiempo": "00:00:45"},
                    {"ejercicio": outsider, "repeticiones": 8, "tiempo": "00:00:45"},
                ],
            }))
            .await;
        response.assert_status(StatusCode::CONFLICT);

        let body: Value = server
            .get(&format!("/entrenamientos/{}", client_id))
            .await
            .json();
        assert!(body["data"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_trainers_listing_and_delete_guard() {
        let (server, trainer_id) = setup_authenticated_server().await;

        server
            .post("/signin")
            .json(&json!({"usuario": "second", "contrasena": "Passw0rdX", "nombre": "Bea"}))
            .await
            .assert_status(StatusCode::CREATED);

        let body: Value = server.get("/entrenadores").await.json();
        let trainers = body["data"].as_array().unwrap();
        assert_eq!(trainers.len(), 2);

        let second_id = trainers
            .iter()
            .find(|t| t["nombre"] == "Bea")
            .and_then(|t| t["id"].as_i64())
            .unwrap();
        create_client(&server, trainer_id, "Assigned").await;

        server
            .delete(&format!("/entrenador/{}", trainer_id))
            .await
            .assert_status(StatusCode::CONFLICT);
        server
            .delete(&format!("/entrenador/{}", second_id))
            .await
            .assert_status(StatusCode::NO_CONTENT);

        let body: Value = server.get("/entrenadores").await.json();
        assert_eq!(body["data"].as_array().unwrap().len(), 1);

        // The deleted trainer's login is gone too
        server
            .post("/login")
            .json(&json!({"usuario": "second", "contrasena": "Passw0rdX"}))
            .await
            .assert_status(StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_sign_in_as_admin_is_forbidden() {
        let app = setup_test_app().await;
        let server = TestServer::new(app).unwrap();

        let response = server
            .post("/signin")
            .json(&json!({"usuario": "root", "contrasena": "Passw0rdX", "rol": "ADM"}))
            .await;
        response.assert_status(StatusCode::FORBIDDEN);
        let body: Value = response.json();
        assert_eq!(body["code"], "FORBIDDEN");

        server
            .post("/login")
            .json(&json!({"usuario": "root", "contrasena": "Passw0rdX"}))
            .await
            .assert_status(StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_inputs_longer_than_columns_are_rejected() {
        let (server, _) = setup_authenticated_server().await;

        server
            .post("/signin")
            .json(&json!({"usuario": "u".repeat(51), "contrasena": "Passw0rdX"}))
            .await
            .assert_status(StatusCode::BAD_REQUEST);
        server
            .post("/signin")
            .json(&json!({"usuario": "u".repeat(50), "contrasena": "Passw0rdX"}))
            .await
            .assert_status(StatusCode::CREATED);

        server
            .post("/ejercicios")
            .json(&json!({
                "nombre": "Long",
                "descripcion": "d".repeat(513),
                "video": "",
                "calorias": 1.0,
            }))
            .await
            .assert_status(StatusCode::BAD_REQUEST);
        server
            .post("/ejercicios")
            .json(&json!({
                "nombre": "Long",
                "descripcion": "",
                "video": "v".repeat(513),
                "calorias": 1.0,
            }))
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_client_login_cannot_use_staff_routes() {
        let app = setup_test_app().await;
        let server = TestServer::new(app).unwrap();

        let body: Value = server
            .post("/signin")
            .json(&json!({"usuario": TRAINER_USERNAME, "contrasena": TRAINER_PASSWORD}))
            .await
            .json();
        let trainer_id = body["data"]["persona"].as_i64().unwrap() as i32;
        server
            .post("/signin")
            .json(&json!({"usuario": "client", "contrasena": "Passw0rdX", "rol": "CLI"}))
            .await
            .assert_status(StatusCode::CREATED);

        let trainer_token = login(&server, TRAINER_USERNAME, TRAINER_PASSWORD).await;
        let client_token = login(&server, "client", "Passw0rdX").await;

        let response = server
            .post(&format!("/personas/{}", trainer_id))
            .add_header(header::AUTHORIZATION, bearer(&client_token))
            .json(&json!({"nombre": "Sneaky", "apellido": "Client"}))
            .await;
        response.assert_status(StatusCode::FORBIDDEN);
        let body: Value = response.json();
        assert_eq!(body["code"], "FORBIDDEN");

        server
            .delete(&format!("/entrenador/{}", trainer_id))
            .add_header(header::AUTHORIZATION, bearer(&client_token))
            .await
            .assert_status(StatusCode::FORBIDDEN);
        server
            .delete(&format!("/persona/{}", trainer_id))
            .add_header(header::AUTHORIZATION, bearer(&client_token))
            .await
            .assert_status(StatusCode::FORBIDDEN);

        // Reads stay open to clients
        server
            .get("/ejercicios")
            .add_header(header::AUTHORIZATION, bearer(&client_token))
            .await
            .assert_status(StatusCode::OK);

        // The trainer is still there
        server
            .get(&format!("/persona/{}", trainer_id))
            .add_header(header::AUTHORIZATION, bearer(&trainer_token))
            .await
            .assert_status(StatusCode::OK);
    }

    #[tokio::test]
    async fn test_delete_trainer_refuses_non_trainers() {
        let (server, trainer_id) = setup_authenticated_server().await;

        let body: Value = server
            .post(&format!("/personas/{}", trainer_id))
            .json(&json!({
                "nombre": "Luis",
                "apellido": "Perez",
                "usuario": "luis",
                "contrasena": "Client123",
            }))
            .await
            .json();
        let client_id = body["data"]["id"].as_i64().unwrap() as i32;
        let anonymous_id = create_client(&server, trainer_id, "NoLogin").await;

        for id in [client_id, anonymous_id] {
            server
                .delete(&format!("/entrenador/{}", id))
                .await
                .assert_status(StatusCode::NOT_FOUND);
            server
                .get(&format!("/persona/{}", id))
                .await
                .assert_status(StatusCode::OK);
        }

        let token = login(&server, "luis", "Client123").await;
        assert!(!token.is_empty());
    }

    #[tokio::test]
    async fn test_delete_client_removes_its_login() {
        let app = setup_test_app().await;
        let server = TestServer::new(app).unwrap();

        let body: Value = server
            .post("/signin")
            .json(&json!({"usuario": TRAINER_USERNAME, "contrasena": TRAINER_PASSWORD}))
            .await
            .json();
        let trainer_id = body["data"]["persona"].as_i64().unwrap() as i32;
        let trainer_token = login(&server, TRAINER_USERNAME, TRAINER_PASSWORD).await;

        let body: Value = server
            .post(&format!("/personas/{}", trainer_id))
            .add_header(header::AUTHORIZATION, bearer(&trainer_token))
            .json(&json!({
                "nombre": "Gone",
                "apellido": "Soon",
                "usuario": "gone",
                "contrasena": "Client123",
            }))
            .await
            .json();
        let client_id = body["data"]["id"].as_i64().unwrap() as i32;
        let client_token = login(&server, "gone", "Client123").await;

        server
            .delete(&format!("/persona/{}", client_id))
            .add_header(header::AUTHORIZATION, bearer(&trainer_token))
            .await
            .assert_status(StatusCode::NO_CONTENT);

        server
            .post("/login")
            .json(&json!({"usuario": "gone", "contrasena": "Client123"}))
            .await
            .assert_status(StatusCode::UNAUTHORIZED);
        server
            .get("/ejercicios")
            .add_header(header::AUTHORIZATION, bearer(&client_token))
            .await
            .assert_status(StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_training_exercise_must_belong_to_its_routine() {
        let (server, trainer_id) = setup_authenticated_server().await;
        let client_id = create_client(&server, trainer_id, "Member").await;
        let a = create_exercise(&server, "A", 1.0).await;
        let outsider = create_exercise(&server, "Outsider", 1.0).await;
        let routine_id = create_routine(&server, "Only A", &[a]).await;

        let response = server
            .post(&format!("/entrenamientos/{}", client_id))
            .json(&json!({
                "tiempo": "00:01:00",
                "repeticiones": 5,
                "fecha": "2024-03-01",
                "ejercicio": outsider,
                "rutina": routine_id,
            }))
            .await;
        response.assert_status(StatusCode::CONFLICT);

        let response = server
            .post(&format!("/entrenamientos/{}", client_id))
            .json(&json!({
                "tiempo": "00:01:00",
                "repeticiones": 5,
                "fecha": "2024-03-01",
                "ejercicio": a,
                "rutina": routine_id,
            }))
            .await;
        response.assert_status(StatusCode::CREATED);
        let training_id = response.json::<Value>()["data"]["id"].as_i64().unwrap() as i32;

        server
            .put(&format!("/entrenamiento/{}", training_id))
            .json(&json!({
                "tiempo": "00:01:00",
                "repeticiones": 5,
                "fecha": "2024-03-01",
                "ejercicio": outsider,
                "rutina": routine_id,
            }))
            .await
            .assert_status(StatusCode::CONFLICT);

        let body: Value = server
            .get(&format!("/resultadosEntrenamientos/{}", client_id))
            .await
            .json();
        let sessions = body["data"]["rutinas"].as_array().unwrap();
        assert_eq!(sessions.len(), 1);
        let members = sessions[0]["entrenamientos"].as_array().unwrap();
        assert_eq!(members.len(), 1);
        assert_eq!(members[0]["ejercicio"].as_i64().unwrap() as i32, a);
    }

    #[tokio::test]
    async fn test_report_rows_follow_logging_order() {
        let (server, trainer_id) = setup_authenticated_server().await;
        let client_id = create_client(&server, trainer_id, "Order").await;
        let exercise_id = create_exercise(&server, "Squat", 1.0).await;
        log_training(&server, client_id, exercise_id, "2024-01-02", 2, "00:00:08").await;
        log_training(&server, client_id, exercise_id, "2024-01-01", 5, "00:00:10").await;

        let body: Value = server
            .get(&format!("/persona/{}/reporte", client_id))
            .await
            .json();
        let dates: Vec<&str> = body["data"]["resultados"]
            .as_array()
            .unwrap()
            .iter()
            .map(|row| row["fecha"].as_str().unwrap())
            .collect();
        assert_eq!(dates, ["2024-01-02", "2024-01-01", "Total"]);
    }
}
