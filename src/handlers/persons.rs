use super::auth::{credentials_error, user_insert_error};
use super::find_person;
use crate::auth::{hash_password, validate_password_strength, AuthenticatedUser};
use crate::error::{ApiError, ApiResult};
use crate::schemas::{ApiResponse, AppState};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    Extension,
};
use axum_valid::Valid;
use chrono::NaiveDate;
use model::entities::{person, training, user, user::Role};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, trace, warn};
use utoipa::ToSchema;
use validator::Validate;

/// Person data accepted on create and update
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema, Validate)]
pub struct PersonRequest {
    #[serde(rename = "nombre")]
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[serde(rename = "apellido")]
    #[validate(length(max = 100))]
    pub last_name: String,
    /// Height in meters
    #[serde(rename = "talla", default)]
    #[validate(range(min = 0.0))]
    pub height: f64,
    /// Weight in kilograms
    #[serde(rename = "peso", default)]
    #[validate(range(min = 0.0))]
    pub weight: f64,
    #[serde(rename = "edad", default)]
    #[validate(range(min = 0.0))]
    pub age: f64,
    #[serde(rename = "brazo", default)]
    #[validate(range(min = 0.0))]
    pub arm: f64,
    #[serde(rename = "pecho", default)]
    #[validate(range(min = 0.0))]
    pub chest: f64,
    #[serde(rename = "cintura", default)]
    #[validate(range(min = 0.0))]
    pub waist: f64,
    #[serde(rename = "pierna", default)]
    #[validate(range(min = 0.0))]
    pub leg: f64,
    /// Enrollment date, today when omitted on create
    #[serde(rename = "ingreso", default)]
    pub enrolled_on: Option<NaiveDate>,
    /// Active training flag, true when omitted on create
    #[serde(rename = "entrenando", default)]
    pub training: Option<bool>,
    /// Why the person stopped training
    #[serde(rename = "razon", default)]
    #[validate(length(max = 512))]
    pub end_reason: Option<String>,
    #[serde(rename = "terminado", default)]
    pub ended_on: Option<NaiveDate>,
}

/// Request body for creating a client under a trainer. When `usuario` and
/// `contrasena` are present a client login is created too.
#[derive(Deserialize, Serialize, ToSchema, Validate)]
pub struct CreateClientRequest {
    #[serde(flatten)]
    #[validate(nested)]
    pub person: PersonRequest,
    #[serde(rename = "usuario", default)]
    #[validate(length(min = 1, max = 50))]
    pub username: Option<String>,
    #[serde(rename = "contrasena", default)]
    #[validate(custom(function = "validate_password_strength"))]
    pub password: Option<String>,
}

/// Person response model
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PersonResponse {
    pub id: i32,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "apellido")]
    pub last_name: String,
    #[serde(rename = "talla")]
    pub height: f64,
    #[serde(rename = "peso")]
    pub weight: f64,
    #[serde(rename = "edad")]
    pub age: f64,
    #[serde(rename = "brazo")]
    pub arm: f64,
    #[serde(rename = "pecho")]
    pub chest: f64,
    #[serde(rename = "cintura")]
    pub waist: f64,
    #[serde(rename = "pierna")]
    pub leg: f64,
    #[serde(rename = "ingreso")]
    pub enrolled_on: NaiveDate,
    #[serde(rename = "entrenando")]
    pub training: bool,
    #[serde(rename = "razon")]
    pub end_reason: Option<String>,
    #[serde(rename = "terminado")]
    pub ended_on: Option<NaiveDate>,
    /// Owning user
    #[serde(rename = "usuario")]
    pub user_id: Option<i32>,
    /// Assigned trainer person
    #[serde(rename = "entrenador")]
    pub trainer_id: Option<i32>,
}

impl From<person::Model> for PersonResponse {
    fn from(model: person::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            last_name: model.last_name,
            height: model.height,
            weight: model.weight,
            age: model.age,
            arm: model.arm,
            chest: model.chest,
            waist: model.waist,
            leg: model.leg,
            enrolled_on: model.enrolled_on,
            training: model.training,
            end_reason: model.end_reason,
            ended_on: model.ended_on,
            user_id: model.user_id,
            trainer_id: model.trainer_id,
        }
    }
}

impl PersonRequest {
    fn apply(self, active: &mut person::ActiveModel) {
        active.name = Set(self.name);
        active.last_name = Set(self.last_name);
        active.height = Set(self.height);
        active.weight = Set(self.weight);
        active.age = Set(self.age);
        active.arm = Set(self.arm);
        active.chest = Set(self.chest);
        active.waist = Set(self.waist);
        active.leg = Set(self.leg);
        if let Some(enrolled_on) = self.enrolled_on {
            active.enrolled_on = Set(enrolled_on);
        }
        if let Some(training) = self.training {
            active.training = Set(training);
        }
        active.end_reason = Set(self.end_reason);
        active.ended_on = Set(self.ended_on);
    }
}

/// Get the clients assigned to a trainer
#[utoipa::path(
    get,
    path = "/personas/{trainer_id}",
    tag = "persons",
    params(
        ("trainer_id" = i32, Path, description = "Trainer person ID"),
    ),
    responses(
        (status = 200, description = "Clients retrieved successfully", body = ApiResponse<Vec<PersonResponse>>),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 404, description = "Trainer not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_clients(
    Path(trainer_id): Path<i32>,
    State(state): State<AppState>,
) -> ApiResult<Json<ApiResponse<Vec<PersonResponse>>>> {
    trace!("Entering get_clients function for trainer_id: {}", trainer_id);
    find_person(&state.db, trainer_id).await?;

    let clients = person::Entity::find()
        .filter(person::Column::TrainerId.eq(trainer_id))
        .all(&state.db)
        .await?;

    info!("Retrieved {} clients for trainer {}", clients.len(), trainer_id);
    let data = clients.into_iter().map(PersonResponse::from).collect();
    Ok(Json(ApiResponse::ok(data, "Clients retrieved successfully")))
}

/// Create a client assigned to a trainer
#[utoipa::path(
    post,
    path = "/personas/{trainer_id}",
    tag = "persons",
    params(
        ("trainer_id" = i32, Path, description = "Trainer person ID"),
    ),
    request_body = CreateClientRequest,
    responses(
        (status = 201, description = "Client created successfully", body = ApiResponse<PersonResponse>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 403, description = "Caller is a client", body = ErrorResponse),
        (status = 404, description = "Trainer not found", body = ErrorResponse),
        (status = 409, description = "Username taken or weak password", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state, auth, request))]
pub async fn create_client(
    Path(trainer_id): Path<i32>,
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Json(request): Json<CreateClientRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<PersonResponse>>)> {
    trace!("Entering create_client function for trainer_id: {}", trainer_id);
    auth.require_staff()?;
    request.validate().map_err(credentials_error)?;

    let credentials = match (request.username, request.password) {
        (Some(username), Some(password)) => Some((username, password)),
        (None, None) => None,
        _ => {
            warn!("Client login requested with incomplete credentials");
            return Err(ApiError::Validation(
                "Both 'usuario' and 'contrasena' are required to create a login".to_string(),
            ));
        }
    };

    let txn = state.db.begin().await?;
    find_person(&txn, trainer_id).await?;

    let user_id = match credentials {
        Some((username, password)) => {
            debug!("Creating client login '{}'", username);
            let new_user = user::ActiveModel {
                username: Set(username.clone()),
                password_hash: Set(hash_password(&password)?),
                role: Set(Role::Client),
                ..Default::default()
            };
            let user_model = new_user
                .insert(&txn)
                .await
                .map_err(|e| user_insert_error(e, &username))?;
            Some(user_model.id)
        }
        None => None,
    };

    let mut new_person = person::ActiveModel {
        enrolled_on: Set(chrono::Local::now().date_naive()),
        training: Set(true),
        user_id: Set(user_id),
        trainer_id: Set(Some(trainer_id)),
        ..Default::default()
    };
    request.person.apply(&mut new_person);
    let person_model = new_person.insert(&txn).await?;

    txn.commit().await?;

    info!(
        "Client {} '{}' created for trainer {}",
        person_model.id, person_model.name, trainer_id
    );
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(
            PersonResponse::from(person_model),
            "Client created successfully",
        )),
    ))
}

/// Get a person by ID
#[utoipa::path(
    get,
    path = "/persona/{person_id}",
    tag = "persons",
    params(
        ("person_id" = i32, Path, description = "Person ID"),
    ),
    responses(
        (status = 200, description = "Person retrieved successfully", body = ApiResponse<PersonResponse>),
        (status = 404, description = "Person not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_person(
    Path(person_id): Path<i32>,
    State(state): State<AppState>,
) -> ApiResult<Json<ApiResponse<PersonResponse>>> {
    trace!("Entering get_person function for person_id: {}", person_id);
    let person_model = find_person(&state.db, person_id).await?;
    debug!("Found person {} '{}'", person_model.id, person_model.name);
    Ok(Json(ApiResponse::ok(
        PersonResponse::from(person_model),
        "Person retrieved successfully",
    )))
}

/// Update a person
#[utoipa::path(
    put,
    path = "/persona/{person_id}",
    tag = "persons",
    params(
        ("person_id" = i32, Path, description = "Person ID"),
    ),
    request_body = PersonRequest,
    responses(
        (status = 200, description = "Person updated successfully", body = ApiResponse<PersonResponse>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 404, description = "Person not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn update_person(
    Path(person_id): Path<i32>,
    State(state): State<AppState>,
    Valid(Json(request)): Valid<Json<PersonRequest>>,
) -> ApiResult<Json<ApiResponse<PersonResponse>>> {
    trace!("Entering update_person function for person_id: {}", person_id);
    let existing = find_person(&state.db, person_id).await?;

    let mut active: person::ActiveModel = existing.into();
    request.apply(&mut active);
    let updated = active.update(&state.db).await?;

    info!("Person with ID {} updated successfully", person_id);
    Ok(Json(ApiResponse::ok(
        PersonResponse::from(updated),
        "Person updated successfully",
    )))
}

/// Delete a person
///
/// Refused while trainings reference the person or clients are assigned to it.
#[utoipa::path(
    delete,
    path = "/persona/{person_id}",
    tag = "persons",
    params(
        ("person_id" = i32, Path, description = "Person ID"),
    ),
    responses(
        (status = 204, description = "Person deleted"),
        (status = 403, description = "Caller is a client", body = ErrorResponse),
        (status = 404, description = "Person not found", body = ErrorResponse),
        (status = 409, description = "Person has trainings or clients", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state, auth))]
pub async fn delete_person(
    Path(person_id): Path<i32>,
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
) -> ApiResult<StatusCode> {
    trace!("Entering delete_person function for person_id: {}", person_id);
    auth.require_staff()?;
    let txn = state.db.begin().await?;
    let person_model = find_person(&txn, person_id).await?;

    let trainings = training::Entity::find()
        .filter(training::Column::PersonId.eq(person_id))
        .count(&txn)
        .await?;
    if trainings > 0 {
        warn!("Refusing to delete person {} with {} trainings", person_id, trainings);
        return Err(ApiError::Conflict(format!(
            "Person {} has {} trainings and cannot be deleted",
            person_id, trainings
        )));
    }

    let clients = person::Entity::find()
        .filter(person::Column::TrainerId.eq(person_id))
        .count(&txn)
        .await?;
    if clients > 0 {
        warn!("Refusing to delete person {} with {} assigned clients", person_id, clients);
        return Err(ApiError::Conflict(format!(
            "Person {} has {} assigned clients and cannot be deleted",
            person_id, clients
        )));
    }

    let result = person::Entity::delete_by_id(person_id).exec(&txn).await?;
    debug!("Delete operation completed. Rows affected: {}", result.rows_affected);

    // The login goes with its last person
    if let Some(user_id) = person_model.user_id {
        let remaining = person::Entity::find()
            .filter(person::Column::UserId.eq(user_id))
            .count(&txn)
            .await?;
        if remaining == 0 {
            user::Entity::delete_by_id(user_id).exec(&txn).await?;
            debug!("Deleted user {} of person {}", user_id, person_id);
        }
    }
    txn.commit().await?;

    info!("Person with ID {} deleted successfully", person_id);
    Ok(StatusCode::NO_CONTENT)
}
