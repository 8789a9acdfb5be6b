use crate::auth::{hash_password, issue_token, validate_password_strength, verify_password};
use crate::error::{ApiError, ApiResult};
use crate::schemas::{ApiResponse, AppState};
use axum::{extract::State, http::StatusCode, response::Json};
use model::entities::{person, user, user::Role};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DbErr, EntityTrait, QueryFilter, Set, SqlErr, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, trace, warn};
use utoipa::ToSchema;
use validator::{Validate, ValidationErrors};

/// Request body for signing up
#[derive(Deserialize, Serialize, ToSchema, Validate)]
pub struct SignInRequest {
    /// Login name, unique across all users
    #[serde(rename = "usuario")]
    #[validate(length(min = 1, max = 50))]
    pub username: String,
    #[serde(rename = "contrasena")]
    #[validate(custom(function = "validate_password_strength"))]
    pub password: String,
    /// Role code (`ENT` or `CLI`), trainer when omitted
    #[serde(rename = "rol", default)]
    pub role: Option<String>,
    /// First name of the trainer person created for trainer accounts
    #[serde(rename = "nombre", default)]
    #[validate(length(max = 100))]
    pub name: Option<String>,
    #[serde(rename = "apellido", default)]
    #[validate(length(max = 100))]
    pub last_name: Option<String>,
}

/// Created account
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SignInResponse {
    pub id: i32,
    #[serde(rename = "usuario")]
    pub username: String,
    #[serde(rename = "rol")]
    pub role: String,
    /// Person created alongside a trainer account
    #[serde(rename = "persona")]
    pub person_id: Option<i32>,
}

/// Request body for logging in
#[derive(Deserialize, Serialize, ToSchema)]
pub struct LogInRequest {
    #[serde(rename = "usuario")]
    pub username: String,
    #[serde(rename = "contrasena")]
    pub password: String,
}

/// Issued token and the identity behind it
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LogInResponse {
    pub token: String,
    pub id: i32,
    #[serde(rename = "rol")]
    pub role: String,
    /// The user's own person, if any
    #[serde(rename = "persona")]
    pub person_id: Option<i32>,
}

/// Maps validation failures of a credentials payload. A weak password is a
/// conflict, anything else is a malformed request.
pub(crate) fn credentials_error(errors: ValidationErrors) -> ApiError {
    if errors.field_errors().contains_key("password") {
        warn!("Rejected weak password");
        ApiError::Conflict(
            "Password must have at least 8 characters, one lowercase letter, one uppercase letter and one digit"
                .to_string(),
        )
    } else {
        ApiError::from(errors)
    }
}

/// Maps a failed user insert, turning the unique-username violation into a
/// conflict naming the login.
pub(crate) fn user_insert_error(db_error: DbErr, username: &str) -> ApiError {
    match db_error.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => {
            warn!("Username '{}' is already taken", username);
            ApiError::Conflict(format!("Username '{}' is already taken", username))
        }
        _ => ApiError::from(db_error),
    }
}

/// Role requested at sign-up. Admin accounts are never self-registered.
pub(crate) fn parse_role(code: Option<&str>) -> ApiResult<Role> {
    let role = match code {
        None => Role::Trainer,
        Some(code) => Role::from_code(code)
            .ok_or_else(|| ApiError::Validation(format!("Unknown role '{}'", code)))?,
    };
    if role == Role::Admin {
        warn!("Rejected admin sign-up");
        return Err(ApiError::Forbidden(
            "Admin accounts cannot be created through sign-up".to_string(),
        ));
    }
    Ok(role)
}

/// Register a new user
#[utoipa::path(
    post,
    path = "/signin",
    tag = "auth",
    security(()),
    request_body = SignInRequest,
    responses(
        (status = 201, description = "User created successfully", body = ApiResponse<SignInResponse>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 403, description = "Admin role requested", body = ErrorResponse),
        (status = 409, description = "Username taken or weak password", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state, request), fields(username = %request.username))]
pub async fn sign_in(
    State(state): State<AppState>,
    Json(request): Json<SignInRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<SignInResponse>>)> {
    trace!("Entering sign_in function");
    request.validate().map_err(credentials_error)?;
    let role = parse_role(request.role.as_deref())?;
    debug!("Signing up '{}' with role {}", request.username, role.code());

    let password_hash = hash_password(&request.password)?;

    let txn = state.db.begin().await?;

    let new_user = user::ActiveModel {
        username: Set(request.username.clone()),
        password_hash: Set(password_hash),
        role: Set(role),
        ..Default::default()
    };
    let user_model = new_user
        .insert(&txn)
        .await
        .map_err(|e| user_insert_error(e, &request.username))?;
    debug!("Inserted user {} inside transaction", user_model.id);

    let person_id = if role == Role::Trainer {
        let trainer = person::ActiveModel {
            name: Set(request.name.clone().unwrap_or_default()),
            last_name: Set(request.last_name.clone().unwrap_or_default()),
            height: Set(0.0),
            weight: Set(0.0),
            age: Set(0.0),
            arm: Set(0.0),
            chest: Set(0.0),
            waist: Set(0.0),
            leg: Set(0.0),
            enrolled_on: Set(chrono::Local::now().date_naive()),
            training: Set(false),
            end_reason: Set(None),
            ended_on: Set(None),
            user_id: Set(Some(user_model.id)),
            trainer_id: Set(None),
            ..Default::default()
        };
        let trainer = trainer.insert(&txn).await?;
        debug!("Created trainer person {} for user {}", trainer.id, user_model.id);
        Some(trainer.id)
    } else {
        None
    };

    txn.commit().await?;

    info!(
        "User '{}' signed up with ID {} and role {}",
        user_model.username,
        user_model.id,
        user_model.role.code()
    );
    let response = ApiResponse::ok(
        SignInResponse {
            id: user_model.id,
            username: user_model.username,
            role: user_model.role.code().to_string(),
            person_id,
        },
        "User created successfully",
    );
    Ok((StatusCode::CREATED, Json(response)))
}

/// Log in and obtain a bearer token
#[utoipa::path(
    post,
    path = "/login",
    tag = "auth",
    security(()),
    request_body = LogInRequest,
    responses(
        (status = 200, description = "Logged in", body = ApiResponse<LogInResponse>),
        (status = 401, description = "Wrong username or password", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state, request), fields(username = %request.username))]
pub async fn log_in(
    State(state): State<AppState>,
    Json(request): Json<LogInRequest>,
) -> ApiResult<Json<ApiResponse<LogInResponse>>> {
    trace!("Entering log_in function");

    let user_model = user::Entity::find()
        .filter(user::Column::Username.eq(request.username.as_str()))
        .one(&state.db)
        .await?;

    let user_model = match user_model {
        Some(user_model) if verify_password(&request.password, &user_model.password_hash) => {
            user_model
        }
        Some(_) => {
            warn!("Wrong password for '{}'", request.username);
            return Err(ApiError::Unauthorized("Wrong username or password".to_string()));
        }
        None => {
            warn!("Login attempt for unknown user '{}'", request.username);
            return Err(ApiError::Unauthorized("Wrong username or password".to_string()));
        }
    };

    let token = issue_token(&user_model, &state.jwt)?;
    let own_person = person::Entity::find()
        .filter(person::Column::UserId.eq(user_model.id))
        .one(&state.db)
        .await?;

    info!("User '{}' logged in", user_model.username);
    let response = ApiResponse::ok(
        LogInResponse {
            token,
            id: user_model.id,
            role: user_model.role.code().to_string(),
            person_id: own_person.map(|p| p.id),
        },
        "Logged in successfully",
    );
    Ok(Json(response))
}
