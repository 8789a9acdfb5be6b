use super::persons::PersonResponse;
use crate::auth::AuthenticatedUser;
use crate::error::{ApiError, ApiResult};
use crate::schemas::{ApiResponse, AppState};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    Extension,
};
use model::entities::{person, user, user::Role};
use sea_orm::{
    ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, RelationTrait,
    TransactionTrait,
};
use sea_orm::sea_query::JoinType;
use tracing::{debug, info, instrument, trace, warn};

/// Get all trainers
#[utoipa::path(
    get,
    path = "/entrenadores",
    tag = "trainers",
    responses(
        (status = 200, description = "Trainers retrieved successfully", body = ApiResponse<Vec<PersonResponse>>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_trainers(
    State(state): State<AppState>,
) -> ApiResult<Json<ApiResponse<Vec<PersonResponse>>>> {
    trace!("Entering get_trainers function");
    let trainers = person::Entity::find()
        .join(JoinType::InnerJoin, person::Relation::User.def())
        .filter(user::Column::Role.eq(Role::Trainer))
        .order_by_asc(person::Column::Id)
        .all(&state.db)
        .await?;

    info!("Successfully retrieved {} trainers", trainers.len());
    let data = trainers.into_iter().map(PersonResponse::from).collect();
    Ok(Json(ApiResponse::ok(data, "Trainers retrieved successfully")))
}

/// Delete a trainer and its login
///
/// Refused while clients are assigned to the trainer.
#[utoipa::path(
    delete,
    path = "/entrenador/{trainer_id}",
    tag = "trainers",
    params(
        ("trainer_id" = i32, Path, description = "Trainer person ID"),
    ),
    responses(
        (status = 204, description = "Trainer deleted"),
        (status = 403, description = "Caller is a client", body = ErrorResponse),
        (status = 404, description = "Trainer not found", body = ErrorResponse),
        (status = 409, description = "Trainer still has clients", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state, auth))]
pub async fn delete_trainer(
    Path(trainer_id): Path<i32>,
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
) -> ApiResult<StatusCode> {
    trace!("Entering delete_trainer function for trainer_id: {}", trainer_id);
    auth.require_staff()?;
    let txn = state.db.begin().await?;

    // Only persons owned by a trainer login count as trainers
    let (trainer, owner) = person::Entity::find_by_id(trainer_id)
        .find_also_related(user::Entity)
        .one(&txn)
        .await?
        .ok_or_else(|| {
            warn!("Trainer with ID {} not found", trainer_id);
            ApiError::not_found("Trainer", trainer_id)
        })?;
    let owner = owner.filter(|u| u.role == Role::Trainer).ok_or_else(|| {
        warn!("Person {} is not a trainer", trainer_id);
        ApiError::not_found("Trainer", trainer_id)
    })?;

    let clients = person::Entity::find()
        .filter(person::Column::TrainerId.eq(trainer_id))
        .count(&txn)
        .await?;
    if clients > 0 {
        warn!("Refusing to delete trainer {} with {} clients", trainer_id, clients);
        return Err(ApiError::Conflict(format!(
            "Trainer {} still has {} clients",
            trainer_id, clients
        )));
    }

    person::Entity::delete_by_id(trainer.id).exec(&txn).await?;
    let result = user::Entity::delete_by_id(owner.id).exec(&txn).await?;
    debug!("Deleted user {} of trainer {} ({} rows)", owner.id, trainer_id, result.rows_affected);
    txn.commit().await?;

    info!("Trainer with ID {} deleted successfully", trainer_id);
    Ok(StatusCode::NO_CONTENT)
}
