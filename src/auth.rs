//! Bearer-token authentication and password handling.
//!
//! Tokens are HS256 JWTs bound to a user id. Passwords are stored as
//! Argon2id PHC strings with a random salt per user.

use crate::error::ApiError;
use crate::schemas::AppState;
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use model::entities::user::{self, Role};
use regex::Regex;
use sea_orm::EntityTrait;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use tracing::{debug, error, trace, warn};
use validator::ValidationError;

static LOWERCASE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[a-z]").unwrap());
static UPPERCASE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[A-Z]").unwrap());
static DIGIT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[0-9]").unwrap());

const MIN_PASSWORD_LENGTH: usize = 8;

/// Settings for issuing and validating tokens.
#[derive(Clone)]
pub struct JwtConfig {
    secret: String,
    ttl: chrono::Duration,
}

impl std::fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig")
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

impl JwtConfig {
    pub fn new(secret: impl Into<String>, ttl_minutes: i64) -> Self {
        Self {
            secret: secret.into(),
            ttl: chrono::Duration::minutes(ttl_minutes),
        }
    }
}

/// Claims carried by an access token.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// User id
    pub sub: String,
    /// Role code of the user when the token was issued
    pub rol: String,
    pub iat: usize,
    pub exp: usize,
}

/// The user behind a validated token, inserted as a request extension.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: i32,
    pub role: Role,
}

impl AuthenticatedUser {
    /// Trainers and admins manage clients and trainers; clients may not.
    pub fn require_staff(&self) -> Result<(), ApiError> {
        match self.role {
            Role::Trainer | Role::Admin => Ok(()),
            Role::Client => {
                warn!("Client user {} attempted a staff-only operation", self.user_id);
                Err(ApiError::Forbidden(
                    "Only trainers and admins may perform this operation".to_string(),
                ))
            }
        }
    }
}

/// Issues a token bound to the given user.
pub fn issue_token(user: &user::Model, config: &JwtConfig) -> Result<String, ApiError> {
    let now = chrono::Utc::now();
    let claims = Claims {
        sub: user.id.to_string(),
        rol: user.role.code().to_string(),
        iat: now.timestamp() as usize,
        exp: (now + config.ttl).timestamp() as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
    .map_err(|e| ApiError::Internal(format!("Failed to issue token: {}", e)))
}

/// Validates signature and expiry and returns the claims.
pub fn verify_token(token: &str, config: &JwtConfig) -> Result<Claims, ApiError> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|e| {
        debug!("Token rejected: {}", e);
        ApiError::Unauthorized("Invalid or expired token".to_string())
    })
}

pub fn hash_password(password: &str) -> Result<String, ApiError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| ApiError::Internal(format!("Password hashing failed: {}", e)))
}

/// Returns false for a wrong password or an unparseable stored hash.
pub fn verify_password(password: &str, password_hash: &str) -> bool {
    let parsed_hash = match PasswordHash::new(password_hash) {
        Ok(hash) => hash,
        Err(e) => {
            error!("Failed to parse stored password hash: {}", e);
            return false;
        }
    };

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok()
}

/// Password complexity rule: at least eight characters with a lowercase
/// letter, an uppercase letter and a digit.
pub fn validate_password_strength(password: &str) -> Result<(), ValidationError> {
    let strong = password.chars().count() >= MIN_PASSWORD_LENGTH
        && LOWERCASE.is_match(password)
        && UPPERCASE.is_match(password)
        && DIGIT.is_match(password);

    if strong {
        Ok(())
    } else {
        let mut err = ValidationError::new("weak_password");
        err.message = Some(
            "Password must have at least 8 characters, one lowercase letter, one uppercase letter and one digit"
                .into(),
        );
        Err(err)
    }
}

/// Middleware guarding every protected route.
///
/// Requires `Authorization: Bearer <token>`, validates the token and checks
/// that its user still exists.
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    trace!("Authenticating request to {}", request.uri());

    let token = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .filter(|token| !token.is_empty())
        .ok_or_else(|| {
            warn!("Request to {} without bearer token", request.uri());
            ApiError::Unauthorized("Authorization token required".to_string())
        })?;

    let claims = verify_token(token, &state.jwt)?;
    let user_id: i32 = claims
        .sub
        .parse()
        .map_err(|_| ApiError::Unauthorized("Invalid token subject".to_string()))?;

    let user = user::Entity::find_by_id(user_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| {
            warn!("Token for deleted user {}", user_id);
            ApiError::Unauthorized("User no longer exists".to_string())
        })?;

    debug!("Authenticated user {} ({})", user.id, user.role.code());
    request.extensions_mut().insert(AuthenticatedUser {
        user_id: user.id,
        role: user.role,
    });

    Ok(next.run(request).await)
}
