use crate::auth::JwtConfig;
use crate::schemas::AppState;
use anyhow::Result;
use config::{Config, Environment, File};
use sea_orm::Database;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info};

/// Runtime settings.
///
/// Sources, later ones winning: built-in defaults, an optional
/// `coachtrack.toml` in the working directory, then environment variables
/// (`DATABASE_URL`, `BIND_ADDRESS`, `JWT_SECRET`, `TOKEN_TTL_MINUTES`,
/// `REQUEST_TIMEOUT_SECS`). A `.env` file is loaded first.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub database_url: String,
    pub bind_address: String,
    pub jwt_secret: String,
    pub token_ttl_minutes: i64,
    pub request_timeout_secs: u64,
}

impl Settings {
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();

        let settings = Config::builder()
            .set_default("database_url", "sqlite://coachtrack.db?mode=rwc")?
            .set_default("bind_address", "0.0.0.0:3000")?
            .set_default("jwt_secret", "change-me")?
            .set_default("token_ttl_minutes", 720_i64)?
            .set_default("request_timeout_secs", 30_i64)?
            .add_source(File::with_name("coachtrack").required(false))
            .add_source(Environment::default().try_parsing(true))
            .build()?
            .try_deserialize::<Settings>()?;

        debug!(
            "Loaded settings: bind_address={}, token_ttl_minutes={}",
            settings.bind_address, settings.token_ttl_minutes
        );
        if settings.jwt_secret == "change-me" {
            tracing::warn!("JWT_SECRET is not set, using the development default");
        }
        Ok(settings)
    }

    pub fn jwt_config(&self) -> JwtConfig {
        JwtConfig::new(self.jwt_secret.clone(), self.token_ttl_minutes)
    }
}

/// Initialize application state from the loaded settings
pub async fn initialize_app_state(settings: &Settings) -> Result<AppState> {
    info!("Connecting to database: {}", settings.database_url);
    let db = Database::connect(&settings.database_url).await?;

    Ok(AppState {
        db,
        jwt: settings.jwt_config(),
        request_timeout: Duration::from_secs(settings.request_timeout_secs),
    })
}
