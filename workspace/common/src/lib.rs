//! Common transport-layer types shared between the report calculator and the
//! HTTP handlers. Field names follow the public JSON API.

mod report;
mod session;

pub use report::{BmiClass, DailyResult, TOTAL_ROW_LABEL};
pub use session::{RoutineSession, SessionDuration, TrainingRecord};

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Generic API response wrapper used by the backend.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    /// Response data
    pub data: T,
    /// Response message
    pub message: String,
    /// Success flag
    pub success: bool,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T, message: impl Into<String>) -> Self {
        Self {
            data,
            message: message.into(),
            success: true,
        }
    }
}
