//! Report calculator: body-mass index, calorie estimates and the
//! aggregations behind the per-person reports. Everything here works on
//! records that were already loaded from the database.

pub mod bmi;
pub mod calories;
pub mod daily;
pub mod error;
pub mod sessions;

pub use bmi::{classify_bmi, compute_bmi};
pub use calories::estimate_calories;
pub use daily::{aggregate_by_date, daily_report, TrainingEntry};
pub use error::{ComputeError, Result};
pub use sessions::{aggregate_routine_sessions, training_record};
