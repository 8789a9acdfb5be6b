use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Label of the summary row appended to every per-date report.
pub const TOTAL_ROW_LABEL: &str = "Total";

/// Body-mass index bracket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum BmiClass {
    #[serde(rename = "Bajo peso")]
    Underweight,
    #[serde(rename = "Peso saludable")]
    Healthy,
    #[serde(rename = "Sobrepeso")]
    Overweight,
    #[serde(rename = "Obesidad")]
    Obese,
}

/// Repetitions and calories accumulated for one date, or for the whole
/// report when `date` is [`TOTAL_ROW_LABEL`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct DailyResult {
    /// Date as `YYYY-MM-DD`, or `"Total"` for the summary row
    #[serde(rename = "fecha")]
    pub date: String,
    #[serde(rename = "repeticiones")]
    pub repetitions: i64,
    #[serde(rename = "calorias")]
    pub calories: f64,
}

impl DailyResult {
    pub fn is_total(&self) -> bool {
        self.date == TOTAL_ROW_LABEL
    }
}
