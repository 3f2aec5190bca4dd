use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::SeverityLevel;

/// One recorded set of vital-sign observations.
///
/// Every measurement is independently optional; absence means "not taken",
/// never zero. Rows are append-only: a reading is immutable once recorded
/// and corrections are new rows.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VitalSign {
    pub id: i64,
    pub patient_id: i64,
    pub recorded_by_user_id: i64,
    /// Body temperature in degrees Celsius.
    pub temperature: Option<f64>,
    pub blood_pressure_systolic: Option<i32>,
    pub blood_pressure_diastolic: Option<i32>,
    pub heart_rate: Option<i32>,
    pub oxygen_saturation: Option<i32>,
    pub respiratory_rate: Option<i32>,
    pub weight: Option<f64>,
    pub height: Option<f64>,
    /// Severity computed at recording time; never recomputed afterwards.
    pub severity: SeverityLevel,
    pub notes: Option<String>,
    pub recorded_at: DateTime<Utc>,
}
