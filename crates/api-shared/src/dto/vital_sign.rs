use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::model::SeverityLevel;

/// A new vital-sign observation. Each measurement is independently optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateVitalSignDto {
    pub patient_id: i64,
    pub recorded_by_user_id: i64,
    pub temperature: Option<f64>,
    pub blood_pressure_systolic: Option<i32>,
    pub blood_pressure_diastolic: Option<i32>,
    pub heart_rate: Option<i32>,
    pub oxygen_saturation: Option<i32>,
    pub respiratory_rate: Option<i32>,
    pub weight: Option<f64>,
    pub height: Option<f64>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VitalSignResponse {
    pub id: i64,
    pub patient_id: i64,
    pub recorded_by_user_id: i64,
    pub temperature: Option<f64>,
    pub blood_pressure_systolic: Option<i32>,
    pub blood_pressure_diastolic: Option<i32>,
    pub heart_rate: Option<i32>,
    pub oxygen_saturation: Option<i32>,
    pub respiratory_rate: Option<i32>,
    pub weight: Option<f64>,
    pub height: Option<f64>,
    pub severity: SeverityLevel,
    pub notes: Option<String>,
    pub recorded_at: DateTime<Utc>,
    pub patient_name: String,
    pub recorded_by_user_name: String,
}
