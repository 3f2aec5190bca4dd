use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::model::{LabResultStatus, SeverityLevel};

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateLabResultDto {
    pub patient_id: i64,
    pub ordered_by_user_id: i64,
    pub test_name: String,
    pub test_value: Option<String>,
    pub normal_range: Option<String>,
    pub unit: Option<String>,
    #[serde(default)]
    pub severity: SeverityLevel,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LabResultResponse {
    pub id: i64,
    pub patient_id: i64,
    pub ordered_by_user_id: i64,
    pub test_name: String,
    pub test_value: Option<String>,
    pub normal_range: Option<String>,
    pub unit: Option<String>,
    pub status: LabResultStatus,
    pub severity: SeverityLevel,
    pub notes: Option<String>,
    pub ordered_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub reported_at: Option<DateTime<Utc>>,
    pub patient_name: String,
    pub ordered_by_user_name: String,
}
