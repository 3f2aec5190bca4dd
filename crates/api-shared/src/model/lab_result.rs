use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::SeverityLevel;

/// An ordered laboratory test and, once completed, its result.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LabResult {
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
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum LabResultStatus {
    Pending,
    InProgress,
    Completed,
    Cancelled,
}
