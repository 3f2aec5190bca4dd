use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A medication order for a patient.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Prescription {
    pub id: i64,
    pub patient_id: i64,
    pub prescribed_by_user_id: i64,
    pub medication_name: String,
    pub dosage: String,
    pub frequency: String,
    pub instructions: Option<String>,
    pub prescribed_at: DateTime<Utc>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub status: PrescriptionStatus,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum PrescriptionStatus {
    Active,
    Discontinued,
    Completed,
    OnHold,
}
