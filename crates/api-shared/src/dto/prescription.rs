use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::model::PrescriptionStatus;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatePrescriptionDto {
    pub patient_id: i64,
    pub prescribed_by_user_id: i64,
    pub medication_name: String,
    pub dosage: String,
    pub frequency: String,
    pub instructions: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PrescriptionResponse {
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
    pub patient_name: String,
    pub prescribed_by_user_name: String,
}
