use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A patient on the ward.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Patient {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: DateTime<Utc>,
    pub gender: String,
    pub address: String,
    pub phone_number: String,
    pub email: Option<String>,
    pub emergency_contact: Option<String>,
    pub emergency_phone: Option<String>,
    pub medical_history: Option<String>,
    pub allergies: Option<String>,
    pub blood_type: Option<String>,
    pub room: Option<String>,
    pub department: Option<String>,
    pub condition: Option<String>,
    pub status: PatientStatus,
    /// Derived state owned by the critical-state coordinator; flipping it
    /// outside the coordinator's alerting path breaks the notification
    /// invariant.
    pub is_critical: bool,
    pub created_at: DateTime<Utc>,
    pub last_updated_at: Option<DateTime<Utc>>,
}

impl Patient {
    /// Display name embedded into alert messages.
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Administrative status of a patient record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum PatientStatus {
    Active,
    Inactive,
    Discharged,
    Deceased,
}
