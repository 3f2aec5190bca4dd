use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A diagnosis entry in a patient's chart.
///
/// Carries its own `is_critical` flag, independent of (but feeding into)
/// `Patient::is_critical` through the coordinator.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MedicalRecord {
    pub id: i64,
    pub patient_id: i64,
    pub doctor_id: i64,
    pub diagnosis: String,
    pub symptoms: Option<String>,
    pub treatment: Option<String>,
    pub prescriptions: Option<String>,
    pub temperature: Option<f64>,
    pub blood_pressure_systolic: Option<i32>,
    pub blood_pressure_diastolic: Option<i32>,
    pub heart_rate: Option<i32>,
    pub weight: Option<f64>,
    pub height: Option<f64>,
    pub is_critical: bool,
    pub critical_notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}
