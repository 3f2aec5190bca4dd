use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A free-text care note attached to a patient.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressNote {
    pub id: i64,
    pub patient_id: i64,
    pub created_by_user_id: i64,
    pub title: String,
    pub content: String,
    pub category: Option<String>,
    #[serde(rename = "type")]
    pub kind: ProgressNoteKind,
    pub is_critical: bool,
    pub critical_notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum ProgressNoteKind {
    General,
    Assessment,
    Plan,
    Evaluation,
    Discharge,
    Consultation,
}
