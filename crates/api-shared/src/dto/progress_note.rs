use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::model::ProgressNoteKind;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateProgressNoteDto {
    pub patient_id: i64,
    pub created_by_user_id: i64,
    pub title: String,
    pub content: String,
    pub category: Option<String>,
    #[serde(rename = "type", default = "default_kind")]
    pub kind: ProgressNoteKind,
    #[serde(default)]
    pub is_critical: bool,
    pub critical_notes: Option<String>,
}

fn default_kind() -> ProgressNoteKind {
    ProgressNoteKind::General
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProgressNoteResponse {
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
    pub patient_name: String,
    pub created_by_user_name: String,
}
