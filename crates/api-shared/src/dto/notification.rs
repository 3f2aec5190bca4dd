use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::model::{NotificationKind, NotificationPriority};

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateNotificationDto {
    pub title: String,
    pub message: String,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    #[serde(default = "default_priority")]
    pub priority: NotificationPriority,
    pub patient_id: Option<i64>,
    pub user_id: Option<i64>,
}

fn default_priority() -> NotificationPriority {
    NotificationPriority::Normal
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NotificationResponse {
    pub id: i64,
    pub title: String,
    pub message: String,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    pub priority: NotificationPriority,
    pub patient_id: Option<i64>,
    pub user_id: Option<i64>,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
    pub read_at: Option<DateTime<Utc>>,
    pub patient_name: Option<String>,
    pub user_name: Option<String>,
}
