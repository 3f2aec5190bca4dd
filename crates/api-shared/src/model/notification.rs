use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// An alert or informational message for staff.
///
/// Created only by the notification dispatcher; after creation the sole
/// permitted mutation is flipping the read flag. `user_id = None` means the
/// notification is visible to all qualifying staff rather than a single
/// addressee.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
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
}

/// What a notification is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum NotificationKind {
    CriticalAlert,
    PatientUpdate,
    AppointmentReminder,
    SystemAlert,
    MedicalRecordUpdate,
    VitalSignAlert,
    LabResultAlert,
    MedicationAlert,
    EmergencyAlert,
}

/// How urgently a notification should be surfaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum NotificationPriority {
    Low,
    Normal,
    High,
    Critical,
}
