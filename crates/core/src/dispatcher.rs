//! Notification creation, staff fan-out and the read lifecycle.

use std::sync::Arc;

use api_shared::dto::{CreateNotificationDto, NotificationResponse};
use api_shared::model::{Notification, NotificationKind, NotificationPriority, UserRole};
use chrono::Utc;

use crate::error::{HospitalError, HospitalResult};
use crate::store::{NotificationFilter, NotificationStore, PatientStore, UserDirectory};

/// Creates notifications and manages their read state.
///
/// The dispatcher is the only component that writes notifications; after
/// creation the read flag is the only thing that ever changes on one.
#[derive(Clone)]
pub struct NotificationDispatcher {
    notifications: Arc<dyn NotificationStore>,
    users: Arc<dyn UserDirectory>,
    patients: Arc<dyn PatientStore>,
}

impl NotificationDispatcher {
    pub fn new(
        notifications: Arc<dyn NotificationStore>,
        users: Arc<dyn UserDirectory>,
        patients: Arc<dyn PatientStore>,
    ) -> Self {
        Self {
            notifications,
            users,
            patients,
        }
    }

    /// Persists a notification and returns its materialized form with the
    /// referenced patient/user display names resolved.
    pub fn dispatch(&self, dto: CreateNotificationDto) -> HospitalResult<NotificationResponse> {
        tracing::info!(title = %dto.title, user_id = ?dto.user_id, "creating notification");

        let notification = self.notifications.insert(Notification {
            id: 0,
            title: dto.title,
            message: dto.message,
            kind: dto.kind,
            priority: dto.priority,
            patient_id: dto.patient_id,
            user_id: dto.user_id,
            is_read: false,
            created_at: Utc::now(),
            read_at: None,
        })?;

        tracing::info!(notification_id = notification.id, "created notification");
        self.resolve(notification)
    }

    /// Sends one Critical-priority alert to every currently active Doctor
    /// and Nurse.
    ///
    /// Zero active staff is not an error: the result is simply empty. Each
    /// recipient's creation is independent; a failure is logged and the
    /// remaining sends continue.
    pub fn broadcast_to_staff(
        &self,
        message: &str,
        patient_id: i64,
    ) -> HospitalResult<Vec<NotificationResponse>> {
        if self.patients.get(patient_id)?.is_none() {
            return Err(HospitalError::Validation("patient not found".into()));
        }

        let mut staff = self.users.list_active_by_role(UserRole::Doctor)?;
        staff.extend(self.users.list_active_by_role(UserRole::Nurse)?);

        let mut created = Vec::with_capacity(staff.len());
        for member in staff {
            let alert = CreateNotificationDto {
                title: "Critical Patient Alert".into(),
                message: message.to_owned(),
                kind: NotificationKind::CriticalAlert,
                priority: NotificationPriority::Critical,
                patient_id: Some(patient_id),
                user_id: Some(member.id),
            };
            match self.dispatch(alert) {
                Ok(notification) => created.push(notification),
                Err(error) => {
                    tracing::error!(user_id = member.id, %error, "failed to deliver critical alert")
                }
            }
        }

        Ok(created)
    }

    /// Flips the read flag and stamps the read time.
    ///
    /// Returns `None` for unknown ids. Marking an already-read notification
    /// succeeds without touching `read_at`, so the first read time survives
    /// repeated calls.
    pub fn mark_read(&self, id: i64) -> HospitalResult<Option<NotificationResponse>> {
        let Some(mut notification) = self.notifications.find_by_id(id)? else {
            tracing::warn!(notification_id = id, "mark-read for unknown notification");
            return Ok(None);
        };

        if !notification.is_read {
            notification.is_read = true;
            notification.read_at = Some(Utc::now());
            self.notifications.update(&notification)?;
        }

        self.resolve(notification).map(Some)
    }

    /// Matching notifications, newest first. Both filter fields are
    /// independently optional and combine with logical AND.
    pub fn list_notifications(
        &self,
        filter: &NotificationFilter,
    ) -> HospitalResult<Vec<NotificationResponse>> {
        let notifications = self.notifications.query(filter)?;
        notifications
            .into_iter()
            .map(|n| self.resolve(n))
            .collect()
    }

    fn resolve(&self, notification: Notification) -> HospitalResult<NotificationResponse> {
        let patient_name = match notification.patient_id {
            Some(id) => self.patients.get(id)?.map(|p| p.display_name()),
            None => None,
        };
        let user_name = match notification.user_id {
            Some(id) => self.users.get(id)?.map(|u| u.display_name()),
            None => None,
        };

        Ok(NotificationResponse {
            id: notification.id,
            title: notification.title,
            message: notification.message,
            kind: notification.kind,
            priority: notification.priority,
            patient_id: notification.patient_id,
            user_id: notification.user_id,
            is_read: notification.is_read,
            created_at: notification.created_at,
            read_at: notification.read_at,
            patient_name,
            user_name,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::MemoryStore;
    use crate::test_support::{seed_patient, seed_staff};

    fn dispatcher(store: &Arc<MemoryStore>) -> NotificationDispatcher {
        NotificationDispatcher::new(store.clone(), store.clone(), store.clone())
    }

    #[test]
    fn test_broadcast_with_zero_staff_creates_nothing() {
        let store = Arc::new(MemoryStore::new());
        let patient = seed_patient(&store, false);

        let created = dispatcher(&store)
            .broadcast_to_staff("on fire", patient.id)
            .unwrap();

        assert!(created.is_empty());
        assert!(dispatcher(&store)
            .list_notifications(&NotificationFilter::default())
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_broadcast_reaches_each_active_doctor_and_nurse() {
        let store = Arc::new(MemoryStore::new());
        let patient = seed_patient(&store, false);
        let (doctor, nurse) = seed_staff(&store);
        // Inactive staff must not receive alerts.
        let mut retired = doctor.clone();
        retired.id = 0;
        retired.username = "retired".into();
        retired.is_active = false;
        UserDirectory::insert(store.as_ref(), retired).unwrap();

        let created = dispatcher(&store)
            .broadcast_to_staff("deteriorating", patient.id)
            .unwrap();

        assert_eq!(created.len(), 2);
        let recipients: Vec<_> = created.iter().filter_map(|n| n.user_id).collect();
        assert!(recipients.contains(&doctor.id));
        assert!(recipients.contains(&nurse.id));
        for alert in &created {
            assert_eq!(alert.priority, NotificationPriority::Critical);
            assert_eq!(alert.patient_id, Some(patient.id));
        }
    }

    #[test]
    fn test_broadcast_for_unknown_patient_is_a_validation_error() {
        let store = Arc::new(MemoryStore::new());
        seed_staff(&store);

        let result = dispatcher(&store).broadcast_to_staff("ghost", 999);
        assert!(matches!(result, Err(HospitalError::Validation(_))));
    }

    #[test]
    fn test_mark_read_unknown_id_is_none() {
        let store = Arc::new(MemoryStore::new());
        assert!(dispatcher(&store).mark_read(12345).unwrap().is_none());
    }

    #[test]
    fn test_mark_read_is_idempotent_and_keeps_first_read_time() {
        let store = Arc::new(MemoryStore::new());
        let dispatcher = dispatcher(&store);
        let note = dispatcher
            .dispatch(CreateNotificationDto {
                title: "t".into(),
                message: "m".into(),
                kind: NotificationKind::SystemAlert,
                priority: NotificationPriority::Normal,
                patient_id: None,
                user_id: None,
            })
            .unwrap();

        let first = dispatcher.mark_read(note.id).unwrap().unwrap();
        assert!(first.is_read);
        let first_read_at = first.read_at.unwrap();

        let second = dispatcher.mark_read(note.id).unwrap().unwrap();
        assert!(second.is_read);
        assert_eq!(second.read_at, Some(first_read_at));
    }

    #[test]
    fn test_list_filters_combine_with_and() {
        let store = Arc::new(MemoryStore::new());
        let (doctor, nurse) = seed_staff(&store);
        let dispatcher = dispatcher(&store);

        for user in [doctor.id, nurse.id] {
            dispatcher
                .dispatch(CreateNotificationDto {
                    title: "t".into(),
                    message: "m".into(),
                    kind: NotificationKind::SystemAlert,
                    priority: NotificationPriority::Normal,
                    patient_id: None,
                    user_id: Some(user),
                })
                .unwrap();
        }
        let doctors_note = dispatcher
            .list_notifications(&NotificationFilter {
                user_id: Some(doctor.id),
                is_read: None,
            })
            .unwrap();
        assert_eq!(doctors_note.len(), 1);
        dispatcher.mark_read(doctors_note[0].id).unwrap();

        let unread_for_doctor = dispatcher
            .list_notifications(&NotificationFilter {
                user_id: Some(doctor.id),
                is_read: Some(false),
            })
            .unwrap();
        assert!(unread_for_doctor.is_empty());

        let unread_anywhere = dispatcher
            .list_notifications(&NotificationFilter {
                user_id: None,
                is_read: Some(false),
            })
            .unwrap();
        assert_eq!(unread_anywhere.len(), 1);
        assert_eq!(unread_anywhere[0].user_id, Some(nurse.id));
    }
}
