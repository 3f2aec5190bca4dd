//! Critical-state transitions for patients.
//!
//! Every path that flips `Patient::is_critical` goes through this
//! coordinator, which pairs the flag write with the notification that
//! documents it: a false→true transition broadcasts a Critical-priority
//! alert to all active medical staff, and a true→false transition emits a
//! "now stable" notification scoped to the patient.
//!
//! The flag write completes before any dispatch. If a dispatch then fails,
//! the flag change stands and the failure is logged; there is no rollback.
//! Concurrent invocations for the same patient are not mutually excluded
//! (last write wins on the flag).

use std::sync::Arc;

use api_shared::dto::CreateNotificationDto;
use api_shared::model::{NotificationKind, NotificationPriority, Patient, SeverityLevel};
use chrono::Utc;

use crate::dispatcher::NotificationDispatcher;
use crate::error::HospitalResult;
use crate::store::PatientStore;

/// Typed outcome of a critical-state transition.
///
/// Lets callers map "doesn't exist" and "already in the requested state" to
/// different responses instead of collapsing both into one failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// The flag changed and the accompanying notification path ran.
    Applied,
    /// The requested state already holds; nothing was written or sent.
    NoChange,
    /// The referenced patient does not exist.
    NotFound,
}

/// Orchestrates `Patient::is_critical` and the notifications each
/// transition requires.
#[derive(Clone)]
pub struct CriticalStateCoordinator {
    patients: Arc<dyn PatientStore>,
    dispatcher: Arc<NotificationDispatcher>,
}

impl CriticalStateCoordinator {
    pub fn new(patients: Arc<dyn PatientStore>, dispatcher: Arc<NotificationDispatcher>) -> Self {
        Self {
            patients,
            dispatcher,
        }
    }

    /// Marks a patient critical for the given reason and alerts all active
    /// medical staff.
    ///
    /// Blank reasons are the caller's concern; the REST layer rejects them
    /// before they reach this point.
    pub fn mark_critical(&self, patient_id: i64, reason: &str) -> HospitalResult<Transition> {
        let Some(mut patient) = self.patients.get(patient_id)? else {
            tracing::warn!(patient_id, "mark-critical for unknown patient");
            return Ok(Transition::NotFound);
        };
        if patient.is_critical {
            return Ok(Transition::NoChange);
        }

        self.set_flag(&mut patient, true)?;
        tracing::info!(patient_id, reason, "patient marked critical");

        let message = format!(
            "Patient {} marked as critical. Reason: {}",
            patient.display_name(),
            reason
        );
        self.alert_staff(patient_id, &message);

        Ok(Transition::Applied)
    }

    /// Marks a critical patient stable again and emits the patient-scoped
    /// "now stable" notification.
    pub fn mark_stable(&self, patient_id: i64) -> HospitalResult<Transition> {
        let Some(mut patient) = self.patients.get(patient_id)? else {
            tracing::warn!(patient_id, "mark-stable for unknown patient");
            return Ok(Transition::NotFound);
        };
        if !patient.is_critical {
            return Ok(Transition::NoChange);
        }

        self.set_flag(&mut patient, false)?;
        tracing::info!(patient_id, "patient marked stable");

        let message = format!("Patient {} is now stable.", patient.display_name());
        self.notify_stable(patient_id, message);

        Ok(Transition::Applied)
    }

    /// Reacts to a medical record being created or updated.
    ///
    /// A record whose critical flag newly became true escalates the patient
    /// (unless already critical) with a message embedding the diagnosis; a
    /// flag that newly became false settles the patient back to stable.
    pub fn on_medical_record_saved(
        &self,
        patient_id: i64,
        doctor_id: i64,
        diagnosis: &str,
        is_critical: bool,
        was_critical: bool,
    ) -> HospitalResult<Transition> {
        if is_critical && !was_critical {
            let Some(mut patient) = self.patients.get(patient_id)? else {
                return Ok(Transition::NotFound);
            };
            if patient.is_critical {
                return Ok(Transition::NoChange);
            }

            self.set_flag(&mut patient, true)?;
            tracing::info!(patient_id, doctor_id, "critical medical record escalated patient");

            let message = format!(
                "Patient {} has critical medical condition: {}",
                patient.display_name(),
                diagnosis
            );
            self.alert_staff(patient_id, &message);

            Ok(Transition::Applied)
        } else if was_critical && !is_critical {
            let Some(mut patient) = self.patients.get(patient_id)? else {
                return Ok(Transition::NotFound);
            };
            if !patient.is_critical {
                return Ok(Transition::NoChange);
            }

            self.set_flag(&mut patient, false)?;
            tracing::info!(patient_id, doctor_id, "medical record settled patient to stable");

            let message = format!(
                "Patient {} medical condition is now stable.",
                patient.display_name()
            );
            self.notify_stable(patient_id, message);

            Ok(Transition::Applied)
        } else {
            Ok(Transition::NoChange)
        }
    }

    /// Reacts to a freshly classified vital-sign reading.
    ///
    /// Only a Critical classification touches the flag; anything milder is
    /// a no-op regardless of the patient's current state.
    pub fn on_vitals_classified(
        &self,
        patient_id: i64,
        severity: SeverityLevel,
    ) -> HospitalResult<Transition> {
        if severity != SeverityLevel::Critical {
            return Ok(Transition::NoChange);
        }

        let Some(mut patient) = self.patients.get(patient_id)? else {
            return Ok(Transition::NotFound);
        };
        if patient.is_critical {
            return Ok(Transition::NoChange);
        }

        self.set_flag(&mut patient, true)?;
        tracing::info!(patient_id, "critical vital signs escalated patient");

        let message = format!(
            "Patient {} has vital signs at Critical severity.",
            patient.display_name()
        );
        self.alert_staff(patient_id, &message);

        Ok(Transition::Applied)
    }

    /// Reacts to a generic patient update that explicitly supplied the
    /// critical flag.
    ///
    /// The false→true direction deliberately rides on an otherwise
    /// unrelated update; the true→false direction emits the stable
    /// notification so the flag never flips silently.
    pub fn on_patient_update_flag(
        &self,
        patient_id: i64,
        requested: bool,
    ) -> HospitalResult<Transition> {
        let Some(mut patient) = self.patients.get(patient_id)? else {
            return Ok(Transition::NotFound);
        };
        if patient.is_critical == requested {
            return Ok(Transition::NoChange);
        }

        self.set_flag(&mut patient, requested)?;
        tracing::info!(patient_id, requested, "patient update changed critical flag");

        if requested {
            let message = format!(
                "Patient {} has been marked as critical.",
                patient.display_name()
            );
            self.alert_staff(patient_id, &message);
        } else {
            let message = format!("Patient {} is now stable.", patient.display_name());
            self.notify_stable(patient_id, message);
        }

        Ok(Transition::Applied)
    }

    fn set_flag(&self, patient: &mut Patient, value: bool) -> HospitalResult<()> {
        patient.is_critical = value;
        patient.last_updated_at = Some(Utc::now());
        self.patients.save(patient)
    }

    fn alert_staff(&self, patient_id: i64, message: &str) {
        if let Err(error) = self.dispatcher.broadcast_to_staff(message, patient_id) {
            tracing::error!(patient_id, %error, "critical alert broadcast failed; flag change stands");
        }
    }

    fn notify_stable(&self, patient_id: i64, message: String) {
        let note = CreateNotificationDto {
            title: "Patient Status Update".into(),
            message,
            kind: NotificationKind::PatientUpdate,
            priority: NotificationPriority::Normal,
            patient_id: Some(patient_id),
            user_id: None,
        };
        if let Err(error) = self.dispatcher.dispatch(note) {
            tracing::error!(patient_id, %error, "stable notification failed; flag change stands");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::MemoryStore;
    use crate::store::{NotificationFilter, NotificationStore};
    use crate::test_support::{seed_patient, seed_staff};

    struct Fixture {
        store: Arc<MemoryStore>,
        coordinator: CriticalStateCoordinator,
    }

    fn fixture() -> Fixture {
        let store = Arc::new(MemoryStore::new());
        let dispatcher = Arc::new(NotificationDispatcher::new(
            store.clone(),
            store.clone(),
            store.clone(),
        ));
        let coordinator = CriticalStateCoordinator::new(store.clone(), dispatcher);
        Fixture { store, coordinator }
    }

    fn notification_count(store: &MemoryStore) -> usize {
        NotificationStore::query(store, &NotificationFilter::default())
            .unwrap()
            .len()
    }

    #[test]
    fn test_mark_critical_unknown_patient_is_not_found() {
        let fx = fixture();
        seed_staff(&fx.store);

        let outcome = fx.coordinator.mark_critical(999, "sepsis").unwrap();

        assert_eq!(outcome, Transition::NotFound);
        assert_eq!(notification_count(&fx.store), 0);
    }

    #[test]
    fn test_mark_critical_already_critical_is_no_change() {
        let fx = fixture();
        seed_staff(&fx.store);
        let patient = seed_patient(&fx.store, true);

        let outcome = fx.coordinator.mark_critical(patient.id, "again").unwrap();

        assert_eq!(outcome, Transition::NoChange);
        assert_eq!(notification_count(&fx.store), 0);
    }

    #[test]
    fn test_mark_critical_flips_flag_and_alerts_each_staff_member() {
        let fx = fixture();
        seed_staff(&fx.store);
        let patient = seed_patient(&fx.store, false);

        let outcome = fx.coordinator.mark_critical(patient.id, "sepsis").unwrap();

        assert_eq!(outcome, Transition::Applied);
        let stored = crate::store::PatientStore::get(fx.store.as_ref(), patient.id)
            .unwrap()
            .unwrap();
        assert!(stored.is_critical);
        assert!(stored.last_updated_at.is_some());

        let alerts =
            NotificationStore::query(fx.store.as_ref(), &NotificationFilter::default()).unwrap();
        assert_eq!(alerts.len(), 2);
        for alert in &alerts {
            assert!(alert.message.contains("John Doe"));
            assert!(alert.message.contains("sepsis"));
        }
    }

    #[test]
    fn test_mark_critical_with_zero_staff_still_applies() {
        let fx = fixture();
        let patient = seed_patient(&fx.store, false);

        let outcome = fx.coordinator.mark_critical(patient.id, "sepsis").unwrap();

        assert_eq!(outcome, Transition::Applied);
        assert_eq!(notification_count(&fx.store), 0);
    }

    #[test]
    fn test_mark_stable_round_trip_restores_flag_and_notifies() {
        let fx = fixture();
        seed_staff(&fx.store);
        let patient = seed_patient(&fx.store, false);

        fx.coordinator.mark_critical(patient.id, "sepsis").unwrap();
        let broadcast_count = notification_count(&fx.store);

        let outcome = fx.coordinator.mark_stable(patient.id).unwrap();

        assert_eq!(outcome, Transition::Applied);
        let stored = crate::store::PatientStore::get(fx.store.as_ref(), patient.id)
            .unwrap()
            .unwrap();
        assert!(!stored.is_critical);

        let all =
            NotificationStore::query(fx.store.as_ref(), &NotificationFilter::default()).unwrap();
        assert_eq!(all.len(), broadcast_count + 1);
        let stable = &all[0];
        assert_eq!(stable.kind, NotificationKind::PatientUpdate);
        assert_eq!(stable.user_id, None);
        assert!(stable.message.contains("now stable"));
    }

    #[test]
    fn test_mark_stable_on_stable_patient_is_no_change() {
        let fx = fixture();
        let patient = seed_patient(&fx.store, false);

        assert_eq!(
            fx.coordinator.mark_stable(patient.id).unwrap(),
            Transition::NoChange
        );
        assert_eq!(notification_count(&fx.store), 0);
    }

    #[test]
    fn test_record_flag_newly_true_escalates_with_diagnosis() {
        let fx = fixture();
        seed_staff(&fx.store);
        let patient = seed_patient(&fx.store, false);

        let outcome = fx
            .coordinator
            .on_medical_record_saved(patient.id, 1, "aortic dissection", true, false)
            .unwrap();

        assert_eq!(outcome, Transition::Applied);
        let alerts =
            NotificationStore::query(fx.store.as_ref(), &NotificationFilter::default()).unwrap();
        assert_eq!(alerts.len(), 2);
        assert!(alerts[0].message.contains("aortic dissection"));
    }

    #[test]
    fn test_record_flag_newly_false_settles_patient() {
        let fx = fixture();
        seed_staff(&fx.store);
        let patient = seed_patient(&fx.store, true);

        let outcome = fx
            .coordinator
            .on_medical_record_saved(patient.id, 1, "recovered", false, true)
            .unwrap();

        assert_eq!(outcome, Transition::Applied);
        let stored = crate::store::PatientStore::get(fx.store.as_ref(), patient.id)
            .unwrap()
            .unwrap();
        assert!(!stored.is_critical);
        let all =
            NotificationStore::query(fx.store.as_ref(), &NotificationFilter::default()).unwrap();
        assert_eq!(all.len(), 1);
        assert!(all[0].message.contains("now stable"));
    }

    #[test]
    fn test_record_flag_unchanged_is_no_change() {
        let fx = fixture();
        let patient = seed_patient(&fx.store, false);

        for (is_critical, was_critical) in [(false, false), (true, true)] {
            let outcome = fx
                .coordinator
                .on_medical_record_saved(patient.id, 1, "dx", is_critical, was_critical)
                .unwrap();
            assert_eq!(outcome, Transition::NoChange);
        }
        assert_eq!(notification_count(&fx.store), 0);
    }

    #[test]
    fn test_critical_vitals_escalate_but_milder_levels_do_not() {
        let fx = fixture();
        seed_staff(&fx.store);
        let patient = seed_patient(&fx.store, false);

        for severity in [
            SeverityLevel::Normal,
            SeverityLevel::Elevated,
            SeverityLevel::High,
        ] {
            let outcome = fx
                .coordinator
                .on_vitals_classified(patient.id, severity)
                .unwrap();
            assert_eq!(outcome, Transition::NoChange);
        }
        assert_eq!(notification_count(&fx.store), 0);

        let outcome = fx
            .coordinator
            .on_vitals_classified(patient.id, SeverityLevel::Critical)
            .unwrap();
        assert_eq!(outcome, Transition::Applied);
        assert_eq!(notification_count(&fx.store), 2);
    }

    #[test]
    fn test_patient_update_flag_runs_both_directions() {
        let fx = fixture();
        seed_staff(&fx.store);
        let patient = seed_patient(&fx.store, false);

        assert_eq!(
            fx.coordinator
                .on_patient_update_flag(patient.id, false)
                .unwrap(),
            Transition::NoChange
        );

        assert_eq!(
            fx.coordinator
                .on_patient_update_flag(patient.id, true)
                .unwrap(),
            Transition::Applied
        );
        assert_eq!(notification_count(&fx.store), 2);

        assert_eq!(
            fx.coordinator
                .on_patient_update_flag(patient.id, false)
                .unwrap(),
            Transition::Applied
        );
        // Two broadcast alerts plus one stable notification.
        assert_eq!(notification_count(&fx.store), 3);
    }
}
