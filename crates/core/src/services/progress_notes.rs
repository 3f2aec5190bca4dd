//! Progress notes.

use std::sync::Arc;

use api_shared::dto::{CreateProgressNoteDto, ProgressNoteResponse};
use api_shared::model::ProgressNote;
use chrono::Utc;
use hospital_types::NonEmptyText;

use crate::coordinator::CriticalStateCoordinator;
use crate::error::{HospitalError, HospitalResult};
use crate::store::{PatientStore, ProgressNoteStore, UserDirectory};

#[derive(Clone)]
pub struct ProgressNoteService {
    notes: Arc<dyn ProgressNoteStore>,
    patients: Arc<dyn PatientStore>,
    users: Arc<dyn UserDirectory>,
    coordinator: Arc<CriticalStateCoordinator>,
}

impl ProgressNoteService {
    pub fn new(
        notes: Arc<dyn ProgressNoteStore>,
        patients: Arc<dyn PatientStore>,
        users: Arc<dyn UserDirectory>,
        coordinator: Arc<CriticalStateCoordinator>,
    ) -> Self {
        Self {
            notes,
            patients,
            users,
            coordinator,
        }
    }

    /// Creates a note. A note flagged critical escalates the patient through
    /// the coordinator's mark-critical path, with the note title as reason.
    pub fn create(&self, dto: CreateProgressNoteDto) -> HospitalResult<ProgressNoteResponse> {
        tracing::info!(
            patient_id = dto.patient_id,
            author_id = dto.created_by_user_id,
            "creating progress note"
        );

        let title = NonEmptyText::new(&dto.title)
            .map_err(|_| HospitalError::Validation("title cannot be empty".into()))?;
        let Some(patient) = self.patients.get(dto.patient_id)? else {
            return Err(HospitalError::Validation("patient not found".into()));
        };
        let Some(author) = self.users.get(dto.created_by_user_id)? else {
            return Err(HospitalError::Validation("user not found".into()));
        };

        let note = self.notes.insert(ProgressNote {
            id: 0,
            patient_id: dto.patient_id,
            created_by_user_id: dto.created_by_user_id,
            title: title.as_str().to_owned(),
            content: dto.content,
            category: dto.category,
            kind: dto.kind,
            is_critical: dto.is_critical,
            critical_notes: dto.critical_notes,
            created_at: Utc::now(),
            updated_at: None,
        })?;

        if note.is_critical {
            let reason = format!("progress note: {}", note.title);
            self.coordinator.mark_critical(note.patient_id, &reason)?;
        }

        Ok(respond(
            note,
            patient.display_name(),
            author.display_name(),
        ))
    }

    pub fn get(&self, id: i64) -> HospitalResult<Option<ProgressNoteResponse>> {
        match self.notes.get(id)? {
            Some(note) => self.resolve(note).map(Some),
            None => Ok(None),
        }
    }

    pub fn list(&self, patient_id: Option<i64>) -> HospitalResult<Vec<ProgressNoteResponse>> {
        let notes = match patient_id {
            Some(id) => self.notes.list_by_patient(id)?,
            None => self.notes.list()?,
        };
        notes.into_iter().map(|n| self.resolve(n)).collect()
    }

    fn resolve(&self, note: ProgressNote) -> HospitalResult<ProgressNoteResponse> {
        let patient_name = self
            .patients
            .get(note.patient_id)?
            .map(|p| p.display_name())
            .unwrap_or_default();
        let created_by_user_name = self
            .users
            .get(note.created_by_user_id)?
            .map(|u| u.display_name())
            .unwrap_or_default();
        Ok(respond(note, patient_name, created_by_user_name))
    }
}

fn respond(
    note: ProgressNote,
    patient_name: String,
    created_by_user_name: String,
) -> ProgressNoteResponse {
    ProgressNoteResponse {
        id: note.id,
        patient_id: note.patient_id,
        created_by_user_id: note.created_by_user_id,
        title: note.title,
        content: note.content,
        category: note.category,
        kind: note.kind,
        is_critical: note.is_critical,
        critical_notes: note.critical_notes,
        created_at: note.created_at,
        updated_at: note.updated_at,
        patient_name,
        created_by_user_name,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use api_shared::model::ProgressNoteKind;
    use crate::dispatcher::NotificationDispatcher;
    use crate::store::memory::MemoryStore;
    use crate::store::{NotificationFilter, NotificationStore};
    use crate::test_support::{seed_patient, seed_staff};

    fn service(store: &Arc<MemoryStore>) -> ProgressNoteService {
        let dispatcher = Arc::new(NotificationDispatcher::new(
            store.clone(),
            store.clone(),
            store.clone(),
        ));
        let coordinator = Arc::new(CriticalStateCoordinator::new(store.clone(), dispatcher));
        ProgressNoteService::new(store.clone(), store.clone(), store.clone(), coordinator)
    }

    fn create_dto(patient_id: i64, author_id: i64, critical: bool) -> CreateProgressNoteDto {
        CreateProgressNoteDto {
            patient_id,
            created_by_user_id: author_id,
            title: "Deterioration observed".into(),
            content: "Patient unresponsive to stimuli.".into(),
            category: None,
            kind: ProgressNoteKind::Assessment,
            is_critical: critical,
            critical_notes: None,
        }
    }

    #[test]
    fn test_create_rejects_blank_title() {
        let store = Arc::new(MemoryStore::new());
        let (doctor, _) = seed_staff(&store);
        let patient = seed_patient(&store, false);

        let mut dto = create_dto(patient.id, doctor.id, false);
        dto.title = "   ".into();
        assert!(matches!(
            service(&store).create(dto),
            Err(HospitalError::Validation(_))
        ));
    }

    #[test]
    fn test_critical_note_escalates_patient_with_title_as_reason() {
        let store = Arc::new(MemoryStore::new());
        let (doctor, _) = seed_staff(&store);
        let patient = seed_patient(&store, false);

        service(&store)
            .create(create_dto(patient.id, doctor.id, true))
            .unwrap();

        let stored = PatientStore::get(store.as_ref(), patient.id).unwrap().unwrap();
        assert!(stored.is_critical);

        let alerts =
            NotificationStore::query(store.as_ref(), &NotificationFilter::default()).unwrap();
        assert_eq!(alerts.len(), 2);
        assert!(alerts[0].message.contains("Deterioration observed"));
    }

    #[test]
    fn test_plain_note_does_not_touch_the_flag() {
        let store = Arc::new(MemoryStore::new());
        let (doctor, _) = seed_staff(&store);
        let patient = seed_patient(&store, false);

        service(&store)
            .create(create_dto(patient.id, doctor.id, false))
            .unwrap();

        let stored = PatientStore::get(store.as_ref(), patient.id).unwrap().unwrap();
        assert!(!stored.is_critical);
        assert!(
            NotificationStore::query(store.as_ref(), &NotificationFilter::default())
                .unwrap()
                .is_empty()
        );
    }
}
