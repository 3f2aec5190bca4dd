//! Patient CRUD and the critical-flag passthroughs.

use std::sync::Arc;

use api_shared::dto::{CreatePatientDto, PatientResponse, UpdatePatientDto};
use api_shared::model::{Patient, PatientStatus};
use chrono::Utc;

use crate::coordinator::{CriticalStateCoordinator, Transition};
use crate::error::HospitalResult;
use crate::store::PatientStore;

/// Optional listing filters. Search takes precedence, then the critical
/// filter, then status.
#[derive(Debug, Clone, Default)]
pub struct PatientQuery {
    pub is_critical: Option<bool>,
    pub status: Option<PatientStatus>,
    pub search: Option<String>,
}

#[derive(Clone)]
pub struct PatientService {
    patients: Arc<dyn PatientStore>,
    coordinator: Arc<CriticalStateCoordinator>,
}

impl PatientService {
    pub fn new(patients: Arc<dyn PatientStore>, coordinator: Arc<CriticalStateCoordinator>) -> Self {
        Self {
            patients,
            coordinator,
        }
    }

    pub fn list(&self, query: &PatientQuery) -> HospitalResult<Vec<PatientResponse>> {
        tracing::info!(
            is_critical = ?query.is_critical,
            status = ?query.status,
            search = ?query.search,
            "listing patients"
        );

        let patients = if let Some(term) = query.search.as_deref().filter(|t| !t.is_empty()) {
            self.patients.search(term)?
        } else if query.is_critical == Some(true) {
            self.patients.list_critical()?
        } else if let Some(status) = query.status {
            self.patients.list_by_status(status)?
        } else {
            self.patients.list()?
        };

        Ok(patients.into_iter().map(PatientResponse::from).collect())
    }

    pub fn get(&self, id: i64) -> HospitalResult<Option<PatientResponse>> {
        let patient = self.patients.get(id)?;
        if patient.is_none() {
            tracing::warn!(patient_id = id, "patient not found");
        }
        Ok(patient.map(PatientResponse::from))
    }

    /// New patients always start Active and not critical; the flag is only
    /// reachable through the coordinator afterwards.
    pub fn create(&self, dto: CreatePatientDto) -> HospitalResult<PatientResponse> {
        tracing::info!(
            first_name = %dto.first_name,
            last_name = %dto.last_name,
            "creating patient"
        );

        let patient = self.patients.insert(Patient {
            id: 0,
            first_name: dto.first_name,
            last_name: dto.last_name,
            date_of_birth: dto.date_of_birth,
            gender: dto.gender,
            address: dto.address,
            phone_number: dto.phone_number,
            email: None,
            emergency_contact: dto.emergency_contact,
            emergency_phone: dto.emergency_phone,
            medical_history: dto.medical_history,
            allergies: dto.allergies,
            blood_type: None,
            room: None,
            department: None,
            condition: None,
            status: PatientStatus::Active,
            is_critical: false,
            created_at: Utc::now(),
            last_updated_at: None,
        })?;

        tracing::info!(patient_id = patient.id, "created patient");
        Ok(patient.into())
    }

    /// Applies a partial update. A supplied `is_critical` that differs from
    /// the stored value is routed through the coordinator so the alerting
    /// path runs as a side effect of the update.
    pub fn update(&self, id: i64, dto: UpdatePatientDto) -> HospitalResult<Option<PatientResponse>> {
        let Some(mut patient) = self.patients.get(id)? else {
            return Ok(None);
        };

        if let Some(first_name) = dto.first_name {
            patient.first_name = first_name;
        }
        if let Some(last_name) = dto.last_name {
            patient.last_name = last_name;
        }
        if let Some(address) = dto.address {
            patient.address = address;
        }
        if let Some(phone_number) = dto.phone_number {
            patient.phone_number = phone_number;
        }
        if let Some(emergency_contact) = dto.emergency_contact {
            patient.emergency_contact = Some(emergency_contact);
        }
        if let Some(emergency_phone) = dto.emergency_phone {
            patient.emergency_phone = Some(emergency_phone);
        }
        if let Some(medical_history) = dto.medical_history {
            patient.medical_history = Some(medical_history);
        }
        if let Some(allergies) = dto.allergies {
            patient.allergies = Some(allergies);
        }
        if let Some(status) = dto.status {
            patient.status = status;
        }
        patient.last_updated_at = Some(Utc::now());
        self.patients.save(&patient)?;

        if let Some(requested) = dto.is_critical {
            self.coordinator.on_patient_update_flag(id, requested)?;
        }

        Ok(self.patients.get(id)?.map(PatientResponse::from))
    }

    /// Soft delete: the record stays, its status becomes Inactive.
    pub fn delete(&self, id: i64) -> HospitalResult<bool> {
        let Some(mut patient) = self.patients.get(id)? else {
            return Ok(false);
        };
        patient.status = PatientStatus::Inactive;
        patient.last_updated_at = Some(Utc::now());
        self.patients.save(&patient)?;
        Ok(true)
    }

    pub fn list_critical(&self) -> HospitalResult<Vec<PatientResponse>> {
        let patients = self.patients.list_critical()?;
        Ok(patients.into_iter().map(PatientResponse::from).collect())
    }

    pub fn mark_critical(&self, id: i64, reason: &str) -> HospitalResult<Transition> {
        self.coordinator.mark_critical(id, reason)
    }

    pub fn mark_stable(&self, id: i64) -> HospitalResult<Transition> {
        self.coordinator.mark_stable(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatcher::NotificationDispatcher;
    use crate::store::memory::MemoryStore;
    use crate::store::{NotificationFilter, NotificationStore};
    use crate::test_support::seed_staff;

    fn service(store: &Arc<MemoryStore>) -> PatientService {
        let dispatcher = Arc::new(NotificationDispatcher::new(
            store.clone(),
            store.clone(),
            store.clone(),
        ));
        let coordinator = Arc::new(CriticalStateCoordinator::new(store.clone(), dispatcher));
        PatientService::new(store.clone(), coordinator)
    }

    fn create_dto() -> CreatePatientDto {
        CreatePatientDto {
            first_name: "John".into(),
            last_name: "Doe".into(),
            date_of_birth: Utc::now(),
            gender: "Male".into(),
            address: "1 Ward Road".into(),
            phone_number: "5550100".into(),
            emergency_contact: None,
            emergency_phone: None,
            medical_history: None,
            allergies: None,
        }
    }

    #[test]
    fn test_create_starts_active_and_not_critical() {
        let store = Arc::new(MemoryStore::new());
        let created = service(&store).create(create_dto()).unwrap();
        assert_eq!(created.status, PatientStatus::Active);
        assert!(!created.is_critical);
    }

    #[test]
    fn test_update_with_critical_true_triggers_broadcast() {
        let store = Arc::new(MemoryStore::new());
        seed_staff(&store);
        let service = service(&store);
        let created = service.create(create_dto()).unwrap();

        let updated = service
            .update(
                created.id,
                UpdatePatientDto {
                    address: Some("2 Ward Road".into()),
                    is_critical: Some(true),
                    ..Default::default()
                },
            )
            .unwrap()
            .unwrap();

        assert!(updated.is_critical);
        assert_eq!(updated.address, "2 Ward Road");
        let alerts =
            NotificationStore::query(store.as_ref(), &NotificationFilter::default()).unwrap();
        assert_eq!(alerts.len(), 2);
        assert!(alerts[0].message.contains("marked as critical"));
    }

    #[test]
    fn test_update_without_flag_sends_nothing() {
        let store = Arc::new(MemoryStore::new());
        seed_staff(&store);
        let service = service(&store);
        let created = service.create(create_dto()).unwrap();

        service
            .update(
                created.id,
                UpdatePatientDto {
                    address: Some("2 Ward Road".into()),
                    ..Default::default()
                },
            )
            .unwrap()
            .unwrap();

        let notifications =
            NotificationStore::query(store.as_ref(), &NotificationFilter::default()).unwrap();
        assert!(notifications.is_empty());
    }

    #[test]
    fn test_delete_is_a_soft_delete() {
        let store = Arc::new(MemoryStore::new());
        let service = service(&store);
        let created = service.create(create_dto()).unwrap();

        assert!(service.delete(created.id).unwrap());
        let stored = service.get(created.id).unwrap().unwrap();
        assert_eq!(stored.status, PatientStatus::Inactive);

        assert!(!service.delete(999).unwrap());
    }

    #[test]
    fn test_list_search_takes_precedence_over_filters() {
        let store = Arc::new(MemoryStore::new());
        let service = service(&store);
        service.create(create_dto()).unwrap();
        let mut other = create_dto();
        other.first_name = "Jane".into();
        other.last_name = "Smith".into();
        service.create(other).unwrap();

        let hits = service
            .list(&PatientQuery {
                search: Some("smith".into()),
                is_critical: Some(true),
                status: None,
            })
            .unwrap();

        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].last_name, "Smith");
    }
}
