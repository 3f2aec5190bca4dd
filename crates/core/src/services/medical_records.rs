//! Medical-record CRUD with the critical-flag hooks.

use std::sync::Arc;

use api_shared::dto::{CreateMedicalRecordDto, MedicalRecordResponse, UpdateMedicalRecordDto};
use api_shared::model::{
    MedicalRecord, NotificationKind, NotificationPriority, UserRole,
};
use api_shared::dto::CreateNotificationDto;
use chrono::Utc;

use crate::coordinator::CriticalStateCoordinator;
use crate::dispatcher::NotificationDispatcher;
use crate::error::{HospitalError, HospitalResult};
use crate::store::{MedicalRecordFilter, MedicalRecordStore, PatientStore, UserDirectory};

#[derive(Clone)]
pub struct MedicalRecordService {
    records: Arc<dyn MedicalRecordStore>,
    patients: Arc<dyn PatientStore>,
    users: Arc<dyn UserDirectory>,
    coordinator: Arc<CriticalStateCoordinator>,
    dispatcher: Arc<NotificationDispatcher>,
}

impl MedicalRecordService {
    pub fn new(
        records: Arc<dyn MedicalRecordStore>,
        patients: Arc<dyn PatientStore>,
        users: Arc<dyn UserDirectory>,
        coordinator: Arc<CriticalStateCoordinator>,
        dispatcher: Arc<NotificationDispatcher>,
    ) -> Self {
        Self {
            records,
            patients,
            users,
            coordinator,
            dispatcher,
        }
    }

    /// Creates a record. A critical flag escalates the patient through the
    /// coordinator, and every creation announces itself with a
    /// MedicalRecordUpdate notification addressed to all staff.
    pub fn create(&self, dto: CreateMedicalRecordDto) -> HospitalResult<MedicalRecordResponse> {
        tracing::info!(
            patient_id = dto.patient_id,
            doctor_id = dto.doctor_id,
            "creating medical record"
        );

        let Some(patient) = self.patients.get(dto.patient_id)? else {
            return Err(HospitalError::Validation("patient not found".into()));
        };
        let doctor = match self.users.get(dto.doctor_id)? {
            Some(user) if user.role == UserRole::Doctor => user,
            _ => {
                return Err(HospitalError::Validation(
                    "doctor not found or invalid".into(),
                ))
            }
        };

        let record = self.records.insert(MedicalRecord {
            id: 0,
            patient_id: dto.patient_id,
            doctor_id: dto.doctor_id,
            diagnosis: dto.diagnosis,
            symptoms: dto.symptoms,
            treatment: dto.treatment,
            prescriptions: dto.prescriptions,
            temperature: dto.temperature,
            blood_pressure_systolic: dto.blood_pressure_systolic,
            blood_pressure_diastolic: dto.blood_pressure_diastolic,
            heart_rate: dto.heart_rate,
            weight: dto.weight,
            height: dto.height,
            is_critical: dto.is_critical,
            critical_notes: dto.critical_notes,
            created_at: Utc::now(),
            updated_at: None,
        })?;

        if record.is_critical {
            self.coordinator.on_medical_record_saved(
                record.patient_id,
                record.doctor_id,
                &record.diagnosis,
                true,
                false,
            )?;
        }

        let announcement = CreateNotificationDto {
            title: "Medical Record Updated".into(),
            message: format!(
                "Dr. {} updated medical record for {}. Diagnosis: {}",
                doctor.last_name,
                patient.display_name(),
                record.diagnosis
            ),
            kind: NotificationKind::MedicalRecordUpdate,
            priority: NotificationPriority::Normal,
            patient_id: Some(record.patient_id),
            user_id: None,
        };
        if let Err(error) = self.dispatcher.dispatch(announcement) {
            tracing::error!(record_id = record.id, %error, "record-update notification failed");
        }

        let response = respond(
            record,
            patient.display_name(),
            format!("Dr. {}", doctor.last_name),
        );
        tracing::info!(record_id = response.id, "created medical record");
        Ok(response)
    }

    pub fn get(&self, id: i64) -> HospitalResult<Option<MedicalRecordResponse>> {
        match self.records.get(id)? {
            Some(record) => self.resolve(record).map(Some),
            None => Ok(None),
        }
    }

    /// Matching records, newest first.
    pub fn query(&self, filter: &MedicalRecordFilter) -> HospitalResult<Vec<MedicalRecordResponse>> {
        let records = self.records.query(filter)?;
        records.into_iter().map(|r| self.resolve(r)).collect()
    }

    pub fn list_by_patient(&self, patient_id: i64) -> HospitalResult<Vec<MedicalRecordResponse>> {
        self.query(&MedicalRecordFilter {
            patient_id: Some(patient_id),
            ..Default::default()
        })
    }

    pub fn list_critical(&self) -> HospitalResult<Vec<MedicalRecordResponse>> {
        self.query(&MedicalRecordFilter {
            is_critical: Some(true),
            ..Default::default()
        })
    }

    /// Applies a partial update, then hands the old/new critical flags to
    /// the coordinator, which settles or escalates the patient as needed.
    pub fn update(
        &self,
        id: i64,
        dto: UpdateMedicalRecordDto,
    ) -> HospitalResult<Option<MedicalRecordResponse>> {
        let Some(mut record) = self.records.get(id)? else {
            return Ok(None);
        };
        let was_critical = record.is_critical;

        if let Some(diagnosis) = dto.diagnosis {
            record.diagnosis = diagnosis;
        }
        if let Some(symptoms) = dto.symptoms {
            record.symptoms = Some(symptoms);
        }
        if let Some(treatment) = dto.treatment {
            record.treatment = Some(treatment);
        }
        if let Some(prescriptions) = dto.prescriptions {
            record.prescriptions = Some(prescriptions);
        }
        if let Some(temperature) = dto.temperature {
            record.temperature = Some(temperature);
        }
        if let Some(systolic) = dto.blood_pressure_systolic {
            record.blood_pressure_systolic = Some(systolic);
        }
        if let Some(diastolic) = dto.blood_pressure_diastolic {
            record.blood_pressure_diastolic = Some(diastolic);
        }
        if let Some(heart_rate) = dto.heart_rate {
            record.heart_rate = Some(heart_rate);
        }
        if let Some(weight) = dto.weight {
            record.weight = Some(weight);
        }
        if let Some(height) = dto.height {
            record.height = Some(height);
        }
        if let Some(is_critical) = dto.is_critical {
            record.is_critical = is_critical;
        }
        if let Some(critical_notes) = dto.critical_notes {
            record.critical_notes = Some(critical_notes);
        }
        record.updated_at = Some(Utc::now());
        self.records.save(&record)?;

        self.coordinator.on_medical_record_saved(
            record.patient_id,
            record.doctor_id,
            &record.diagnosis,
            record.is_critical,
            was_critical,
        )?;

        self.resolve(record).map(Some)
    }

    /// Hard delete. Records are the one entity removed outright rather
    /// than deactivated.
    pub fn delete(&self, id: i64) -> HospitalResult<bool> {
        self.records.delete(id)
    }

    fn resolve(&self, record: MedicalRecord) -> HospitalResult<MedicalRecordResponse> {
        let patient_name = self
            .patients
            .get(record.patient_id)?
            .map(|p| p.display_name())
            .unwrap_or_default();
        let doctor_name = self
            .users
            .get(record.doctor_id)?
            .map(|d| format!("Dr. {}", d.last_name))
            .unwrap_or_default();
        Ok(respond(record, patient_name, doctor_name))
    }
}

fn respond(
    record: MedicalRecord,
    patient_name: String,
    doctor_name: String,
) -> MedicalRecordResponse {
    MedicalRecordResponse {
        id: record.id,
        patient_id: record.patient_id,
        doctor_id: record.doctor_id,
        diagnosis: record.diagnosis,
        symptoms: record.symptoms,
        treatment: record.treatment,
        prescriptions: record.prescriptions,
        temperature: record.temperature,
        blood_pressure_systolic: record.blood_pressure_systolic,
        blood_pressure_diastolic: record.blood_pressure_diastolic,
        heart_rate: record.heart_rate,
        weight: record.weight,
        height: record.height,
        is_critical: record.is_critical,
        critical_notes: record.critical_notes,
        created_at: record.created_at,
        updated_at: record.updated_at,
        patient_name,
        doctor_name,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::MemoryStore;
    use crate::store::{NotificationFilter, NotificationStore};
    use crate::test_support::{seed_patient, seed_staff};

    fn service(store: &Arc<MemoryStore>) -> MedicalRecordService {
        let dispatcher = Arc::new(NotificationDispatcher::new(
            store.clone(),
            store.clone(),
            store.clone(),
        ));
        let coordinator = Arc::new(CriticalStateCoordinator::new(
            store.clone(),
            dispatcher.clone(),
        ));
        MedicalRecordService::new(
            store.clone(),
            store.clone(),
            store.clone(),
            coordinator,
            dispatcher,
        )
    }

    fn create_dto(patient_id: i64, doctor_id: i64, critical: bool) -> CreateMedicalRecordDto {
        CreateMedicalRecordDto {
            patient_id,
            doctor_id,
            diagnosis: "pneumonia".into(),
            symptoms: None,
            treatment: None,
            prescriptions: None,
            temperature: None,
            blood_pressure_systolic: None,
            blood_pressure_diastolic: None,
            heart_rate: None,
            weight: None,
            height: None,
            is_critical: critical,
            critical_notes: None,
        }
    }

    #[test]
    fn test_create_requires_existing_patient_and_doctor_role() {
        let store = Arc::new(MemoryStore::new());
        let (doctor, nurse) = seed_staff(&store);
        let patient = seed_patient(&store, false);
        let service = service(&store);

        assert!(matches!(
            service.create(create_dto(999, doctor.id, false)),
            Err(HospitalError::Validation(_))
        ));
        // A nurse cannot author a medical record.
        assert!(matches!(
            service.create(create_dto(patient.id, nurse.id, false)),
            Err(HospitalError::Validation(_))
        ));
    }

    #[test]
    fn test_create_announces_to_all_staff() {
        let store = Arc::new(MemoryStore::new());
        let (doctor, _) = seed_staff(&store);
        let patient = seed_patient(&store, false);
        let service = service(&store);

        let record = service
            .create(create_dto(patient.id, doctor.id, false))
            .unwrap();
        assert_eq!(record.doctor_name, "Dr. Staff");

        let notifications =
            NotificationStore::query(store.as_ref(), &NotificationFilter::default()).unwrap();
        assert_eq!(notifications.len(), 1);
        assert_eq!(notifications[0].kind, NotificationKind::MedicalRecordUpdate);
        assert_eq!(notifications[0].user_id, None);
        assert!(notifications[0].message.contains("pneumonia"));
    }

    #[test]
    fn test_critical_create_escalates_patient_before_announcing() {
        let store = Arc::new(MemoryStore::new());
        let (doctor, _) = seed_staff(&store);
        let patient = seed_patient(&store, false);
        let service = service(&store);

        service
            .create(create_dto(patient.id, doctor.id, true))
            .unwrap();

        let stored = PatientStore::get(store.as_ref(), patient.id).unwrap().unwrap();
        assert!(stored.is_critical);

        // Two critical alerts (doctor + nurse) plus the record announcement.
        let notifications =
            NotificationStore::query(store.as_ref(), &NotificationFilter::default()).unwrap();
        assert_eq!(notifications.len(), 3);
    }

    #[test]
    fn test_update_dropping_flag_settles_patient() {
        let store = Arc::new(MemoryStore::new());
        let (doctor, _) = seed_staff(&store);
        let patient = seed_patient(&store, false);
        let service = service(&store);

        let record = service
            .create(create_dto(patient.id, doctor.id, true))
            .unwrap();

        let updated = service
            .update(
                record.id,
                UpdateMedicalRecordDto {
                    is_critical: Some(false),
                    ..Default::default()
                },
            )
            .unwrap()
            .unwrap();
        assert!(!updated.is_critical);

        let stored = PatientStore::get(store.as_ref(), patient.id).unwrap().unwrap();
        assert!(!stored.is_critical);

        let newest =
            NotificationStore::query(store.as_ref(), &NotificationFilter::default()).unwrap();
        assert!(newest[0].message.contains("now stable"));
    }

    #[test]
    fn test_update_unknown_record_is_none_and_delete_reports_existence() {
        let store = Arc::new(MemoryStore::new());
        let (doctor, _) = seed_staff(&store);
        let patient = seed_patient(&store, false);
        let service = service(&store);

        assert!(service
            .update(999, UpdateMedicalRecordDto::default())
            .unwrap()
            .is_none());

        let record = service
            .create(create_dto(patient.id, doctor.id, false))
            .unwrap();
        assert!(service.delete(record.id).unwrap());
        assert!(!service.delete(record.id).unwrap());
    }
}
