//! Prescription records.

use std::sync::Arc;

use api_shared::dto::{CreatePrescriptionDto, PrescriptionResponse};
use api_shared::model::{Prescription, PrescriptionStatus};
use chrono::Utc;

use crate::error::{HospitalError, HospitalResult};
use crate::store::{PatientStore, PrescriptionStore, UserDirectory};

#[derive(Clone)]
pub struct PrescriptionService {
    prescriptions: Arc<dyn PrescriptionStore>,
    patients: Arc<dyn PatientStore>,
    users: Arc<dyn UserDirectory>,
}

impl PrescriptionService {
    pub fn new(
        prescriptions: Arc<dyn PrescriptionStore>,
        patients: Arc<dyn PatientStore>,
        users: Arc<dyn UserDirectory>,
    ) -> Self {
        Self {
            prescriptions,
            patients,
            users,
        }
    }

    pub fn create(&self, dto: CreatePrescriptionDto) -> HospitalResult<PrescriptionResponse> {
        tracing::info!(
            patient_id = dto.patient_id,
            prescriber_id = dto.prescribed_by_user_id,
            medication = %dto.medication_name,
            "creating prescription"
        );

        let Some(patient) = self.patients.get(dto.patient_id)? else {
            return Err(HospitalError::Validation("patient not found".into()));
        };
        let Some(prescriber) = self.users.get(dto.prescribed_by_user_id)? else {
            return Err(HospitalError::Validation("user not found".into()));
        };

        let prescription = self.prescriptions.insert(Prescription {
            id: 0,
            patient_id: dto.patient_id,
            prescribed_by_user_id: dto.prescribed_by_user_id,
            medication_name: dto.medication_name,
            dosage: dto.dosage,
            frequency: dto.frequency,
            instructions: dto.instructions,
            prescribed_at: Utc::now(),
            start_date: dto.start_date,
            end_date: dto.end_date,
            status: PrescriptionStatus::Active,
            notes: dto.notes,
        })?;

        Ok(respond(
            prescription,
            patient.display_name(),
            prescriber.display_name(),
        ))
    }

    pub fn get(&self, id: i64) -> HospitalResult<Option<PrescriptionResponse>> {
        match self.prescriptions.get(id)? {
            Some(prescription) => self.resolve(prescription).map(Some),
            None => Ok(None),
        }
    }

    pub fn list(&self, patient_id: Option<i64>) -> HospitalResult<Vec<PrescriptionResponse>> {
        let prescriptions = match patient_id {
            Some(id) => self.prescriptions.list_by_patient(id)?,
            None => self.prescriptions.list()?,
        };
        prescriptions.into_iter().map(|p| self.resolve(p)).collect()
    }

    fn resolve(&self, prescription: Prescription) -> HospitalResult<PrescriptionResponse> {
        let patient_name = self
            .patients
            .get(prescription.patient_id)?
            .map(|p| p.display_name())
            .unwrap_or_default();
        let prescribed_by_user_name = self
            .users
            .get(prescription.prescribed_by_user_id)?
            .map(|u| u.display_name())
            .unwrap_or_default();
        Ok(respond(prescription, patient_name, prescribed_by_user_name))
    }
}

fn respond(
    prescription: Prescription,
    patient_name: String,
    prescribed_by_user_name: String,
) -> PrescriptionResponse {
    PrescriptionResponse {
        id: prescription.id,
        patient_id: prescription.patient_id,
        prescribed_by_user_id: prescription.prescribed_by_user_id,
        medication_name: prescription.medication_name,
        dosage: prescription.dosage,
        frequency: prescription.frequency,
        instructions: prescription.instructions,
        prescribed_at: prescription.prescribed_at,
        start_date: prescription.start_date,
        end_date: prescription.end_date,
        status: prescription.status,
        notes: prescription.notes,
        patient_name,
        prescribed_by_user_name,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::MemoryStore;
    use crate::test_support::{seed_patient, seed_staff};

    fn service(store: &Arc<MemoryStore>) -> PrescriptionService {
        PrescriptionService::new(store.clone(), store.clone(), store.clone())
    }

    #[test]
    fn test_create_starts_active_with_prescription_time() {
        let store = Arc::new(MemoryStore::new());
        let (doctor, _) = seed_staff(&store);
        let patient = seed_patient(&store, false);

        let prescription = service(&store)
            .create(CreatePrescriptionDto {
                patient_id: patient.id,
                prescribed_by_user_id: doctor.id,
                medication_name: "amoxicillin".into(),
                dosage: "500mg".into(),
                frequency: "8-hourly".into(),
                instructions: None,
                start_date: None,
                end_date: None,
                notes: None,
            })
            .unwrap();

        assert_eq!(prescription.status, PrescriptionStatus::Active);
        assert_eq!(prescription.patient_name, "John Doe");
    }

    #[test]
    fn test_list_scopes_to_patient() {
        let store = Arc::new(MemoryStore::new());
        let (doctor, _) = seed_staff(&store);
        let patient = seed_patient(&store, false);
        let other = seed_patient(&store, false);
        let service = service(&store);

        for target in [patient.id, patient.id, other.id] {
            service
                .create(CreatePrescriptionDto {
                    patient_id: target,
                    prescribed_by_user_id: doctor.id,
                    medication_name: "amoxicillin".into(),
                    dosage: "500mg".into(),
                    frequency: "8-hourly".into(),
                    instructions: None,
                    start_date: None,
                    end_date: None,
                    notes: None,
                })
                .unwrap();
        }

        assert_eq!(service.list(Some(patient.id)).unwrap().len(), 2);
        assert_eq!(service.list(None).unwrap().len(), 3);
    }
}
