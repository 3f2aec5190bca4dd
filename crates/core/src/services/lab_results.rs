//! Laboratory test orders and results.

use std::sync::Arc;

use api_shared::dto::{CreateLabResultDto, LabResultResponse};
use api_shared::model::{LabResult, LabResultStatus};
use chrono::Utc;

use crate::error::{HospitalError, HospitalResult};
use crate::store::{LabResultStore, PatientStore, UserDirectory};

#[derive(Clone)]
pub struct LabResultService {
    lab_results: Arc<dyn LabResultStore>,
    patients: Arc<dyn PatientStore>,
    users: Arc<dyn UserDirectory>,
}

impl LabResultService {
    pub fn new(
        lab_results: Arc<dyn LabResultStore>,
        patients: Arc<dyn PatientStore>,
        users: Arc<dyn UserDirectory>,
    ) -> Self {
        Self {
            lab_results,
            patients,
            users,
        }
    }

    pub fn create(&self, dto: CreateLabResultDto) -> HospitalResult<LabResultResponse> {
        tracing::info!(
            patient_id = dto.patient_id,
            ordered_by = dto.ordered_by_user_id,
            test = %dto.test_name,
            "ordering lab test"
        );

        let Some(patient) = self.patients.get(dto.patient_id)? else {
            return Err(HospitalError::Validation("patient not found".into()));
        };
        let Some(orderer) = self.users.get(dto.ordered_by_user_id)? else {
            return Err(HospitalError::Validation("user not found".into()));
        };

        let lab_result = self.lab_results.insert(LabResult {
            id: 0,
            patient_id: dto.patient_id,
            ordered_by_user_id: dto.ordered_by_user_id,
            test_name: dto.test_name,
            test_value: dto.test_value,
            normal_range: dto.normal_range,
            unit: dto.unit,
            status: LabResultStatus::Pending,
            severity: dto.severity,
            notes: dto.notes,
            ordered_at: Utc::now(),
            completed_at: None,
            reported_at: None,
        })?;

        Ok(respond(
            lab_result,
            patient.display_name(),
            orderer.display_name(),
        ))
    }

    pub fn get(&self, id: i64) -> HospitalResult<Option<LabResultResponse>> {
        match self.lab_results.get(id)? {
            Some(lab_result) => self.resolve(lab_result).map(Some),
            None => Ok(None),
        }
    }

    pub fn list(&self, patient_id: Option<i64>) -> HospitalResult<Vec<LabResultResponse>> {
        let lab_results = match patient_id {
            Some(id) => self.lab_results.list_by_patient(id)?,
            None => self.lab_results.list()?,
        };
        lab_results.into_iter().map(|r| self.resolve(r)).collect()
    }

    pub fn list_critical(&self) -> HospitalResult<Vec<LabResultResponse>> {
        let lab_results = self.lab_results.list_critical()?;
        lab_results.into_iter().map(|r| self.resolve(r)).collect()
    }

    fn resolve(&self, lab_result: LabResult) -> HospitalResult<LabResultResponse> {
        let patient_name = self
            .patients
            .get(lab_result.patient_id)?
            .map(|p| p.display_name())
            .unwrap_or_default();
        let ordered_by_user_name = self
            .users
            .get(lab_result.ordered_by_user_id)?
            .map(|u| u.display_name())
            .unwrap_or_default();
        Ok(respond(lab_result, patient_name, ordered_by_user_name))
    }
}

fn respond(
    lab_result: LabResult,
    patient_name: String,
    ordered_by_user_name: String,
) -> LabResultResponse {
    LabResultResponse {
        id: lab_result.id,
        patient_id: lab_result.patient_id,
        ordered_by_user_id: lab_result.ordered_by_user_id,
        test_name: lab_result.test_name,
        test_value: lab_result.test_value,
        normal_range: lab_result.normal_range,
        unit: lab_result.unit,
        status: lab_result.status,
        severity: lab_result.severity,
        notes: lab_result.notes,
        ordered_at: lab_result.ordered_at,
        completed_at: lab_result.completed_at,
        reported_at: lab_result.reported_at,
        patient_name,
        ordered_by_user_name,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use api_shared::model::SeverityLevel;
    use crate::store::memory::MemoryStore;
    use crate::test_support::{seed_patient, seed_staff};

    fn service(store: &Arc<MemoryStore>) -> LabResultService {
        LabResultService::new(store.clone(), store.clone(), store.clone())
    }

    fn create_dto(patient_id: i64, orderer_id: i64, severity: SeverityLevel) -> CreateLabResultDto {
        CreateLabResultDto {
            patient_id,
            ordered_by_user_id: orderer_id,
            test_name: "troponin".into(),
            test_value: None,
            normal_range: None,
            unit: None,
            severity,
            notes: None,
        }
    }

    #[test]
    fn test_create_starts_pending() {
        let store = Arc::new(MemoryStore::new());
        let (doctor, _) = seed_staff(&store);
        let patient = seed_patient(&store, false);

        let lab_result = service(&store)
            .create(create_dto(patient.id, doctor.id, SeverityLevel::Normal))
            .unwrap();
        assert_eq!(lab_result.status, LabResultStatus::Pending);
        assert!(lab_result.completed_at.is_none());
    }

    #[test]
    fn test_critical_listing_only_returns_critical_severity() {
        let store = Arc::new(MemoryStore::new());
        let (doctor, _) = seed_staff(&store);
        let patient = seed_patient(&store, false);
        let service = service(&store);

        service
            .create(create_dto(patient.id, doctor.id, SeverityLevel::Normal))
            .unwrap();
        service
            .create(create_dto(patient.id, doctor.id, SeverityLevel::Critical))
            .unwrap();

        let critical = service.list_critical().unwrap();
        assert_eq!(critical.len(), 1);
        assert_eq!(critical[0].severity, SeverityLevel::Critical);
    }
}
