//! Vital-sign recording, classification and queries.

use std::sync::Arc;

use api_shared::dto::{CreateVitalSignDto, VitalSignResponse};
use api_shared::model::VitalSign;
use chrono::Utc;

use crate::coordinator::CriticalStateCoordinator;
use crate::error::{HospitalError, HospitalResult};
use crate::severity::{classify_severity, VitalReading};
use crate::store::{PatientStore, UserDirectory, VitalSignStore};

#[derive(Clone)]
pub struct VitalSignService {
    vitals: Arc<dyn VitalSignStore>,
    patients: Arc<dyn PatientStore>,
    users: Arc<dyn UserDirectory>,
    coordinator: Arc<CriticalStateCoordinator>,
}

impl VitalSignService {
    pub fn new(
        vitals: Arc<dyn VitalSignStore>,
        patients: Arc<dyn PatientStore>,
        users: Arc<dyn UserDirectory>,
        coordinator: Arc<CriticalStateCoordinator>,
    ) -> Self {
        Self {
            vitals,
            patients,
            users,
            coordinator,
        }
    }

    /// Records a reading: classifies it, appends it to the patient's series
    /// and routes the classification to the coordinator.
    ///
    /// The reading is stored regardless of what the coordinator then does;
    /// a failed escalation is logged, not propagated, because the
    /// observation itself already happened.
    pub fn create(&self, dto: CreateVitalSignDto) -> HospitalResult<VitalSignResponse> {
        tracing::info!(
            patient_id = dto.patient_id,
            recorded_by = dto.recorded_by_user_id,
            "recording vital signs"
        );

        let Some(patient) = self.patients.get(dto.patient_id)? else {
            tracing::error!(patient_id = dto.patient_id, "patient not found");
            return Err(HospitalError::Validation("patient not found".into()));
        };
        let Some(recorder) = self.users.get(dto.recorded_by_user_id)? else {
            tracing::error!(user_id = dto.recorded_by_user_id, "user not found");
            return Err(HospitalError::Validation("user not found".into()));
        };

        let reading = VitalReading {
            temperature: dto.temperature,
            blood_pressure_systolic: dto.blood_pressure_systolic,
            blood_pressure_diastolic: dto.blood_pressure_diastolic,
            heart_rate: dto.heart_rate,
            oxygen_saturation: dto.oxygen_saturation,
            respiratory_rate: dto.respiratory_rate,
            weight: dto.weight,
            height: dto.height,
        };
        let severity = classify_severity(&reading);
        tracing::info!(%severity, "classified vital signs");

        let vital_sign = self.vitals.insert(VitalSign {
            id: 0,
            patient_id: dto.patient_id,
            recorded_by_user_id: dto.recorded_by_user_id,
            temperature: dto.temperature,
            blood_pressure_systolic: dto.blood_pressure_systolic,
            blood_pressure_diastolic: dto.blood_pressure_diastolic,
            heart_rate: dto.heart_rate,
            oxygen_saturation: dto.oxygen_saturation,
            respiratory_rate: dto.respiratory_rate,
            weight: dto.weight,
            height: dto.height,
            severity,
            notes: dto.notes,
            recorded_at: Utc::now(),
        })?;

        if let Err(error) = self
            .coordinator
            .on_vitals_classified(dto.patient_id, severity)
        {
            tracing::error!(
                patient_id = dto.patient_id,
                %error,
                "failed to propagate vital-sign classification"
            );
        }

        Ok(respond(
            vital_sign,
            patient.display_name(),
            recorder.display_name(),
        ))
    }

    pub fn get(&self, id: i64) -> HospitalResult<Option<VitalSignResponse>> {
        match self.vitals.get(id)? {
            Some(vital_sign) => self.resolve(vital_sign).map(Some),
            None => Ok(None),
        }
    }

    /// A patient's readings, newest first.
    pub fn list_by_patient(&self, patient_id: i64) -> HospitalResult<Vec<VitalSignResponse>> {
        let vitals = self.vitals.list_by_patient(patient_id)?;
        vitals.into_iter().map(|vs| self.resolve(vs)).collect()
    }

    pub fn list_critical(&self) -> HospitalResult<Vec<VitalSignResponse>> {
        let vitals = self.vitals.list_critical()?;
        vitals.into_iter().map(|vs| self.resolve(vs)).collect()
    }

    /// The most recent reading for a patient, if any.
    pub fn latest(&self, patient_id: i64) -> HospitalResult<Option<VitalSignResponse>> {
        Ok(self.list_by_patient(patient_id)?.into_iter().next())
    }

    fn resolve(&self, vital_sign: VitalSign) -> HospitalResult<VitalSignResponse> {
        let patient_name = self
            .patients
            .get(vital_sign.patient_id)?
            .map(|p| p.display_name())
            .unwrap_or_default();
        let recorded_by_user_name = self
            .users
            .get(vital_sign.recorded_by_user_id)?
            .map(|u| u.display_name())
            .unwrap_or_default();
        Ok(respond(vital_sign, patient_name, recorded_by_user_name))
    }
}

fn respond(
    vital_sign: VitalSign,
    patient_name: String,
    recorded_by_user_name: String,
) -> VitalSignResponse {
    VitalSignResponse {
        id: vital_sign.id,
        patient_id: vital_sign.patient_id,
        recorded_by_user_id: vital_sign.recorded_by_user_id,
        temperature: vital_sign.temperature,
        blood_pressure_systolic: vital_sign.blood_pressure_systolic,
        blood_pressure_diastolic: vital_sign.blood_pressure_diastolic,
        heart_rate: vital_sign.heart_rate,
        oxygen_saturation: vital_sign.oxygen_saturation,
        respiratory_rate: vital_sign.respiratory_rate,
        weight: vital_sign.weight,
        height: vital_sign.height,
        severity: vital_sign.severity,
        notes: vital_sign.notes,
        recorded_at: vital_sign.recorded_at,
        patient_name,
        recorded_by_user_name,
    }
}
