//! Appointment scheduling.

use std::sync::Arc;

use api_shared::dto::{
    AppointmentResponse, CreateAppointmentDto, CreateNotificationDto, UpdateAppointmentDto,
};
use api_shared::model::{
    Appointment, AppointmentStatus, NotificationKind, NotificationPriority, UserRole,
};
use chrono::Utc;

use crate::dispatcher::NotificationDispatcher;
use crate::error::{HospitalError, HospitalResult};
use crate::store::{AppointmentStore, PatientStore, UserDirectory};

#[derive(Clone)]
pub struct AppointmentService {
    appointments: Arc<dyn AppointmentStore>,
    patients: Arc<dyn PatientStore>,
    users: Arc<dyn UserDirectory>,
    dispatcher: Arc<NotificationDispatcher>,
}

impl AppointmentService {
    pub fn new(
        appointments: Arc<dyn AppointmentStore>,
        patients: Arc<dyn PatientStore>,
        users: Arc<dyn UserDirectory>,
        dispatcher: Arc<NotificationDispatcher>,
    ) -> Self {
        Self {
            appointments,
            patients,
            users,
            dispatcher,
        }
    }

    /// Schedules an appointment and reminds the doctor with a notification.
    pub fn create(&self, dto: CreateAppointmentDto) -> HospitalResult<AppointmentResponse> {
        tracing::info!(
            patient_id = dto.patient_id,
            doctor_id = dto.doctor_id,
            "scheduling appointment"
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

        let appointment = self.appointments.insert(Appointment {
            id: 0,
            patient_id: dto.patient_id,
            doctor_id: dto.doctor_id,
            appointment_date: dto.appointment_date,
            appointment_type: dto.appointment_type,
            notes: dto.notes,
            status: AppointmentStatus::Scheduled,
            created_at: Utc::now(),
            updated_at: None,
        })?;

        let reminder = CreateNotificationDto {
            title: "Appointment Reminder".into(),
            message: format!(
                "Reminder: Appointment with {} on {}",
                patient.display_name(),
                appointment.appointment_date.format("%Y-%m-%d %H:%M")
            ),
            kind: NotificationKind::AppointmentReminder,
            priority: NotificationPriority::Normal,
            patient_id: Some(appointment.patient_id),
            user_id: Some(appointment.doctor_id),
        };
        if let Err(error) = self.dispatcher.dispatch(reminder) {
            tracing::error!(appointment_id = appointment.id, %error, "reminder failed");
        }

        Ok(respond(
            appointment,
            patient.display_name(),
            format!("Dr. {}", doctor.last_name),
        ))
    }

    pub fn get(&self, id: i64) -> HospitalResult<Option<AppointmentResponse>> {
        match self.appointments.get(id)? {
            Some(appointment) => self.resolve(appointment).map(Some),
            None => Ok(None),
        }
    }

    pub fn list(&self, patient_id: Option<i64>) -> HospitalResult<Vec<AppointmentResponse>> {
        let appointments = match patient_id {
            Some(id) => self.appointments.list_by_patient(id)?,
            None => self.appointments.list()?,
        };
        appointments.into_iter().map(|a| self.resolve(a)).collect()
    }

    pub fn update(
        &self,
        id: i64,
        dto: UpdateAppointmentDto,
    ) -> HospitalResult<Option<AppointmentResponse>> {
        let Some(mut appointment) = self.appointments.get(id)? else {
            return Ok(None);
        };

        if let Some(appointment_date) = dto.appointment_date {
            appointment.appointment_date = appointment_date;
        }
        if let Some(appointment_type) = dto.appointment_type {
            appointment.appointment_type = appointment_type;
        }
        if let Some(notes) = dto.notes {
            appointment.notes = Some(notes);
        }
        if let Some(status) = dto.status {
            appointment.status = status;
        }
        appointment.updated_at = Some(Utc::now());
        self.appointments.save(&appointment)?;

        self.resolve(appointment).map(Some)
    }

    fn resolve(&self, appointment: Appointment) -> HospitalResult<AppointmentResponse> {
        let patient_name = self
            .patients
            .get(appointment.patient_id)?
            .map(|p| p.display_name())
            .unwrap_or_default();
        let doctor_name = self
            .users
            .get(appointment.doctor_id)?
            .map(|d| format!("Dr. {}", d.last_name))
            .unwrap_or_default();
        Ok(respond(appointment, patient_name, doctor_name))
    }
}

fn respond(
    appointment: Appointment,
    patient_name: String,
    doctor_name: String,
) -> AppointmentResponse {
    AppointmentResponse {
        id: appointment.id,
        patient_id: appointment.patient_id,
        doctor_id: appointment.doctor_id,
        appointment_date: appointment.appointment_date,
        appointment_type: appointment.appointment_type,
        notes: appointment.notes,
        status: appointment.status,
        created_at: appointment.created_at,
        updated_at: appointment.updated_at,
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

    fn service(store: &Arc<MemoryStore>) -> AppointmentService {
        let dispatcher = Arc::new(NotificationDispatcher::new(
            store.clone(),
            store.clone(),
            store.clone(),
        ));
        AppointmentService::new(store.clone(), store.clone(), store.clone(), dispatcher)
    }

    #[test]
    fn test_create_schedules_and_reminds_the_doctor() {
        let store = Arc::new(MemoryStore::new());
        let (doctor, _) = seed_staff(&store);
        let patient = seed_patient(&store, false);

        let appointment = service(&store)
            .create(CreateAppointmentDto {
                patient_id: patient.id,
                doctor_id: doctor.id,
                appointment_date: Utc::now(),
                appointment_type: "Checkup".into(),
                notes: None,
            })
            .unwrap();

        assert_eq!(appointment.status, AppointmentStatus::Scheduled);

        let reminders =
            NotificationStore::query(store.as_ref(), &NotificationFilter::default()).unwrap();
        assert_eq!(reminders.len(), 1);
        assert_eq!(reminders[0].kind, NotificationKind::AppointmentReminder);
        assert_eq!(reminders[0].user_id, Some(doctor.id));
    }

    #[test]
    fn test_create_rejects_non_doctor() {
        let store = Arc::new(MemoryStore::new());
        let (_, nurse) = seed_staff(&store);
        let patient = seed_patient(&store, false);

        let result = service(&store).create(CreateAppointmentDto {
            patient_id: patient.id,
            doctor_id: nurse.id,
            appointment_date: Utc::now(),
            appointment_type: "Checkup".into(),
            notes: None,
        });
        assert!(matches!(result, Err(HospitalError::Validation(_))));
    }

    #[test]
    fn test_update_changes_status() {
        let store = Arc::new(MemoryStore::new());
        let (doctor, _) = seed_staff(&store);
        let patient = seed_patient(&store, false);
        let service = service(&store);

        let appointment = service
            .create(CreateAppointmentDto {
                patient_id: patient.id,
                doctor_id: doctor.id,
                appointment_date: Utc::now(),
                appointment_type: "Checkup".into(),
                notes: None,
            })
            .unwrap();

        let updated = service
            .update(
                appointment.id,
                UpdateAppointmentDto {
                    status: Some(AppointmentStatus::Cancelled),
                    ..Default::default()
                },
            )
            .unwrap()
            .unwrap();
        assert_eq!(updated.status, AppointmentStatus::Cancelled);
        assert!(updated.updated_at.is_some());
    }
}
