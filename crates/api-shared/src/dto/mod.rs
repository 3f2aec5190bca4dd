//! Request and response bodies for the REST surface.
//!
//! Create/Update types deserialize request payloads; Response types are what
//! the services hand back, with referenced patient/user display names already
//! resolved where the endpoint shows them.

mod appointment;
mod lab_result;
mod medical_record;
mod notification;
mod patient;
mod prescription;
mod progress_note;
mod user;
mod vital_sign;

pub use appointment::{AppointmentResponse, CreateAppointmentDto, UpdateAppointmentDto};
pub use lab_result::{CreateLabResultDto, LabResultResponse};
pub use medical_record::{
    CreateMedicalRecordDto, MedicalRecordResponse, UpdateMedicalRecordDto,
};
pub use notification::{CreateNotificationDto, NotificationResponse};
pub use patient::{CreatePatientDto, MarkCriticalDto, PatientResponse, UpdatePatientDto};
pub use prescription::{CreatePrescriptionDto, PrescriptionResponse};
pub use progress_note::{CreateProgressNoteDto, ProgressNoteResponse};
pub use user::{CreateUserDto, LoginDto, UpdateUserDto, UserResponse};
pub use vital_sign::{CreateVitalSignDto, VitalSignResponse};
