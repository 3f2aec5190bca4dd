//! Store abstractions consumed by the services.
//!
//! One narrow trait per entity with typed query methods; services receive
//! them as `Arc<dyn Trait>` so a different backing store can be injected
//! without touching the domain logic. There is intentionally no generic
//! base repository trait.

pub mod memory;

use api_shared::model::{
    Appointment, LabResult, MedicalRecord, Notification, Patient, PatientStatus, Prescription,
    ProgressNote, User, UserRole, VitalSign,
};

use crate::error::HospitalResult;

/// Optional, AND-combined notification filters.
#[derive(Debug, Clone, Copy, Default)]
pub struct NotificationFilter {
    pub user_id: Option<i64>,
    pub is_read: Option<bool>,
}

/// Optional, AND-combined medical-record filters.
#[derive(Debug, Clone, Copy, Default)]
pub struct MedicalRecordFilter {
    pub patient_id: Option<i64>,
    pub doctor_id: Option<i64>,
    pub is_critical: Option<bool>,
}

pub trait PatientStore: Send + Sync {
    /// Persists a new patient and returns it with its assigned id.
    fn insert(&self, patient: Patient) -> HospitalResult<Patient>;
    fn get(&self, id: i64) -> HospitalResult<Option<Patient>>;
    /// Overwrites an existing row; saving an unknown id is a store error.
    fn save(&self, patient: &Patient) -> HospitalResult<()>;
    fn list(&self) -> HospitalResult<Vec<Patient>>;
    fn list_critical(&self) -> HospitalResult<Vec<Patient>>;
    fn list_by_status(&self, status: PatientStatus) -> HospitalResult<Vec<Patient>>;
    /// Case-insensitive match against first name, last name or phone number.
    fn search(&self, term: &str) -> HospitalResult<Vec<Patient>>;
}

pub trait UserDirectory: Send + Sync {
    fn insert(&self, user: User) -> HospitalResult<User>;
    fn get(&self, id: i64) -> HospitalResult<Option<User>>;
    fn save(&self, user: &User) -> HospitalResult<()>;
    fn list(&self) -> HospitalResult<Vec<User>>;
    fn find_by_username(&self, username: &str) -> HospitalResult<Option<User>>;
    fn find_by_email(&self, email: &str) -> HospitalResult<Option<User>>;
    fn list_by_role(&self, role: UserRole) -> HospitalResult<Vec<User>>;
    /// Accounts with the given role that are currently active; this is the
    /// set a broadcast fans out to.
    fn list_active_by_role(&self, role: UserRole) -> HospitalResult<Vec<User>>;
}

pub trait NotificationStore: Send + Sync {
    fn insert(&self, notification: Notification) -> HospitalResult<Notification>;
    fn find_by_id(&self, id: i64) -> HospitalResult<Option<Notification>>;
    fn update(&self, notification: &Notification) -> HospitalResult<()>;
    /// Matching notifications, newest first.
    fn query(&self, filter: &NotificationFilter) -> HospitalResult<Vec<Notification>>;
}

pub trait VitalSignStore: Send + Sync {
    /// Appends a reading; the series per patient is immutable once written.
    fn insert(&self, vital_sign: VitalSign) -> HospitalResult<VitalSign>;
    fn get(&self, id: i64) -> HospitalResult<Option<VitalSign>>;
    /// A patient's readings, newest first.
    fn list_by_patient(&self, patient_id: i64) -> HospitalResult<Vec<VitalSign>>;
    /// Readings whose computed severity is Critical, newest first.
    fn list_critical(&self) -> HospitalResult<Vec<VitalSign>>;
}

pub trait MedicalRecordStore: Send + Sync {
    fn insert(&self, record: MedicalRecord) -> HospitalResult<MedicalRecord>;
    fn get(&self, id: i64) -> HospitalResult<Option<MedicalRecord>>;
    fn save(&self, record: &MedicalRecord) -> HospitalResult<()>;
    /// Removes a record outright; returns whether it existed.
    fn delete(&self, id: i64) -> HospitalResult<bool>;
    /// Matching records, newest first.
    fn query(&self, filter: &MedicalRecordFilter) -> HospitalResult<Vec<MedicalRecord>>;
}

pub trait AppointmentStore: Send + Sync {
    fn insert(&self, appointment: Appointment) -> HospitalResult<Appointment>;
    fn get(&self, id: i64) -> HospitalResult<Option<Appointment>>;
    fn save(&self, appointment: &Appointment) -> HospitalResult<()>;
    fn list(&self) -> HospitalResult<Vec<Appointment>>;
    fn list_by_patient(&self, patient_id: i64) -> HospitalResult<Vec<Appointment>>;
}

pub trait PrescriptionStore: Send + Sync {
    fn insert(&self, prescription: Prescription) -> HospitalResult<Prescription>;
    fn get(&self, id: i64) -> HospitalResult<Option<Prescription>>;
    fn list(&self) -> HospitalResult<Vec<Prescription>>;
    fn list_by_patient(&self, patient_id: i64) -> HospitalResult<Vec<Prescription>>;
}

pub trait LabResultStore: Send + Sync {
    fn insert(&self, lab_result: LabResult) -> HospitalResult<LabResult>;
    fn get(&self, id: i64) -> HospitalResult<Option<LabResult>>;
    fn list(&self) -> HospitalResult<Vec<LabResult>>;
    fn list_by_patient(&self, patient_id: i64) -> HospitalResult<Vec<LabResult>>;
    fn list_critical(&self) -> HospitalResult<Vec<LabResult>>;
}

pub trait ProgressNoteStore: Send + Sync {
    fn insert(&self, note: ProgressNote) -> HospitalResult<ProgressNote>;
    fn get(&self, id: i64) -> HospitalResult<Option<ProgressNote>>;
    fn list(&self) -> HospitalResult<Vec<ProgressNote>>;
    fn list_by_patient(&self, patient_id: i64) -> HospitalResult<Vec<ProgressNote>>;
}
