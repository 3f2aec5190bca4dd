//! Domain entities and their enums.
//!
//! One module per entity. Identifiers are store-assigned `i64`s; children
//! reference their parent by id only (no back-pointer collections), and the
//! child side is queried by foreign key.

mod appointment;
mod lab_result;
mod medical_record;
mod notification;
mod patient;
mod prescription;
mod progress_note;
mod severity;
mod user;
mod vital_sign;

pub use appointment::{Appointment, AppointmentStatus};
pub use lab_result::{LabResult, LabResultStatus};
pub use medical_record::MedicalRecord;
pub use notification::{Notification, NotificationKind, NotificationPriority};
pub use patient::{Patient, PatientStatus};
pub use prescription::{Prescription, PrescriptionStatus};
pub use progress_note::{ProgressNote, ProgressNoteKind};
pub use severity::SeverityLevel;
pub use user::{User, UserRole};
pub use vital_sign::VitalSign;
