//! Entity services: the operations the API surface exposes, composed from
//! stores, the classifier, the coordinator and the dispatcher.

mod appointments;
mod lab_results;
mod medical_records;
mod patients;
mod prescriptions;
mod progress_notes;
mod users;
mod vital_signs;

pub use appointments::AppointmentService;
pub use lab_results::LabResultService;
pub use medical_records::MedicalRecordService;
pub use patients::{PatientQuery, PatientService};
pub use prescriptions::PrescriptionService;
pub use progress_notes::ProgressNoteService;
pub use users::UserService;
pub use vital_signs::VitalSignService;
