//! Request handlers, one module per resource.

pub mod appointments;
pub mod lab_results;
pub mod medical_records;
pub mod notifications;
pub mod patients;
pub mod prescriptions;
pub mod progress_notes;
pub mod users;
pub mod vital_signs;
