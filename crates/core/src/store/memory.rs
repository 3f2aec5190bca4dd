//! In-process store backing the service for development and tests.
//!
//! One locked table per entity with a monotonically increasing id counter,
//! mirroring a relational schema without the engine. Locks are held only for
//! the duration of a single operation; cross-operation consistency is the
//! coordinator's concern, not the store's.

use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use api_shared::model::{
    Appointment, LabResult, MedicalRecord, Notification, Patient, PatientStatus, Prescription,
    ProgressNote, SeverityLevel, User, UserRole, VitalSign,
};

use crate::error::{HospitalError, HospitalResult};
use crate::store::{
    AppointmentStore, LabResultStore, MedicalRecordFilter, MedicalRecordStore, NotificationFilter,
    NotificationStore, PatientStore, PrescriptionStore, ProgressNoteStore, UserDirectory,
    VitalSignStore,
};

#[derive(Debug)]
struct Table<T> {
    next_id: i64,
    rows: BTreeMap<i64, T>,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self {
            next_id: 0,
            rows: BTreeMap::new(),
        }
    }
}

impl<T: Clone> Table<T> {
    fn allocate_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn values(&self) -> Vec<T> {
        self.rows.values().cloned().collect()
    }
}

fn read<T>(table: &RwLock<Table<T>>) -> HospitalResult<RwLockReadGuard<'_, Table<T>>> {
    table
        .read()
        .map_err(|_| HospitalError::Store("table lock poisoned".into()))
}

fn write<T>(table: &RwLock<Table<T>>) -> HospitalResult<RwLockWriteGuard<'_, Table<T>>> {
    table
        .write()
        .map_err(|_| HospitalError::Store("table lock poisoned".into()))
}

/// In-memory implementation of every store trait.
#[derive(Debug, Default)]
pub struct MemoryStore {
    users: RwLock<Table<User>>,
    patients: RwLock<Table<Patient>>,
    medical_records: RwLock<Table<MedicalRecord>>,
    appointments: RwLock<Table<Appointment>>,
    notifications: RwLock<Table<Notification>>,
    vital_signs: RwLock<Table<VitalSign>>,
    prescriptions: RwLock<Table<Prescription>>,
    lab_results: RwLock<Table<LabResult>>,
    progress_notes: RwLock<Table<ProgressNote>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PatientStore for MemoryStore {
    fn insert(&self, mut patient: Patient) -> HospitalResult<Patient> {
        let mut table = write(&self.patients)?;
        patient.id = table.allocate_id();
        table.rows.insert(patient.id, patient.clone());
        Ok(patient)
    }

    fn get(&self, id: i64) -> HospitalResult<Option<Patient>> {
        Ok(read(&self.patients)?.rows.get(&id).cloned())
    }

    fn save(&self, patient: &Patient) -> HospitalResult<()> {
        let mut table = write(&self.patients)?;
        match table.rows.get_mut(&patient.id) {
            Some(row) => {
                *row = patient.clone();
                Ok(())
            }
            None => Err(HospitalError::Store(format!(
                "patient {} does not exist",
                patient.id
            ))),
        }
    }

    fn list(&self) -> HospitalResult<Vec<Patient>> {
        Ok(read(&self.patients)?.values())
    }

    fn list_critical(&self) -> HospitalResult<Vec<Patient>> {
        let table = read(&self.patients)?;
        Ok(table
            .rows
            .values()
            .filter(|p| p.is_critical)
            .cloned()
            .collect())
    }

    fn list_by_status(&self, status: PatientStatus) -> HospitalResult<Vec<Patient>> {
        let table = read(&self.patients)?;
        Ok(table
            .rows
            .values()
            .filter(|p| p.status == status)
            .cloned()
            .collect())
    }

    fn search(&self, term: &str) -> HospitalResult<Vec<Patient>> {
        let needle = term.to_lowercase();
        let table = read(&self.patients)?;
        Ok(table
            .rows
            .values()
            .filter(|p| {
                p.first_name.to_lowercase().contains(&needle)
                    || p.last_name.to_lowercase().contains(&needle)
                    || p.phone_number.contains(term)
            })
            .cloned()
            .collect())
    }
}

impl UserDirectory for MemoryStore {
    fn insert(&self, mut user: User) -> HospitalResult<User> {
        let mut table = write(&self.users)?;
        user.id = table.allocate_id();
        table.rows.insert(user.id, user.clone());
        Ok(user)
    }

    fn get(&self, id: i64) -> HospitalResult<Option<User>> {
        Ok(read(&self.users)?.rows.get(&id).cloned())
    }

    fn save(&self, user: &User) -> HospitalResult<()> {
        let mut table = write(&self.users)?;
        match table.rows.get_mut(&user.id) {
            Some(row) => {
                *row = user.clone();
                Ok(())
            }
            None => Err(HospitalError::Store(format!(
                "user {} does not exist",
                user.id
            ))),
        }
    }

    fn list(&self) -> HospitalResult<Vec<User>> {
        Ok(read(&self.users)?.values())
    }

    fn find_by_username(&self, username: &str) -> HospitalResult<Option<User>> {
        let table = read(&self.users)?;
        Ok(table
            .rows
            .values()
            .find(|u| u.username == username)
            .cloned())
    }

    fn find_by_email(&self, email: &str) -> HospitalResult<Option<User>> {
        let table = read(&self.users)?;
        Ok(table.rows.values().find(|u| u.email == email).cloned())
    }

    fn list_by_role(&self, role: UserRole) -> HospitalResult<Vec<User>> {
        let table = read(&self.users)?;
        Ok(table
            .rows
            .values()
            .filter(|u| u.role == role)
            .cloned()
            .collect())
    }

    fn list_active_by_role(&self, role: UserRole) -> HospitalResult<Vec<User>> {
        let table = read(&self.users)?;
        Ok(table
            .rows
            .values()
            .filter(|u| u.role == role && u.is_active)
            .cloned()
            .collect())
    }
}

impl NotificationStore for MemoryStore {
    fn insert(&self, mut notification: Notification) -> HospitalResult<Notification> {
        let mut table = write(&self.notifications)?;
        notification.id = table.allocate_id();
        table.rows.insert(notification.id, notification.clone());
        Ok(notification)
    }

    fn find_by_id(&self, id: i64) -> HospitalResult<Option<Notification>> {
        Ok(read(&self.notifications)?.rows.get(&id).cloned())
    }

    fn update(&self, notification: &Notification) -> HospitalResult<()> {
        let mut table = write(&self.notifications)?;
        match table.rows.get_mut(&notification.id) {
            Some(row) => {
                *row = notification.clone();
                Ok(())
            }
            None => Err(HospitalError::Store(format!(
                "notification {} does not exist",
                notification.id
            ))),
        }
    }

    fn query(&self, filter: &NotificationFilter) -> HospitalResult<Vec<Notification>> {
        let table = read(&self.notifications)?;
        let mut matching: Vec<Notification> = table
            .rows
            .values()
            .filter(|n| filter.user_id.map_or(true, |id| n.user_id == Some(id)))
            .filter(|n| filter.is_read.map_or(true, |read| n.is_read == read))
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(matching)
    }
}

impl VitalSignStore for MemoryStore {
    fn insert(&self, mut vital_sign: VitalSign) -> HospitalResult<VitalSign> {
        let mut table = write(&self.vital_signs)?;
        vital_sign.id = table.allocate_id();
        table.rows.insert(vital_sign.id, vital_sign.clone());
        Ok(vital_sign)
    }

    fn get(&self, id: i64) -> HospitalResult<Option<VitalSign>> {
        Ok(read(&self.vital_signs)?.rows.get(&id).cloned())
    }

    fn list_by_patient(&self, patient_id: i64) -> HospitalResult<Vec<VitalSign>> {
        let table = read(&self.vital_signs)?;
        let mut matching: Vec<VitalSign> = table
            .rows
            .values()
            .filter(|vs| vs.patient_id == patient_id)
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.recorded_at.cmp(&a.recorded_at).then(b.id.cmp(&a.id)));
        Ok(matching)
    }

    fn list_critical(&self) -> HospitalResult<Vec<VitalSign>> {
        let table = read(&self.vital_signs)?;
        let mut matching: Vec<VitalSign> = table
            .rows
            .values()
            .filter(|vs| vs.severity == SeverityLevel::Critical)
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.recorded_at.cmp(&a.recorded_at).then(b.id.cmp(&a.id)));
        Ok(matching)
    }
}

impl MedicalRecordStore for MemoryStore {
    fn insert(&self, mut record: MedicalRecord) -> HospitalResult<MedicalRecord> {
        let mut table = write(&self.medical_records)?;
        record.id = table.allocate_id();
        table.rows.insert(record.id, record.clone());
        Ok(record)
    }

    fn get(&self, id: i64) -> HospitalResult<Option<MedicalRecord>> {
        Ok(read(&self.medical_records)?.rows.get(&id).cloned())
    }

    fn save(&self, record: &MedicalRecord) -> HospitalResult<()> {
        let mut table = write(&self.medical_records)?;
        match table.rows.get_mut(&record.id) {
            Some(row) => {
                *row = record.clone();
                Ok(())
            }
            None => Err(HospitalError::Store(format!(
                "medical record {} does not exist",
                record.id
            ))),
        }
    }

    fn delete(&self, id: i64) -> HospitalResult<bool> {
        let mut table = write(&self.medical_records)?;
        Ok(table.rows.remove(&id).is_some())
    }

    fn query(&self, filter: &MedicalRecordFilter) -> HospitalResult<Vec<MedicalRecord>> {
        let table = read(&self.medical_records)?;
        let mut matching: Vec<MedicalRecord> = table
            .rows
            .values()
            .filter(|r| filter.patient_id.map_or(true, |id| r.patient_id == id))
            .filter(|r| filter.doctor_id.map_or(true, |id| r.doctor_id == id))
            .filter(|r| filter.is_critical.map_or(true, |c| r.is_critical == c))
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(matching)
    }
}

impl AppointmentStore for MemoryStore {
    fn insert(&self, mut appointment: Appointment) -> HospitalResult<Appointment> {
        let mut table = write(&self.appointments)?;
        appointment.id = table.allocate_id();
        table.rows.insert(appointment.id, appointment.clone());
        Ok(appointment)
    }

    fn get(&self, id: i64) -> HospitalResult<Option<Appointment>> {
        Ok(read(&self.appointments)?.rows.get(&id).cloned())
    }

    fn save(&self, appointment: &Appointment) -> HospitalResult<()> {
        let mut table = write(&self.appointments)?;
        match table.rows.get_mut(&appointment.id) {
            Some(row) => {
                *row = appointment.clone();
                Ok(())
            }
            None => Err(HospitalError::Store(format!(
                "appointment {} does not exist",
                appointment.id
            ))),
        }
    }

    fn list(&self) -> HospitalResult<Vec<Appointment>> {
        Ok(read(&self.appointments)?.values())
    }

    fn list_by_patient(&self, patient_id: i64) -> HospitalResult<Vec<Appointment>> {
        let table = read(&self.appointments)?;
        Ok(table
            .rows
            .values()
            .filter(|a| a.patient_id == patient_id)
            .cloned()
            .collect())
    }
}

impl PrescriptionStore for MemoryStore {
    fn insert(&self, mut prescription: Prescription) -> HospitalResult<Prescription> {
        let mut table = write(&self.prescriptions)?;
        prescription.id = table.allocate_id();
        table.rows.insert(prescription.id, prescription.clone());
        Ok(prescription)
    }

    fn get(&self, id: i64) -> HospitalResult<Option<Prescription>> {
        Ok(read(&self.prescriptions)?.rows.get(&id).cloned())
    }

    fn list(&self) -> HospitalResult<Vec<Prescription>> {
        Ok(read(&self.prescriptions)?.values())
    }

    fn list_by_patient(&self, patient_id: i64) -> HospitalResult<Vec<Prescription>> {
        let table = read(&self.prescriptions)?;
        Ok(table
            .rows
            .values()
            .filter(|p| p.patient_id == patient_id)
            .cloned()
            .collect())
    }
}

impl LabResultStore for MemoryStore {
    fn insert(&self, mut lab_result: LabResult) -> HospitalResult<LabResult> {
        let mut table = write(&self.lab_results)?;
        lab_result.id = table.allocate_id();
        table.rows.insert(lab_result.id, lab_result.clone());
        Ok(lab_result)
    }

    fn get(&self, id: i64) -> HospitalResult<Option<LabResult>> {
        Ok(read(&self.lab_results)?.rows.get(&id).cloned())
    }

    fn list(&self) -> HospitalResult<Vec<LabResult>> {
        Ok(read(&self.lab_results)?.values())
    }

    fn list_by_patient(&self, patient_id: i64) -> HospitalResult<Vec<LabResult>> {
        let table = read(&self.lab_results)?;
        Ok(table
            .rows
            .values()
            .filter(|r| r.patient_id == patient_id)
            .cloned()
            .collect())
    }

    fn list_critical(&self) -> HospitalResult<Vec<LabResult>> {
        let table = read(&self.lab_results)?;
        Ok(table
            .rows
            .values()
            .filter(|r| r.severity == SeverityLevel::Critical)
            .cloned()
            .collect())
    }
}

impl ProgressNoteStore for MemoryStore {
    fn insert(&self, mut note: ProgressNote) -> HospitalResult<ProgressNote> {
        let mut table = write(&self.progress_notes)?;
        note.id = table.allocate_id();
        table.rows.insert(note.id, note.clone());
        Ok(note)
    }

    fn get(&self, id: i64) -> HospitalResult<Option<ProgressNote>> {
        Ok(read(&self.progress_notes)?.rows.get(&id).cloned())
    }

    fn list(&self) -> HospitalResult<Vec<ProgressNote>> {
        Ok(read(&self.progress_notes)?.values())
    }

    fn list_by_patient(&self, patient_id: i64) -> HospitalResult<Vec<ProgressNote>> {
        let table = read(&self.progress_notes)?;
        Ok(table
            .rows
            .values()
            .filter(|n| n.patient_id == patient_id)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn sample_patient() -> Patient {
        Patient {
            id: 0,
            first_name: "John".into(),
            last_name: "Doe".into(),
            date_of_birth: Utc::now(),
            gender: "Male".into(),
            address: "1 Ward Road".into(),
            phone_number: "5550100".into(),
            email: None,
            emergency_contact: None,
            emergency_phone: None,
            medical_history: None,
            allergies: None,
            blood_type: None,
            room: None,
            department: None,
            condition: None,
            status: PatientStatus::Active,
            is_critical: false,
            created_at: Utc::now(),
            last_updated_at: None,
        }
    }

    #[test]
    fn test_insert_assigns_sequential_ids() {
        let store = MemoryStore::new();
        let first = PatientStore::insert(&store, sample_patient()).unwrap();
        let second = PatientStore::insert(&store, sample_patient()).unwrap();
        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
    }

    #[test]
    fn test_save_rejects_unknown_id() {
        let store = MemoryStore::new();
        let mut patient = sample_patient();
        patient.id = 42;
        assert!(PatientStore::save(&store, &patient).is_err());
    }

    #[test]
    fn test_search_matches_name_case_insensitively() {
        let store = MemoryStore::new();
        PatientStore::insert(&store, sample_patient()).unwrap();
        let hits = store.search("doe").unwrap();
        assert_eq!(hits.len(), 1);
        assert!(store.search("nomatch").unwrap().is_empty());
    }

    #[test]
    fn test_notification_query_is_newest_first() {
        let store = MemoryStore::new();
        for title in ["first", "second", "third"] {
            NotificationStore::insert(
                &store,
                Notification {
                    id: 0,
                    title: title.into(),
                    message: "m".into(),
                    kind: api_shared::model::NotificationKind::SystemAlert,
                    priority: api_shared::model::NotificationPriority::Normal,
                    patient_id: None,
                    user_id: None,
                    is_read: false,
                    created_at: Utc::now(),
                    read_at: None,
                },
            )
            .unwrap();
        }
        let all = NotificationStore::query(&store, &NotificationFilter::default()).unwrap();
        let titles: Vec<_> = all.iter().map(|n| n.title.as_str()).collect();
        assert_eq!(titles, vec!["third", "second", "first"]);
    }
}
