//! Shared fixtures for unit tests.

use std::sync::Arc;

use api_shared::model::{Patient, PatientStatus, User, UserRole};
use chrono::Utc;

use crate::store::memory::MemoryStore;
use crate::store::{PatientStore, UserDirectory};

pub fn patient_fixture(critical: bool) -> Patient {
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
        is_critical: critical,
        created_at: Utc::now(),
        last_updated_at: None,
    }
}

pub fn user_fixture(username: &str, role: UserRole) -> User {
    User {
        id: 0,
        username: username.into(),
        email: format!("{username}@hospital.example"),
        password_hash: "unused".into(),
        first_name: username.into(),
        last_name: "Staff".into(),
        role,
        phone_number: None,
        created_at: Utc::now(),
        last_login_at: None,
        last_updated_at: Utc::now(),
        is_active: true,
    }
}

pub fn seed_patient(store: &Arc<MemoryStore>, critical: bool) -> Patient {
    PatientStore::insert(store.as_ref(), patient_fixture(critical)).unwrap()
}

/// One active doctor and one active nurse.
pub fn seed_staff(store: &Arc<MemoryStore>) -> (User, User) {
    let doctor =
        UserDirectory::insert(store.as_ref(), user_fixture("gregory", UserRole::Doctor)).unwrap();
    let nurse =
        UserDirectory::insert(store.as_ref(), user_fixture("carol", UserRole::Nurse)).unwrap();
    (doctor, nurse)
}
