//! Staff account management and the login stand-in.

use std::sync::Arc;

use api_shared::dto::{CreateUserDto, LoginDto, UpdateUserDto, UserResponse};
use api_shared::model::{User, UserRole};
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use chrono::Utc;
use hospital_types::EmailAddress;

use crate::error::{HospitalError, HospitalResult};
use crate::store::UserDirectory;

#[derive(Clone)]
pub struct UserService {
    users: Arc<dyn UserDirectory>,
}

impl UserService {
    pub fn new(users: Arc<dyn UserDirectory>) -> Self {
        Self { users }
    }

    /// Active accounts, optionally narrowed to one role.
    pub fn list(&self, role: Option<UserRole>) -> HospitalResult<Vec<UserResponse>> {
        tracing::info!(role = ?role, "listing users");

        let users = match role {
            Some(role) => self.users.list_by_role(role)?,
            None => self.users.list()?,
        };

        Ok(users
            .into_iter()
            .filter(|u| u.is_active)
            .map(UserResponse::from)
            .collect())
    }

    /// An account by id; deactivated accounts are reported as absent.
    pub fn get(&self, id: i64) -> HospitalResult<Option<UserResponse>> {
        let Some(user) = self.users.get(id)? else {
            tracing::warn!(user_id = id, "user not found");
            return Ok(None);
        };
        if !user.is_active {
            tracing::warn!(user_id = id, "user is inactive");
            return Ok(None);
        }
        Ok(Some(user.into()))
    }

    pub fn create(&self, dto: CreateUserDto) -> HospitalResult<UserResponse> {
        tracing::info!(username = %dto.username, "creating user");

        let email = EmailAddress::new(&dto.email)
            .map_err(|e| HospitalError::Validation(format!("invalid email: {e}")))?;

        if self.users.find_by_username(&dto.username)?.is_some() {
            tracing::warn!(username = %dto.username, "username already exists");
            return Err(HospitalError::Conflict("username already exists".into()));
        }
        if self.users.find_by_email(email.as_str())?.is_some() {
            tracing::warn!(email = %email, "email already exists");
            return Err(HospitalError::Conflict("email already exists".into()));
        }

        let user = self.users.insert(User {
            id: 0,
            username: dto.username,
            email: email.as_str().to_owned(),
            password_hash: hash_password(&dto.password)?,
            first_name: dto.first_name,
            last_name: dto.last_name,
            role: dto.role,
            phone_number: dto.phone_number,
            created_at: Utc::now(),
            last_login_at: None,
            last_updated_at: Utc::now(),
            is_active: true,
        })?;

        tracing::info!(user_id = user.id, "created user");
        Ok(user.into())
    }

    pub fn update(&self, id: i64, dto: UpdateUserDto) -> HospitalResult<Option<UserResponse>> {
        let Some(mut user) = self.users.get(id)? else {
            return Ok(None);
        };
        if !user.is_active {
            return Ok(None);
        }

        if let Some(first_name) = dto.first_name {
            user.first_name = first_name;
        }
        if let Some(last_name) = dto.last_name {
            user.last_name = last_name;
        }
        if let Some(phone_number) = dto.phone_number {
            user.phone_number = Some(phone_number);
        }
        if let Some(is_active) = dto.is_active {
            user.is_active = is_active;
        }
        user.last_updated_at = Utc::now();
        self.users.save(&user)?;

        Ok(Some(user.into()))
    }

    /// Deactivates the account; it disappears from listings and lookups but
    /// keeps its row.
    pub fn delete(&self, id: i64) -> HospitalResult<bool> {
        let Some(mut user) = self.users.get(id)? else {
            return Ok(false);
        };
        user.is_active = false;
        self.users.save(&user)?;
        Ok(true)
    }

    /// Verifies credentials and stamps the login time. `None` covers
    /// unknown usernames, deactivated accounts and bad passwords alike.
    pub fn login(&self, dto: LoginDto) -> HospitalResult<Option<UserResponse>> {
        tracing::info!(username = %dto.username, "login attempt");

        let Some(mut user) = self.users.find_by_username(&dto.username)? else {
            tracing::warn!(username = %dto.username, "login failed: user not found");
            return Ok(None);
        };
        if !user.is_active {
            tracing::warn!(username = %dto.username, "login failed: user is inactive");
            return Ok(None);
        }
        if !verify_password(&dto.password, &user.password_hash) {
            tracing::warn!(username = %dto.username, "login failed: invalid password");
            return Ok(None);
        }

        user.last_login_at = Some(Utc::now());
        self.users.save(&user)?;
        tracing::info!(username = %dto.username, "login succeeded");

        Ok(Some(user.into()))
    }

    pub fn doctors(&self) -> HospitalResult<Vec<UserResponse>> {
        self.list(Some(UserRole::Doctor))
    }

    pub fn nurses(&self) -> HospitalResult<Vec<UserResponse>> {
        self.list(Some(UserRole::Nurse))
    }
}

fn hash_password(password: &str) -> HospitalResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| HospitalError::PasswordHash(e.to_string()))
}

fn verify_password(password: &str, hash: &str) -> bool {
    PasswordHash::new(hash)
        .map(|parsed| {
            Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok()
        })
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::MemoryStore;

    fn service() -> UserService {
        UserService::new(Arc::new(MemoryStore::new()))
    }

    fn create_dto(username: &str, email: &str) -> CreateUserDto {
        CreateUserDto {
            username: username.into(),
            email: email.into(),
            password: "hunter22".into(),
            first_name: "Gregory".into(),
            last_name: "House".into(),
            role: UserRole::Doctor,
            phone_number: None,
        }
    }

    #[test]
    fn test_create_then_login_round_trip() {
        let service = service();
        let created = service
            .create(create_dto("gregory", "gregory@hospital.example"))
            .unwrap();
        assert!(created.last_login_at.is_none());

        let logged_in = service
            .login(LoginDto {
                username: "gregory".into(),
                password: "hunter22".into(),
            })
            .unwrap()
            .unwrap();
        assert_eq!(logged_in.id, created.id);
        assert!(logged_in.last_login_at.is_some());
    }

    #[test]
    fn test_login_rejects_wrong_password() {
        let service = service();
        service
            .create(create_dto("gregory", "gregory@hospital.example"))
            .unwrap();

        let outcome = service
            .login(LoginDto {
                username: "gregory".into(),
                password: "wrong".into(),
            })
            .unwrap();
        assert!(outcome.is_none());
    }

    #[test]
    fn test_duplicate_username_and_email_conflict() {
        let service = service();
        service
            .create(create_dto("gregory", "gregory@hospital.example"))
            .unwrap();

        assert!(matches!(
            service.create(create_dto("gregory", "other@hospital.example")),
            Err(HospitalError::Conflict(_))
        ));
        assert!(matches!(
            service.create(create_dto("other", "gregory@hospital.example")),
            Err(HospitalError::Conflict(_))
        ));
    }

    #[test]
    fn test_create_rejects_malformed_email() {
        let service = service();
        assert!(matches!(
            service.create(create_dto("gregory", "not-an-email")),
            Err(HospitalError::Validation(_))
        ));
    }

    #[test]
    fn test_deleted_user_disappears_from_lookups_and_login() {
        let service = service();
        let created = service
            .create(create_dto("gregory", "gregory@hospital.example"))
            .unwrap();

        assert!(service.delete(created.id).unwrap());
        assert!(service.get(created.id).unwrap().is_none());
        assert!(service.list(None).unwrap().is_empty());
        assert!(service
            .login(LoginDto {
                username: "gregory".into(),
                password: "hunter22".into(),
            })
            .unwrap()
            .is_none());
    }
}
