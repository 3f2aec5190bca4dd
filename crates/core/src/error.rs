/// Errors surfaced by core services and stores.
///
/// "Not found" and "nothing to change" are deliberately NOT here: state
/// transitions report them through [`crate::Transition`] and lookups through
/// `Option`, so callers can tell "already critical" from "does not exist"
/// without matching on error variants.
#[derive(Debug, thiserror::Error)]
pub enum HospitalError {
    #[error("invalid input: {0}")]
    Validation(String),
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("storage failure: {0}")]
    Store(String),
    #[error("failed to hash password: {0}")]
    PasswordHash(String),
}

pub type HospitalResult<T> = std::result::Result<T, HospitalError>;
