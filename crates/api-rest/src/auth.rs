//! Role-header gate.
//!
//! The caller's role arrives in the `X-User-Role` header. This is a
//! placeholder for a real authentication layer, not a security model; it
//! exists so role-restricted routes have a seam to hang the check on. A
//! missing or unparseable header denies the request outright; there is
//! deliberately no default role.

use api_shared::model::UserRole;
use axum::http::{HeaderMap, StatusCode};

pub const ROLE_HEADER: &str = "X-User-Role";

/// The role the caller claims, if the header is present and well-formed.
pub fn role_from_headers(headers: &HeaderMap) -> Option<UserRole> {
    headers.get(ROLE_HEADER)?.to_str().ok()?.parse().ok()
}

/// Allows the request through only when the claimed role is in `allowed`.
pub fn authorize(
    headers: &HeaderMap,
    allowed: &[UserRole],
) -> Result<UserRole, (StatusCode, String)> {
    match role_from_headers(headers) {
        Some(role) if allowed.contains(&role) => Ok(role),
        _ => Err((StatusCode::FORBIDDEN, "Forbidden".into())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_missing_header_denies() {
        let headers = HeaderMap::new();
        assert!(authorize(&headers, &[UserRole::Admin]).is_err());
    }

    #[test]
    fn test_unknown_role_denies() {
        let mut headers = HeaderMap::new();
        headers.insert(ROLE_HEADER, HeaderValue::from_static("Janitor"));
        assert!(authorize(&headers, &[UserRole::Admin]).is_err());
    }

    #[test]
    fn test_listed_role_is_allowed() {
        let mut headers = HeaderMap::new();
        headers.insert(ROLE_HEADER, HeaderValue::from_static("Nurse"));
        let role = authorize(&headers, &[UserRole::Doctor, UserRole::Nurse]).unwrap();
        assert_eq!(role, UserRole::Nurse);
    }

    #[test]
    fn test_role_not_in_list_denies() {
        let mut headers = HeaderMap::new();
        headers.insert(ROLE_HEADER, HeaderValue::from_static("Nurse"));
        assert!(authorize(&headers, &[UserRole::Admin]).is_err());
    }
}
