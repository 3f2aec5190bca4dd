//! Staff account endpoints.
//!
//! These routes are role-gated: account administration is Admin-only,
//! reads are open to any staff role, and login is unauthenticated.

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::Json;
use serde::Deserialize;
use utoipa::IntoParams;

use api_shared::dto::{CreateUserDto, LoginDto, UpdateUserDto, UserResponse};
use api_shared::model::UserRole;

use crate::auth::authorize;
use crate::{map_error, AppState};

const ADMIN_ONLY: &[UserRole] = &[UserRole::Admin];
const ANY_STAFF: &[UserRole] = &[UserRole::Admin, UserRole::Doctor, UserRole::Nurse];

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct UserListParams {
    pub role: Option<UserRole>,
}

#[utoipa::path(
    get,
    path = "/api/users",
    params(UserListParams),
    responses(
        (status = 200, description = "Active users", body = Vec<UserResponse>),
        (status = 403, description = "Caller is not an Admin")
    )
)]
pub async fn list_users(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<UserListParams>,
) -> Result<Json<Vec<UserResponse>>, (StatusCode, String)> {
    authorize(&headers, ADMIN_ONLY)?;
    state.users.list(params.role).map(Json).map_err(map_error)
}

#[utoipa::path(
    get,
    path = "/api/users/{id}",
    responses(
        (status = 200, description = "User found", body = UserResponse),
        (status = 403, description = "Caller has no staff role"),
        (status = 404, description = "User not found or inactive")
    )
)]
pub async fn get_user(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Result<Json<UserResponse>, (StatusCode, String)> {
    authorize(&headers, ANY_STAFF)?;
    match state.users.get(id).map_err(map_error)? {
        Some(user) => Ok(Json(user)),
        None => Err((StatusCode::NOT_FOUND, "User not found".into())),
    }
}

#[utoipa::path(
    post,
    path = "/api/users",
    request_body = CreateUserDto,
    responses(
        (status = 201, description = "User created", body = UserResponse),
        (status = 400, description = "Invalid input or duplicate username/email"),
        (status = 403, description = "Caller is not an Admin")
    )
)]
pub async fn create_user(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(dto): Json<CreateUserDto>,
) -> Result<(StatusCode, Json<UserResponse>), (StatusCode, String)> {
    authorize(&headers, ADMIN_ONLY)?;
    let user = state.users.create(dto).map_err(map_error)?;
    Ok((StatusCode::CREATED, Json(user)))
}

#[utoipa::path(
    put,
    path = "/api/users/{id}",
    request_body = UpdateUserDto,
    responses(
        (status = 204, description = "User updated"),
        (status = 403, description = "Caller is not an Admin"),
        (status = 404, description = "User not found or inactive")
    )
)]
pub async fn update_user(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<i64>,
    Json(dto): Json<UpdateUserDto>,
) -> Result<StatusCode, (StatusCode, String)> {
    authorize(&headers, ADMIN_ONLY)?;
    match state.users.update(id, dto).map_err(map_error)? {
        Some(_) => Ok(StatusCode::NO_CONTENT),
        None => Err((StatusCode::NOT_FOUND, "User not found".into())),
    }
}

#[utoipa::path(
    delete,
    path = "/api/users/{id}",
    responses(
        (status = 204, description = "User deactivated"),
        (status = 403, description = "Caller is not an Admin"),
        (status = 404, description = "User not found")
    )
)]
pub async fn delete_user(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Result<StatusCode, (StatusCode, String)> {
    authorize(&headers, ADMIN_ONLY)?;
    if state.users.delete(id).map_err(map_error)? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err((StatusCode::NOT_FOUND, "User not found".into()))
    }
}

#[utoipa::path(
    post,
    path = "/api/users/login",
    request_body = LoginDto,
    responses(
        (status = 200, description = "Login succeeded", body = UserResponse),
        (status = 401, description = "Invalid username or password")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    Json(dto): Json<LoginDto>,
) -> Result<Json<UserResponse>, (StatusCode, String)> {
    match state.users.login(dto).map_err(map_error)? {
        Some(user) => Ok(Json(user)),
        None => Err((
            StatusCode::UNAUTHORIZED,
            "Invalid username or password".into(),
        )),
    }
}

#[utoipa::path(
    get,
    path = "/api/users/doctors",
    responses(
        (status = 200, description = "Active doctors", body = Vec<UserResponse>),
        (status = 403, description = "Caller has no staff role")
    )
)]
pub async fn list_doctors(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<UserResponse>>, (StatusCode, String)> {
    authorize(&headers, ANY_STAFF)?;
    state.users.doctors().map(Json).map_err(map_error)
}

#[utoipa::path(
    get,
    path = "/api/users/nurses",
    responses(
        (status = 200, description = "Active nurses", body = Vec<UserResponse>),
        (status = 403, description = "Caller has no staff role")
    )
)]
pub async fn list_nurses(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<UserResponse>>, (StatusCode, String)> {
    authorize(&headers, ANY_STAFF)?;
    state.users.nurses().map(Json).map_err(map_error)
}
