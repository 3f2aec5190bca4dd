//! Vital-sign endpoints. All of them require a staff role; recording is
//! restricted to the clinical roles.

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::Json;

use api_shared::dto::{CreateVitalSignDto, VitalSignResponse};
use api_shared::model::UserRole;

use crate::auth::authorize;
use crate::{map_error, AppState};

const ANY_STAFF: &[UserRole] = &[UserRole::Admin, UserRole::Doctor, UserRole::Nurse];
const CLINICAL_STAFF: &[UserRole] = &[UserRole::Doctor, UserRole::Nurse];

#[utoipa::path(
    get,
    path = "/api/vitalsigns",
    responses(
        (status = 200, description = "Readings at Critical severity", body = Vec<VitalSignResponse>),
        (status = 403, description = "Caller has no staff role")
    )
)]
/// The bare listing surfaces the critical readings; full history is
/// available per patient.
pub async fn list_vital_signs(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<VitalSignResponse>>, (StatusCode, String)> {
    authorize(&headers, ANY_STAFF)?;
    state.vital_signs.list_critical().map(Json).map_err(map_error)
}

#[utoipa::path(
    get,
    path = "/api/vitalsigns/{id}",
    responses(
        (status = 200, description = "Reading found", body = VitalSignResponse),
        (status = 403, description = "Caller has no staff role"),
        (status = 404, description = "Reading not found")
    )
)]
pub async fn get_vital_sign(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Result<Json<VitalSignResponse>, (StatusCode, String)> {
    authorize(&headers, ANY_STAFF)?;
    match state.vital_signs.get(id).map_err(map_error)? {
        Some(vital_sign) => Ok(Json(vital_sign)),
        None => Err((StatusCode::NOT_FOUND, "Vital sign not found".into())),
    }
}

#[utoipa::path(
    post,
    path = "/api/vitalsigns",
    request_body = CreateVitalSignDto,
    responses(
        (status = 201, description = "Reading recorded and classified", body = VitalSignResponse),
        (status = 400, description = "Unknown patient or recorder"),
        (status = 403, description = "Caller is not clinical staff")
    )
)]
pub async fn create_vital_sign(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(dto): Json<CreateVitalSignDto>,
) -> Result<(StatusCode, Json<VitalSignResponse>), (StatusCode, String)> {
    authorize(&headers, CLINICAL_STAFF)?;
    let vital_sign = state.vital_signs.create(dto).map_err(map_error)?;
    Ok((StatusCode::CREATED, Json(vital_sign)))
}

#[utoipa::path(
    get,
    path = "/api/vitalsigns/patient/{patient_id}",
    responses(
        (status = 200, description = "Patient's readings, newest first", body = Vec<VitalSignResponse>),
        (status = 403, description = "Caller has no staff role")
    )
)]
pub async fn list_patient_vital_signs(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(patient_id): Path<i64>,
) -> Result<Json<Vec<VitalSignResponse>>, (StatusCode, String)> {
    authorize(&headers, ANY_STAFF)?;
    state
        .vital_signs
        .list_by_patient(patient_id)
        .map(Json)
        .map_err(map_error)
}

#[utoipa::path(
    get,
    path = "/api/vitalsigns/critical",
    responses(
        (status = 200, description = "Readings at Critical severity", body = Vec<VitalSignResponse>),
        (status = 403, description = "Caller has no staff role")
    )
)]
pub async fn list_critical_vital_signs(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<VitalSignResponse>>, (StatusCode, String)> {
    authorize(&headers, ANY_STAFF)?;
    state.vital_signs.list_critical().map(Json).map_err(map_error)
}

#[utoipa::path(
    get,
    path = "/api/vitalsigns/latest/{patient_id}",
    responses(
        (status = 200, description = "Most recent reading", body = VitalSignResponse),
        (status = 403, description = "Caller has no staff role"),
        (status = 404, description = "Patient has no readings")
    )
)]
pub async fn latest_vital_signs(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(patient_id): Path<i64>,
) -> Result<Json<VitalSignResponse>, (StatusCode, String)> {
    authorize(&headers, ANY_STAFF)?;
    match state.vital_signs.latest(patient_id).map_err(map_error)? {
        Some(vital_sign) => Ok(Json(vital_sign)),
        None => Err((StatusCode::NOT_FOUND, "No vital signs recorded".into())),
    }
}
