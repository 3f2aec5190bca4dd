//! Patient endpoints.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::Json;
use serde::Deserialize;
use utoipa::IntoParams;

use api_shared::dto::{CreatePatientDto, MarkCriticalDto, PatientResponse, UpdatePatientDto};
use api_shared::model::PatientStatus;
use hospital_core::services::PatientQuery;
use hospital_core::Transition;
use hospital_types::NonEmptyText;

use crate::{map_error, AppState};

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct PatientListParams {
    pub is_critical: Option<bool>,
    pub status: Option<PatientStatus>,
    pub search: Option<String>,
}

#[utoipa::path(
    get,
    path = "/api/patients",
    params(PatientListParams),
    responses(
        (status = 200, description = "List of patients", body = Vec<PatientResponse>),
        (status = 500, description = "Internal server error")
    )
)]
/// List patients, optionally filtered by critical flag, status or a search
/// term (search takes precedence).
pub async fn list_patients(
    State(state): State<AppState>,
    Query(params): Query<PatientListParams>,
) -> Result<Json<Vec<PatientResponse>>, (StatusCode, String)> {
    let query = PatientQuery {
        is_critical: params.is_critical,
        status: params.status,
        search: params.search,
    };
    state.patients.list(&query).map(Json).map_err(map_error)
}

#[utoipa::path(
    get,
    path = "/api/patients/{id}",
    responses(
        (status = 200, description = "Patient found", body = PatientResponse),
        (status = 404, description = "Patient not found")
    )
)]
pub async fn get_patient(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<PatientResponse>, (StatusCode, String)> {
    match state.patients.get(id).map_err(map_error)? {
        Some(patient) => Ok(Json(patient)),
        None => Err((StatusCode::NOT_FOUND, "Patient not found".into())),
    }
}

#[utoipa::path(
    post,
    path = "/api/patients",
    request_body = CreatePatientDto,
    responses(
        (status = 201, description = "Patient created", body = PatientResponse),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn create_patient(
    State(state): State<AppState>,
    Json(dto): Json<CreatePatientDto>,
) -> Result<(StatusCode, Json<PatientResponse>), (StatusCode, String)> {
    let patient = state.patients.create(dto).map_err(map_error)?;
    Ok((StatusCode::CREATED, Json(patient)))
}

#[utoipa::path(
    put,
    path = "/api/patients/{id}",
    request_body = UpdatePatientDto,
    responses(
        (status = 204, description = "Patient updated"),
        (status = 404, description = "Patient not found")
    )
)]
/// Partial update. Supplying `isCritical` routes the flag change through
/// the coordinator's alerting path as a side effect of the update.
pub async fn update_patient(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(dto): Json<UpdatePatientDto>,
) -> Result<StatusCode, (StatusCode, String)> {
    match state.patients.update(id, dto).map_err(map_error)? {
        Some(_) => Ok(StatusCode::NO_CONTENT),
        None => Err((StatusCode::NOT_FOUND, "Patient not found".into())),
    }
}

#[utoipa::path(
    delete,
    path = "/api/patients/{id}",
    responses(
        (status = 204, description = "Patient deactivated"),
        (status = 404, description = "Patient not found")
    )
)]
pub async fn delete_patient(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, (StatusCode, String)> {
    if state.patients.delete(id).map_err(map_error)? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err((StatusCode::NOT_FOUND, "Patient not found".into()))
    }
}

#[utoipa::path(
    get,
    path = "/api/patients/critical",
    responses(
        (status = 200, description = "Patients currently flagged critical", body = Vec<PatientResponse>)
    )
)]
pub async fn list_critical_patients(
    State(state): State<AppState>,
) -> Result<Json<Vec<PatientResponse>>, (StatusCode, String)> {
    state.patients.list_critical().map(Json).map_err(map_error)
}

#[utoipa::path(
    post,
    path = "/api/patients/{id}/mark-critical",
    request_body = MarkCriticalDto,
    responses(
        (status = 204, description = "Patient marked critical and staff alerted"),
        (status = 400, description = "Blank reason"),
        (status = 404, description = "Patient not found"),
        (status = 409, description = "Patient is already critical")
    )
)]
pub async fn mark_patient_critical(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(dto): Json<MarkCriticalDto>,
) -> Result<StatusCode, (StatusCode, String)> {
    let reason = NonEmptyText::new(&dto.reason)
        .map_err(|_| (StatusCode::BAD_REQUEST, "reason cannot be empty".to_string()))?;

    match state
        .patients
        .mark_critical(id, reason.as_str())
        .map_err(map_error)?
    {
        Transition::Applied => Ok(StatusCode::NO_CONTENT),
        Transition::NoChange => Err((StatusCode::CONFLICT, "Patient is already critical".into())),
        Transition::NotFound => Err((StatusCode::NOT_FOUND, "Patient not found".into())),
    }
}

#[utoipa::path(
    post,
    path = "/api/patients/{id}/mark-stable",
    responses(
        (status = 204, description = "Patient marked stable"),
        (status = 404, description = "Patient not found"),
        (status = 409, description = "Patient is already stable")
    )
)]
pub async fn mark_patient_stable(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, (StatusCode, String)> {
    match state.patients.mark_stable(id).map_err(map_error)? {
        Transition::Applied => Ok(StatusCode::NO_CONTENT),
        Transition::NoChange => Err((StatusCode::CONFLICT, "Patient is already stable".into())),
        Transition::NotFound => Err((StatusCode::NOT_FOUND, "Patient not found".into())),
    }
}
