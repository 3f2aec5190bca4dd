//! Medical-record endpoints.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::Json;
use serde::Deserialize;
use utoipa::IntoParams;

use api_shared::dto::{CreateMedicalRecordDto, MedicalRecordResponse, UpdateMedicalRecordDto};
use hospital_core::store::MedicalRecordFilter;

use crate::{map_error, AppState};

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct MedicalRecordListParams {
    pub patient_id: Option<i64>,
    pub doctor_id: Option<i64>,
    pub is_critical: Option<bool>,
}

#[utoipa::path(
    get,
    path = "/api/medicalrecords",
    params(MedicalRecordListParams),
    responses(
        (status = 200, description = "Matching records, newest first", body = Vec<MedicalRecordResponse>)
    )
)]
pub async fn list_medical_records(
    State(state): State<AppState>,
    Query(params): Query<MedicalRecordListParams>,
) -> Result<Json<Vec<MedicalRecordResponse>>, (StatusCode, String)> {
    let filter = MedicalRecordFilter {
        patient_id: params.patient_id,
        doctor_id: params.doctor_id,
        is_critical: params.is_critical,
    };
    state
        .medical_records
        .query(&filter)
        .map(Json)
        .map_err(map_error)
}

#[utoipa::path(
    get,
    path = "/api/medicalrecords/{id}",
    responses(
        (status = 200, description = "Record found", body = MedicalRecordResponse),
        (status = 404, description = "Record not found")
    )
)]
pub async fn get_medical_record(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<MedicalRecordResponse>, (StatusCode, String)> {
    match state.medical_records.get(id).map_err(map_error)? {
        Some(record) => Ok(Json(record)),
        None => Err((StatusCode::NOT_FOUND, "Medical record not found".into())),
    }
}

#[utoipa::path(
    post,
    path = "/api/medicalrecords",
    request_body = CreateMedicalRecordDto,
    responses(
        (status = 201, description = "Record created", body = MedicalRecordResponse),
        (status = 400, description = "Unknown patient, or doctor id is not a Doctor")
    )
)]
/// Create a record. A critical flag escalates the patient and alerts all
/// active staff; every creation also announces itself to the ward.
pub async fn create_medical_record(
    State(state): State<AppState>,
    Json(dto): Json<CreateMedicalRecordDto>,
) -> Result<(StatusCode, Json<MedicalRecordResponse>), (StatusCode, String)> {
    let record = state.medical_records.create(dto).map_err(map_error)?;
    Ok((StatusCode::CREATED, Json(record)))
}

#[utoipa::path(
    put,
    path = "/api/medicalrecords/{id}",
    request_body = UpdateMedicalRecordDto,
    responses(
        (status = 204, description = "Record updated; patient flag settled or escalated as needed"),
        (status = 404, description = "Record not found")
    )
)]
pub async fn update_medical_record(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(dto): Json<UpdateMedicalRecordDto>,
) -> Result<StatusCode, (StatusCode, String)> {
    match state.medical_records.update(id, dto).map_err(map_error)? {
        Some(_) => Ok(StatusCode::NO_CONTENT),
        None => Err((StatusCode::NOT_FOUND, "Medical record not found".into())),
    }
}

#[utoipa::path(
    delete,
    path = "/api/medicalrecords/{id}",
    responses(
        (status = 204, description = "Record deleted"),
        (status = 404, description = "Record not found")
    )
)]
pub async fn delete_medical_record(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, (StatusCode, String)> {
    if state.medical_records.delete(id).map_err(map_error)? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err((StatusCode::NOT_FOUND, "Medical record not found".into()))
    }
}

#[utoipa::path(
    get,
    path = "/api/medicalrecords/patient/{patient_id}",
    responses(
        (status = 200, description = "Patient's records, newest first", body = Vec<MedicalRecordResponse>)
    )
)]
pub async fn list_patient_medical_records(
    State(state): State<AppState>,
    Path(patient_id): Path<i64>,
) -> Result<Json<Vec<MedicalRecordResponse>>, (StatusCode, String)> {
    state
        .medical_records
        .list_by_patient(patient_id)
        .map(Json)
        .map_err(map_error)
}

#[utoipa::path(
    get,
    path = "/api/medicalrecords/critical",
    responses(
        (status = 200, description = "Records flagged critical, newest first", body = Vec<MedicalRecordResponse>)
    )
)]
pub async fn list_critical_medical_records(
    State(state): State<AppState>,
) -> Result<Json<Vec<MedicalRecordResponse>>, (StatusCode, String)> {
    state
        .medical_records
        .list_critical()
        .map(Json)
        .map_err(map_error)
}
