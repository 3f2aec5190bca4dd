//! Prescription endpoints.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::Json;
use serde::Deserialize;
use utoipa::IntoParams;

use api_shared::dto::{CreatePrescriptionDto, PrescriptionResponse};

use crate::{map_error, AppState};

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct PrescriptionListParams {
    pub patient_id: Option<i64>,
}

#[utoipa::path(
    get,
    path = "/api/prescriptions",
    params(PrescriptionListParams),
    responses(
        (status = 200, description = "Prescriptions, optionally scoped to a patient", body = Vec<PrescriptionResponse>)
    )
)]
pub async fn list_prescriptions(
    State(state): State<AppState>,
    Query(params): Query<PrescriptionListParams>,
) -> Result<Json<Vec<PrescriptionResponse>>, (StatusCode, String)> {
    state
        .prescriptions
        .list(params.patient_id)
        .map(Json)
        .map_err(map_error)
}

#[utoipa::path(
    get,
    path = "/api/prescriptions/{id}",
    responses(
        (status = 200, description = "Prescription found", body = PrescriptionResponse),
        (status = 404, description = "Prescription not found")
    )
)]
pub async fn get_prescription(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<PrescriptionResponse>, (StatusCode, String)> {
    match state.prescriptions.get(id).map_err(map_error)? {
        Some(prescription) => Ok(Json(prescription)),
        None => Err((StatusCode::NOT_FOUND, "Prescription not found".into())),
    }
}

#[utoipa::path(
    post,
    path = "/api/prescriptions",
    request_body = CreatePrescriptionDto,
    responses(
        (status = 201, description = "Prescription created", body = PrescriptionResponse),
        (status = 400, description = "Unknown patient or prescriber")
    )
)]
pub async fn create_prescription(
    State(state): State<AppState>,
    Json(dto): Json<CreatePrescriptionDto>,
) -> Result<(StatusCode, Json<PrescriptionResponse>), (StatusCode, String)> {
    let prescription = state.prescriptions.create(dto).map_err(map_error)?;
    Ok((StatusCode::CREATED, Json(prescription)))
}
