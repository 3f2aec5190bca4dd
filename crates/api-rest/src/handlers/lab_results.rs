//! Lab-result endpoints.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::Json;
use serde::Deserialize;
use utoipa::IntoParams;

use api_shared::dto::{CreateLabResultDto, LabResultResponse};

use crate::{map_error, AppState};

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct LabResultListParams {
    pub patient_id: Option<i64>,
}

#[utoipa::path(
    get,
    path = "/api/labresults",
    params(LabResultListParams),
    responses(
        (status = 200, description = "Lab results, optionally scoped to a patient", body = Vec<LabResultResponse>)
    )
)]
pub async fn list_lab_results(
    State(state): State<AppState>,
    Query(params): Query<LabResultListParams>,
) -> Result<Json<Vec<LabResultResponse>>, (StatusCode, String)> {
    state
        .lab_results
        .list(params.patient_id)
        .map(Json)
        .map_err(map_error)
}

#[utoipa::path(
    get,
    path = "/api/labresults/{id}",
    responses(
        (status = 200, description = "Lab result found", body = LabResultResponse),
        (status = 404, description = "Lab result not found")
    )
)]
pub async fn get_lab_result(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<LabResultResponse>, (StatusCode, String)> {
    match state.lab_results.get(id).map_err(map_error)? {
        Some(lab_result) => Ok(Json(lab_result)),
        None => Err((StatusCode::NOT_FOUND, "Lab result not found".into())),
    }
}

#[utoipa::path(
    post,
    path = "/api/labresults",
    request_body = CreateLabResultDto,
    responses(
        (status = 201, description = "Lab test ordered", body = LabResultResponse),
        (status = 400, description = "Unknown patient or orderer")
    )
)]
pub async fn create_lab_result(
    State(state): State<AppState>,
    Json(dto): Json<CreateLabResultDto>,
) -> Result<(StatusCode, Json<LabResultResponse>), (StatusCode, String)> {
    let lab_result = state.lab_results.create(dto).map_err(map_error)?;
    Ok((StatusCode::CREATED, Json(lab_result)))
}

#[utoipa::path(
    get,
    path = "/api/labresults/critical",
    responses(
        (status = 200, description = "Lab results at Critical severity", body = Vec<LabResultResponse>)
    )
)]
pub async fn list_critical_lab_results(
    State(state): State<AppState>,
) -> Result<Json<Vec<LabResultResponse>>, (StatusCode, String)> {
    state.lab_results.list_critical().map(Json).map_err(map_error)
}
