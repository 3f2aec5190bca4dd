//! Appointment endpoints.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::Json;
use serde::Deserialize;
use utoipa::IntoParams;

use api_shared::dto::{AppointmentResponse, CreateAppointmentDto, UpdateAppointmentDto};

use crate::{map_error, AppState};

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentListParams {
    pub patient_id: Option<i64>,
}

#[utoipa::path(
    get,
    path = "/api/appointments",
    params(AppointmentListParams),
    responses(
        (status = 200, description = "Appointments, optionally scoped to a patient", body = Vec<AppointmentResponse>)
    )
)]
pub async fn list_appointments(
    State(state): State<AppState>,
    Query(params): Query<AppointmentListParams>,
) -> Result<Json<Vec<AppointmentResponse>>, (StatusCode, String)> {
    state
        .appointments
        .list(params.patient_id)
        .map(Json)
        .map_err(map_error)
}

#[utoipa::path(
    get,
    path = "/api/appointments/{id}",
    responses(
        (status = 200, description = "Appointment found", body = AppointmentResponse),
        (status = 404, description = "Appointment not found")
    )
)]
pub async fn get_appointment(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<AppointmentResponse>, (StatusCode, String)> {
    match state.appointments.get(id).map_err(map_error)? {
        Some(appointment) => Ok(Json(appointment)),
        None => Err((StatusCode::NOT_FOUND, "Appointment not found".into())),
    }
}

#[utoipa::path(
    post,
    path = "/api/appointments",
    request_body = CreateAppointmentDto,
    responses(
        (status = 201, description = "Appointment scheduled; the doctor gets a reminder", body = AppointmentResponse),
        (status = 400, description = "Unknown patient, or doctor id is not a Doctor")
    )
)]
pub async fn create_appointment(
    State(state): State<AppState>,
    Json(dto): Json<CreateAppointmentDto>,
) -> Result<(StatusCode, Json<AppointmentResponse>), (StatusCode, String)> {
    let appointment = state.appointments.create(dto).map_err(map_error)?;
    Ok((StatusCode::CREATED, Json(appointment)))
}

#[utoipa::path(
    put,
    path = "/api/appointments/{id}",
    request_body = UpdateAppointmentDto,
    responses(
        (status = 200, description = "Appointment updated", body = AppointmentResponse),
        (status = 404, description = "Appointment not found")
    )
)]
pub async fn update_appointment(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(dto): Json<UpdateAppointmentDto>,
) -> Result<Json<AppointmentResponse>, (StatusCode, String)> {
    match state.appointments.update(id, dto).map_err(map_error)? {
        Some(appointment) => Ok(Json(appointment)),
        None => Err((StatusCode::NOT_FOUND, "Appointment not found".into())),
    }
}
