//! # API REST
//!
//! REST API implementation for the hospital backend.
//!
//! Handles:
//! - HTTP endpoints with axum
//! - OpenAPI/Swagger documentation
//! - REST-specific concerns (JSON serialization, CORS, the role header)
//!
//! Domain logic lives in `hospital-core`; wire types in `api-shared`.

#![warn(rust_2018_idioms)]

pub mod auth;
pub mod handlers;

use std::sync::Arc;

use axum::http::StatusCode;
use axum::response::Json;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use api_shared::{dto, model, HealthRes, HealthService};
use hospital_core::error::HospitalError;
use hospital_core::services::{
    AppointmentService, LabResultService, MedicalRecordService, PatientService,
    PrescriptionService, ProgressNoteService, UserService, VitalSignService,
};
use hospital_core::{CriticalStateCoordinator, MemoryStore, NotificationDispatcher};

/// Application state shared across REST API handlers.
///
/// Holds one instance of every entity service, all wired over the same
/// backing store.
#[derive(Clone)]
pub struct AppState {
    pub patients: PatientService,
    pub users: UserService,
    pub vital_signs: VitalSignService,
    pub medical_records: MedicalRecordService,
    pub appointments: AppointmentService,
    pub prescriptions: PrescriptionService,
    pub lab_results: LabResultService,
    pub progress_notes: ProgressNoteService,
    pub notifications: Arc<NotificationDispatcher>,
}

impl AppState {
    /// Wires every service over one shared store.
    pub fn new(store: Arc<MemoryStore>) -> Self {
        let dispatcher = Arc::new(NotificationDispatcher::new(
            store.clone(),
            store.clone(),
            store.clone(),
        ));
        let coordinator = Arc::new(CriticalStateCoordinator::new(
            store.clone(),
            dispatcher.clone(),
        ));

        Self {
            patients: PatientService::new(store.clone(), coordinator.clone()),
            users: UserService::new(store.clone()),
            vital_signs: VitalSignService::new(
                store.clone(),
                store.clone(),
                store.clone(),
                coordinator.clone(),
            ),
            medical_records: MedicalRecordService::new(
                store.clone(),
                store.clone(),
                store.clone(),
                coordinator.clone(),
                dispatcher.clone(),
            ),
            appointments: AppointmentService::new(
                store.clone(),
                store.clone(),
                store.clone(),
                dispatcher.clone(),
            ),
            prescriptions: PrescriptionService::new(store.clone(), store.clone(), store.clone()),
            lab_results: LabResultService::new(store.clone(), store.clone(), store.clone()),
            progress_notes: ProgressNoteService::new(
                store.clone(),
                store.clone(),
                store,
                coordinator,
            ),
            notifications: dispatcher,
        }
    }
}

/// Maps a core error onto an HTTP response.
///
/// Validation and conflict problems carry their message to the caller;
/// anything else is logged and answered with an opaque 500.
pub(crate) fn map_error(error: HospitalError) -> (StatusCode, String) {
    match &error {
        HospitalError::Validation(message) => (StatusCode::BAD_REQUEST, message.clone()),
        HospitalError::Conflict(message) => (StatusCode::BAD_REQUEST, message.clone()),
        HospitalError::Store(_) | HospitalError::PasswordHash(_) => {
            tracing::error!(%error, "internal error");
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal error".into())
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health,
        handlers::patients::list_patients,
        handlers::patients::get_patient,
        handlers::patients::create_patient,
        handlers::patients::update_patient,
        handlers::patients::delete_patient,
        handlers::patients::list_critical_patients,
        handlers::patients::mark_patient_critical,
        handlers::patients::mark_patient_stable,
        handlers::users::list_users,
        handlers::users::get_user,
        handlers::users::create_user,
        handlers::users::update_user,
        handlers::users::delete_user,
        handlers::users::login,
        handlers::users::list_doctors,
        handlers::users::list_nurses,
        handlers::vital_signs::list_vital_signs,
        handlers::vital_signs::get_vital_sign,
        handlers::vital_signs::create_vital_sign,
        handlers::vital_signs::list_patient_vital_signs,
        handlers::vital_signs::list_critical_vital_signs,
        handlers::vital_signs::latest_vital_signs,
        handlers::medical_records::list_medical_records,
        handlers::medical_records::get_medical_record,
        handlers::medical_records::create_medical_record,
        handlers::medical_records::update_medical_record,
        handlers::medical_records::delete_medical_record,
        handlers::medical_records::list_patient_medical_records,
        handlers::medical_records::list_critical_medical_records,
        handlers::notifications::list_notifications,
        handlers::notifications::get_notification,
        handlers::notifications::create_notification,
        handlers::notifications::mark_notification_read,
        handlers::notifications::list_unread_notifications,
        handlers::notifications::list_critical_notifications,
        handlers::notifications::mark_all_notifications_read,
        handlers::notifications::delete_notification,
        handlers::appointments::list_appointments,
        handlers::appointments::get_appointment,
        handlers::appointments::create_appointment,
        handlers::appointments::update_appointment,
        handlers::prescriptions::list_prescriptions,
        handlers::prescriptions::get_prescription,
        handlers::prescriptions::create_prescription,
        handlers::lab_results::list_lab_results,
        handlers::lab_results::get_lab_result,
        handlers::lab_results::create_lab_result,
        handlers::lab_results::list_critical_lab_results,
        handlers::progress_notes::list_progress_notes,
        handlers::progress_notes::get_progress_note,
        handlers::progress_notes::create_progress_note,
    ),
    components(schemas(
        HealthRes,
        dto::CreatePatientDto,
        dto::UpdatePatientDto,
        dto::MarkCriticalDto,
        dto::PatientResponse,
        dto::CreateUserDto,
        dto::UpdateUserDto,
        dto::LoginDto,
        dto::UserResponse,
        dto::CreateVitalSignDto,
        dto::VitalSignResponse,
        dto::CreateMedicalRecordDto,
        dto::UpdateMedicalRecordDto,
        dto::MedicalRecordResponse,
        dto::CreateNotificationDto,
        dto::NotificationResponse,
        dto::CreateAppointmentDto,
        dto::UpdateAppointmentDto,
        dto::AppointmentResponse,
        dto::CreatePrescriptionDto,
        dto::PrescriptionResponse,
        dto::CreateLabResultDto,
        dto::LabResultResponse,
        dto::CreateProgressNoteDto,
        dto::ProgressNoteResponse,
        model::UserRole,
        model::PatientStatus,
        model::SeverityLevel,
        model::NotificationKind,
        model::NotificationPriority,
        model::AppointmentStatus,
        model::PrescriptionStatus,
        model::LabResultStatus,
        model::ProgressNoteKind,
    ))
)]
struct ApiDoc;

/// Builds the full application router: API routes, Swagger UI and CORS.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route(
            "/api/patients",
            get(handlers::patients::list_patients).post(handlers::patients::create_patient),
        )
        .route(
            "/api/patients/critical",
            get(handlers::patients::list_critical_patients),
        )
        .route(
            "/api/patients/:id",
            get(handlers::patients::get_patient)
                .put(handlers::patients::update_patient)
                .delete(handlers::patients::delete_patient),
        )
        .route(
            "/api/patients/:id/mark-critical",
            post(handlers::patients::mark_patient_critical),
        )
        .route(
            "/api/patients/:id/mark-stable",
            post(handlers::patients::mark_patient_stable),
        )
        .route(
            "/api/users",
            get(handlers::users::list_users).post(handlers::users::create_user),
        )
        .route("/api/users/login", post(handlers::users::login))
        .route("/api/users/doctors", get(handlers::users::list_doctors))
        .route("/api/users/nurses", get(handlers::users::list_nurses))
        .route(
            "/api/users/:id",
            get(handlers::users::get_user)
                .put(handlers::users::update_user)
                .delete(handlers::users::delete_user),
        )
        .route(
            "/api/vitalsigns",
            get(handlers::vital_signs::list_vital_signs)
                .post(handlers::vital_signs::create_vital_sign),
        )
        .route(
            "/api/vitalsigns/critical",
            get(handlers::vital_signs::list_critical_vital_signs),
        )
        .route(
            "/api/vitalsigns/patient/:patient_id",
            get(handlers::vital_signs::list_patient_vital_signs),
        )
        .route(
            "/api/vitalsigns/latest/:patient_id",
            get(handlers::vital_signs::latest_vital_signs),
        )
        .route(
            "/api/vitalsigns/:id",
            get(handlers::vital_signs::get_vital_sign),
        )
        .route(
            "/api/medicalrecords",
            get(handlers::medical_records::list_medical_records)
                .post(handlers::medical_records::create_medical_record),
        )
        .route(
            "/api/medicalrecords/critical",
            get(handlers::medical_records::list_critical_medical_records),
        )
        .route(
            "/api/medicalrecords/patient/:patient_id",
            get(handlers::medical_records::list_patient_medical_records),
        )
        .route(
            "/api/medicalrecords/:id",
            get(handlers::medical_records::get_medical_record)
                .put(handlers::medical_records::update_medical_record)
                .delete(handlers::medical_records::delete_medical_record),
        )
        .route(
            "/api/notifications",
            get(handlers::notifications::list_notifications)
                .post(handlers::notifications::create_notification),
        )
        .route(
            "/api/notifications/unread",
            get(handlers::notifications::list_unread_notifications),
        )
        .route(
            "/api/notifications/critical",
            get(handlers::notifications::list_critical_notifications),
        )
        .route(
            "/api/notifications/mark-all-read",
            post(handlers::notifications::mark_all_notifications_read),
        )
        .route(
            "/api/notifications/:id",
            get(handlers::notifications::get_notification)
                .delete(handlers::notifications::delete_notification),
        )
        .route(
            "/api/notifications/:id/mark-read",
            post(handlers::notifications::mark_notification_read),
        )
        .route(
            "/api/appointments",
            get(handlers::appointments::list_appointments)
                .post(handlers::appointments::create_appointment),
        )
        .route(
            "/api/appointments/:id",
            get(handlers::appointments::get_appointment)
                .put(handlers::appointments::update_appointment),
        )
        .route(
            "/api/prescriptions",
            get(handlers::prescriptions::list_prescriptions)
                .post(handlers::prescriptions::create_prescription),
        )
        .route(
            "/api/prescriptions/:id",
            get(handlers::prescriptions::get_prescription),
        )
        .route(
            "/api/labresults",
            get(handlers::lab_results::list_lab_results)
                .post(handlers::lab_results::create_lab_result),
        )
        .route(
            "/api/labresults/critical",
            get(handlers::lab_results::list_critical_lab_results),
        )
        .route(
            "/api/labresults/:id",
            get(handlers::lab_results::get_lab_result),
        )
        .route(
            "/api/progressnotes",
            get(handlers::progress_notes::list_progress_notes)
                .post(handlers::progress_notes::create_progress_note),
        )
        .route(
            "/api/progressnotes/:id",
            get(handlers::progress_notes::get_progress_note),
        )
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Health check response", body = HealthRes)
    )
)]
/// Health check endpoint for the REST API
///
/// Used for monitoring and load balancer health checks.
async fn health() -> Json<HealthRes> {
    Json(HealthService::check_health())
}
