//! Notification endpoints.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::Json;
use serde::Deserialize;
use utoipa::IntoParams;

use api_shared::dto::{CreateNotificationDto, NotificationResponse};
use api_shared::model::NotificationPriority;
use hospital_core::store::NotificationFilter;

use crate::{map_error, AppState};

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct NotificationListParams {
    pub user_id: Option<i64>,
    pub is_read: Option<bool>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct UserScopedParams {
    pub user_id: Option<i64>,
}

#[utoipa::path(
    get,
    path = "/api/notifications",
    params(NotificationListParams),
    responses(
        (status = 200, description = "Matching notifications, newest first", body = Vec<NotificationResponse>)
    )
)]
pub async fn list_notifications(
    State(state): State<AppState>,
    Query(params): Query<NotificationListParams>,
) -> Result<Json<Vec<NotificationResponse>>, (StatusCode, String)> {
    let filter = NotificationFilter {
        user_id: params.user_id,
        is_read: params.is_read,
    };
    state
        .notifications
        .list_notifications(&filter)
        .map(Json)
        .map_err(map_error)
}

#[utoipa::path(
    get,
    path = "/api/notifications/{id}",
    responses(
        (status = 200, description = "Notification found", body = NotificationResponse),
        (status = 404, description = "Notification not found")
    )
)]
pub async fn get_notification(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<NotificationResponse>, (StatusCode, String)> {
    let notifications = state
        .notifications
        .list_notifications(&NotificationFilter::default())
        .map_err(map_error)?;
    match notifications.into_iter().find(|n| n.id == id) {
        Some(notification) => Ok(Json(notification)),
        None => Err((StatusCode::NOT_FOUND, "Notification not found".into())),
    }
}

#[utoipa::path(
    post,
    path = "/api/notifications",
    request_body = CreateNotificationDto,
    responses(
        (status = 201, description = "Notification created", body = NotificationResponse)
    )
)]
pub async fn create_notification(
    State(state): State<AppState>,
    Json(dto): Json<CreateNotificationDto>,
) -> Result<(StatusCode, Json<NotificationResponse>), (StatusCode, String)> {
    let notification = state.notifications.dispatch(dto).map_err(map_error)?;
    Ok((StatusCode::CREATED, Json(notification)))
}

#[utoipa::path(
    post,
    path = "/api/notifications/{id}/mark-read",
    responses(
        (status = 200, description = "Notification marked read; repeat calls keep the first read time", body = NotificationResponse),
        (status = 404, description = "Notification not found")
    )
)]
pub async fn mark_notification_read(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<NotificationResponse>, (StatusCode, String)> {
    match state.notifications.mark_read(id).map_err(map_error)? {
        Some(notification) => Ok(Json(notification)),
        None => Err((StatusCode::NOT_FOUND, "Notification not found".into())),
    }
}

#[utoipa::path(
    get,
    path = "/api/notifications/unread",
    params(UserScopedParams),
    responses(
        (status = 200, description = "Unread notifications, newest first", body = Vec<NotificationResponse>)
    )
)]
pub async fn list_unread_notifications(
    State(state): State<AppState>,
    Query(params): Query<UserScopedParams>,
) -> Result<Json<Vec<NotificationResponse>>, (StatusCode, String)> {
    let filter = NotificationFilter {
        user_id: params.user_id,
        is_read: Some(false),
    };
    state
        .notifications
        .list_notifications(&filter)
        .map(Json)
        .map_err(map_error)
}

#[utoipa::path(
    get,
    path = "/api/notifications/critical",
    params(UserScopedParams),
    responses(
        (status = 200, description = "Critical-priority notifications, newest first", body = Vec<NotificationResponse>)
    )
)]
pub async fn list_critical_notifications(
    State(state): State<AppState>,
    Query(params): Query<UserScopedParams>,
) -> Result<Json<Vec<NotificationResponse>>, (StatusCode, String)> {
    let filter = NotificationFilter {
        user_id: params.user_id,
        is_read: None,
    };
    let notifications = state
        .notifications
        .list_notifications(&filter)
        .map_err(map_error)?;
    let critical = notifications
        .into_iter()
        .filter(|n| n.priority == NotificationPriority::Critical)
        .collect();
    Ok(Json(critical))
}

#[utoipa::path(
    post,
    path = "/api/notifications/mark-all-read",
    params(UserScopedParams),
    responses(
        (status = 204, description = "All matching unread notifications marked read")
    )
)]
pub async fn mark_all_notifications_read(
    State(state): State<AppState>,
    Query(params): Query<UserScopedParams>,
) -> Result<StatusCode, (StatusCode, String)> {
    let filter = NotificationFilter {
        user_id: params.user_id,
        is_read: Some(false),
    };
    let unread = state
        .notifications
        .list_notifications(&filter)
        .map_err(map_error)?;
    for notification in unread {
        state
            .notifications
            .mark_read(notification.id)
            .map_err(map_error)?;
    }
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    delete,
    path = "/api/notifications/{id}",
    responses(
        (status = 204, description = "Notification retired"),
        (status = 404, description = "Notification not found")
    )
)]
/// The store keeps every notification; retiring one marks it read rather
/// than removing the row.
pub async fn delete_notification(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, (StatusCode, String)> {
    match state.notifications.mark_read(id).map_err(map_error)? {
        Some(_) => Ok(StatusCode::NO_CONTENT),
        None => Err((StatusCode::NOT_FOUND, "Notification not found".into())),
    }
}
