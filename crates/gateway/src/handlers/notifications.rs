//! Notification handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::AppState;
use grantflow_common::{auth::AuthContext, db::models::Notification, errors::Result};

/// Query parameters for listing notifications
#[derive(Debug, Default, Deserialize)]
pub struct ListNotificationsQuery {
    #[serde(default)]
    pub unread_only: bool,

    #[serde(default)]
    pub limit: Option<u64>,
}

#[derive(Serialize)]
pub struct NotificationResponse {
    pub id: Uuid,
    pub title: String,
    pub message: String,
    pub kind: String,
    pub link: Option<String>,
    pub is_read: bool,
    pub metadata: serde_json::Value,
    pub created_at: String,
}

impl From<Notification> for NotificationResponse {
    fn from(n: Notification) -> Self {
        Self {
            id: n.id,
            title: n.title,
            message: n.message,
            kind: n.kind,
            link: n.link,
            is_read: n.is_read,
            metadata: n.metadata,
            created_at: n.created_at.to_rfc3339(),
        }
    }
}

#[derive(Serialize)]
pub struct ListNotificationsResponse {
    pub notifications: Vec<NotificationResponse>,
    pub total: usize,
}

#[derive(Serialize)]
pub struct MarkAllReadResponse {
    pub updated: u64,
}

/// List the caller's notifications, newest first
pub async fn list_notifications(
    State(state): State<AppState>,
    auth: AuthContext,
    Query(query): Query<ListNotificationsQuery>,
) -> Result<Json<ListNotificationsResponse>> {
    let notifications = state
        .notifications
        .list(auth.user_id, query.unread_only, query.limit)
        .await?;

    Ok(Json(ListNotificationsResponse {
        total: notifications.len(),
        notifications: notifications
            .into_iter()
            .map(NotificationResponse::from)
            .collect(),
    }))
}

/// Mark one notification read
pub async fn mark_read(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<Uuid>,
) -> Result<StatusCode> {
    state.notifications.mark_read(auth.user_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Mark all of the caller's notifications read
pub async fn mark_all_read(
    State(state): State<AppState>,
    auth: AuthContext,
) -> Result<Json<MarkAllReadResponse>> {
    let updated = state.notifications.mark_all_read(auth.user_id).await?;
    Ok(Json(MarkAllReadResponse { updated }))
}

/// Delete one notification
pub async fn delete_notification(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<Uuid>,
) -> Result<StatusCode> {
    state.notifications.delete(auth.user_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
