//! Notification service
//!
//! Creates, lists, marks-read, and deletes per-user notification records.
//! Every operation is scoped to the owning user: the mutating queries carry
//! the user_id filter, and cross-user access fails with Forbidden.

use grantflow_common::db::models::{Notification, NotificationKind};
use grantflow_common::{metrics, AppError, Repository, Result, DEFAULT_NOTIFICATION_LIMIT};
use uuid::Uuid;

#[derive(Clone)]
pub struct NotificationService {
    repo: Repository,
}

impl NotificationService {
    pub fn new(repo: Repository) -> Self {
        Self { repo }
    }

    /// Create a notification for a recipient
    pub async fn create(
        &self,
        user_id: Uuid,
        title: impl Into<String>,
        message: impl Into<String>,
        kind: NotificationKind,
        link: Option<String>,
        metadata: serde_json::Value,
    ) -> Result<Notification> {
        let notification = self
            .repo
            .insert_notification(user_id, title.into(), message.into(), kind, link, metadata)
            .await?;

        metrics::record_notification(&notification.kind);

        tracing::debug!(
            notification_id = %notification.id,
            user_id = %user_id,
            kind = %notification.kind,
            "Notification created"
        );

        Ok(notification)
    }

    /// List the caller's notifications, newest first
    pub async fn list(
        &self,
        user_id: Uuid,
        unread_only: bool,
        limit: Option<u64>,
    ) -> Result<Vec<Notification>> {
        let limit = limit.unwrap_or(DEFAULT_NOTIFICATION_LIMIT);
        self.repo.list_notifications(user_id, unread_only, limit).await
    }

    /// Mark one of the caller's notifications read
    pub async fn mark_read(&self, caller_id: Uuid, id: Uuid) -> Result<()> {
        let affected = self.repo.mark_notification_read(id, caller_id).await?;
        if affected > 0 {
            return Ok(());
        }

        // The filtered update touched nothing: distinguish missing from
        // owned-by-someone-else for the error message.
        match self.repo.find_notification_by_id(id).await? {
            Some(_) => Err(AppError::Forbidden {
                message: "Notification belongs to another user".to_string(),
            }),
            None => Err(AppError::NotificationNotFound { id: id.to_string() }),
        }
    }

    /// Mark all of the caller's notifications read; returns how many changed
    pub async fn mark_all_read(&self, caller_id: Uuid) -> Result<u64> {
        let affected = self.repo.mark_all_notifications_read(caller_id).await?;
        tracing::debug!(user_id = %caller_id, affected, "Notifications marked read");
        Ok(affected)
    }

    /// Delete one of the caller's notifications
    pub async fn delete(&self, caller_id: Uuid, id: Uuid) -> Result<()> {
        let deleted = self.repo.delete_notification(id, caller_id).await?;
        if deleted {
            return Ok(());
        }

        match self.repo.find_notification_by_id(id).await? {
            Some(_) => Err(AppError::Forbidden {
                message: "Notification belongs to another user".to_string(),
            }),
            None => Err(AppError::NotificationNotFound { id: id.to_string() }),
        }
    }
}
