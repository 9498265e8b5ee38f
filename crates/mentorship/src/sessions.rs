//! Session logging
//!
//! Mentors record completed sessions against a match. Session rows are
//! immutable once created; a best-effort notification and email tell the
//! mentee a session was logged.

use crate::mail;
use crate::notify::NotificationService;
use crate::templates;
use grantflow_common::db::models::{MentorshipSession, NotificationKind, SessionMode};
use grantflow_common::{metrics, AppError, Mailer, Repository, Result};
use std::sync::Arc;
use uuid::Uuid;

/// Parameters for logging a session
#[derive(Debug, Clone)]
pub struct NewSession {
    pub match_id: Uuid,
    pub session_date: chrono::DateTime<chrono::Utc>,
    pub duration_minutes: i32,
    pub mode: SessionMode,
    pub notes: Option<String>,
}

/// Session logging service
#[derive(Clone)]
pub struct SessionLog {
    repo: Repository,
    notifications: NotificationService,
    mailer: Arc<dyn Mailer>,
}

impl SessionLog {
    pub fn new(repo: Repository, notifications: NotificationService, mailer: Arc<dyn Mailer>) -> Self {
        Self {
            repo,
            notifications,
            mailer,
        }
    }

    /// Record a completed session. The caller must be the mentor on the
    /// match; the match's status is not required to be active.
    pub async fn log_session(&self, caller_id: Uuid, session: NewSession) -> Result<MentorshipSession> {
        validate_duration(session.duration_minutes)?;

        let record = self.repo.require_match(session.match_id).await?;

        if record.mentor_id != caller_id {
            return Err(AppError::Forbidden {
                message: "Only the mentor on this match may log sessions".to_string(),
            });
        }

        let created = self
            .repo
            .insert_session(
                session.match_id,
                session.session_date,
                session.duration_minutes,
                session.mode,
                session.notes,
            )
            .await?;

        metrics::record_session_logged(&created.mode);

        tracing::info!(
            session_id = %created.id,
            match_id = %record.id,
            duration_minutes = created.duration_minutes,
            mode = %created.mode,
            "Session logged"
        );

        // Best-effort: the session row is already committed
        if let Err(e) = self
            .notifications
            .create(
                record.mentee_id,
                "Session logged",
                format!(
                    "Your mentor logged a {}-minute session.",
                    created.duration_minutes
                ),
                NotificationKind::Info,
                Some(format!("/mentorship/matches/{}", record.id)),
                serde_json::json!({ "match_id": record.id, "session_id": created.id }),
            )
            .await
        {
            tracing::error!(
                session_id = %created.id,
                mentee_id = %record.mentee_id,
                error = %e,
                "Failed to create session notification"
            );
        }

        match (
            self.repo.require_profile(record.mentee_id).await,
            self.repo.require_profile(record.mentor_id).await,
        ) {
            (Ok(mentee), Ok(mentor)) => {
                let email = templates::session_logged_email(
                    &mentee.full_name,
                    &mentor.full_name,
                    created.duration_minutes,
                );
                mail::send_rendered(self.mailer.as_ref(), &mentee, email).await;
            }
            (mentee, mentor) => {
                let e = mentee.err().or(mentor.err());
                tracing::error!(
                    session_id = %created.id,
                    error = ?e,
                    "Skipping session email: failed to load profiles"
                );
            }
        }

        Ok(created)
    }

    /// List sessions for a match; visible to its mentor and mentee
    pub async fn list_sessions(&self, caller_id: Uuid, match_id: Uuid) -> Result<Vec<MentorshipSession>> {
        let record = self.repo.require_match(match_id).await?;

        if record.mentor_id != caller_id && record.mentee_id != caller_id {
            return Err(AppError::Forbidden {
                message: "Only the participants of this match may view its sessions".to_string(),
            });
        }

        self.repo.list_sessions_for_match(match_id).await
    }
}

/// Sessions must have a positive duration; checked before any database access
fn validate_duration(duration_minutes: i32) -> Result<()> {
    if duration_minutes <= 0 {
        return Err(AppError::Validation {
            message: "duration_minutes must be greater than zero".to_string(),
            field: Some("duration_minutes".to_string()),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duration_validation() {
        for bad in [0, -1, -60] {
            let err = validate_duration(bad).unwrap_err();
            assert!(matches!(err, AppError::Validation { .. }));
        }
        assert!(validate_duration(1).is_ok());
        assert!(validate_duration(60).is_ok());
    }

    #[test]
    fn test_session_mode_strings() {
        assert_eq!(String::from(SessionMode::Virtual), "virtual");
        assert_eq!(String::from(SessionMode::InPerson), "in-person");
        assert_eq!(String::from(SessionMode::Phone), "phone");
    }
}
