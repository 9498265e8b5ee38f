//! Session logging handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::AppState;
use grantflow_common::{
    auth::AuthContext,
    db::models::{MentorshipSession, SessionMode},
    errors::{AppError, Result},
};
use grantflow_mentorship::sessions::NewSession;

/// Request to log a completed session
#[derive(Debug, Deserialize, Validate)]
pub struct LogSessionRequest {
    pub session_date: chrono::DateTime<chrono::Utc>,

    #[validate(range(min = 1, max = 1440))]
    pub duration_minutes: i32,

    /// One of: virtual, in-person, phone
    pub mode: String,

    #[validate(length(max = 10000))]
    pub notes: Option<String>,
}

#[derive(Serialize)]
pub struct SessionResponse {
    pub id: Uuid,
    pub match_id: Uuid,
    pub session_date: String,
    pub duration_minutes: i32,
    pub mode: String,
    pub notes: Option<String>,
    pub status: String,
    pub created_at: String,
}

impl From<MentorshipSession> for SessionResponse {
    fn from(s: MentorshipSession) -> Self {
        Self {
            id: s.id,
            match_id: s.match_id,
            session_date: s.session_date.to_rfc3339(),
            duration_minutes: s.duration_minutes,
            mode: s.mode,
            notes: s.notes,
            status: s.status,
            created_at: s.created_at.to_rfc3339(),
        }
    }
}

#[derive(Serialize)]
pub struct ListSessionsResponse {
    pub sessions: Vec<SessionResponse>,
    pub total: usize,
}

/// Log a completed session against a match (mentor only)
pub async fn log_session(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(match_id): Path<Uuid>,
    Json(request): Json<LogSessionRequest>,
) -> Result<(StatusCode, Json<SessionResponse>)> {
    request.validate()?;

    let mode = SessionMode::parse(&request.mode).ok_or_else(|| AppError::Validation {
        message: format!("Unknown session mode: {}", request.mode),
        field: Some("mode".to_string()),
    })?;

    let created = state
        .sessions
        .log_session(
            auth.user_id,
            NewSession {
                match_id,
                session_date: request.session_date,
                duration_minutes: request.duration_minutes,
                mode,
                notes: request.notes,
            },
        )
        .await?;

    Ok((StatusCode::CREATED, Json(created.into())))
}

/// List the sessions for a match (participants only)
pub async fn list_sessions(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(match_id): Path<Uuid>,
) -> Result<Json<ListSessionsResponse>> {
    let sessions = state.sessions.list_sessions(auth.user_id, match_id).await?;

    Ok(Json(ListSessionsResponse {
        total: sessions.len(),
        sessions: sessions.into_iter().map(SessionResponse::from).collect(),
    }))
}
