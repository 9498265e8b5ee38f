//! Mentorship lifecycle handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::AppState;
use grantflow_common::{
    auth::AuthContext,
    db::models::{MatchStatus, MentorshipMatch, Role},
    errors::{AppError, Result},
};

/// Request to ask a mentor for mentorship
#[derive(Debug, Deserialize, Validate)]
pub struct RequestMentorshipRequest {
    pub mentor_id: Uuid,

    #[validate(length(max = 5000))]
    pub goals: Option<String>,
}

/// Admin request to pair a mentor and mentee directly
#[derive(Debug, Deserialize, Validate)]
pub struct CreateMatchRequest {
    pub mentor_id: Uuid,
    pub mentee_id: Uuid,
    pub program_id: Option<Uuid>,

    #[validate(length(max = 5000))]
    pub goals: Option<String>,
}

/// Query parameters for listing matches
#[derive(Debug, Default, Deserialize)]
pub struct ListMatchesQuery {
    /// Filter by status (pending, active, rejected, withdrawn)
    #[serde(default)]
    pub status: Option<String>,

    /// Admin-only: list matches for another profile
    #[serde(default)]
    pub for_user: Option<Uuid>,
}

#[derive(Serialize)]
pub struct MatchResponse {
    pub id: Uuid,
    pub mentor_id: Uuid,
    pub mentee_id: Uuid,
    pub status: String,
    pub goals: Option<String>,
    pub program_id: Option<Uuid>,
    pub start_date: String,
    pub created_at: String,
}

impl From<MentorshipMatch> for MatchResponse {
    fn from(m: MentorshipMatch) -> Self {
        Self {
            id: m.id,
            mentor_id: m.mentor_id,
            mentee_id: m.mentee_id,
            status: m.status,
            goals: m.goals,
            program_id: m.program_id,
            start_date: m.start_date.to_rfc3339(),
            created_at: m.created_at.to_rfc3339(),
        }
    }
}

#[derive(Serialize)]
pub struct ListMatchesResponse {
    pub matches: Vec<MatchResponse>,
    pub total: usize,
}

/// Mentee requests mentorship from a mentor (creates a pending match)
pub async fn request_mentorship(
    State(state): State<AppState>,
    auth: AuthContext,
    Json(request): Json<RequestMentorshipRequest>,
) -> Result<(StatusCode, Json<MatchResponse>)> {
    request.validate()?;
    auth.require_role(Role::Applicant)?;

    let created = state
        .mentorship
        .request_mentorship(auth.user_id, request.mentor_id, request.goals)
        .await?;

    tracing::info!(
        match_id = %created.id,
        mentee_id = %auth.user_id,
        mentor_id = %request.mentor_id,
        request_id = %auth.request_id,
        "Mentorship requested"
    );

    Ok((StatusCode::CREATED, Json(created.into())))
}

/// Admin pairs a mentor and mentee directly (creates an active match)
pub async fn create_match(
    State(state): State<AppState>,
    auth: AuthContext,
    Json(request): Json<CreateMatchRequest>,
) -> Result<(StatusCode, Json<MatchResponse>)> {
    request.validate()?;

    let created = state
        .mentorship
        .create_match_admin(
            &auth,
            request.mentor_id,
            request.mentee_id,
            request.program_id,
            request.goals,
        )
        .await?;

    tracing::info!(
        match_id = %created.id,
        admin_id = %auth.user_id,
        request_id = %auth.request_id,
        "Match created by admin"
    );

    Ok((StatusCode::CREATED, Json(created.into())))
}

/// List the caller's matches, scoped by role
pub async fn list_matches(
    State(state): State<AppState>,
    auth: AuthContext,
    Query(query): Query<ListMatchesQuery>,
) -> Result<Json<ListMatchesResponse>> {
    let status = query
        .status
        .as_deref()
        .map(|s| {
            MatchStatus::parse(s).ok_or_else(|| AppError::Validation {
                message: format!("Unknown match status: {}", s),
                field: Some("status".to_string()),
            })
        })
        .transpose()?;

    let matches = state
        .mentorship
        .list_matches(&auth, status, query.for_user)
        .await?;

    Ok(Json(ListMatchesResponse {
        total: matches.len(),
        matches: matches.into_iter().map(MatchResponse::from).collect(),
    }))
}

/// Mentor accepts a pending request
pub async fn accept_request(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(match_id): Path<Uuid>,
) -> Result<Json<MatchResponse>> {
    let updated = state.mentorship.accept_request(auth.user_id, match_id).await?;
    Ok(Json(updated.into()))
}

/// Mentor declines a pending request
pub async fn reject_request(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(match_id): Path<Uuid>,
) -> Result<Json<MatchResponse>> {
    let updated = state.mentorship.reject_request(auth.user_id, match_id).await?;
    Ok(Json(updated.into()))
}

/// Mentee withdraws a pending request
pub async fn withdraw_request(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(match_id): Path<Uuid>,
) -> Result<Json<MatchResponse>> {
    let updated = state.mentorship.withdraw(auth.user_id, match_id).await?;
    Ok(Json(updated.into()))
}
