//! Mentor directory handlers

use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::AppState;
use grantflow_common::{auth::AuthContext, errors::Result};
use grantflow_mentorship::{filter_mentors, MentorSummary};

/// Query parameters for the directory listing
#[derive(Debug, Default, Deserialize)]
pub struct ListMentorsQuery {
    /// Optional substring filter over name, expertise, and bio
    #[serde(default)]
    pub q: Option<String>,
}

#[derive(Serialize)]
pub struct ListMentorsResponse {
    pub mentors: Vec<MentorSummary>,
    pub total: usize,
}

/// List available mentors, optionally filtered by a search query
pub async fn list_mentors(
    State(state): State<AppState>,
    _auth: AuthContext,
    Query(query): Query<ListMentorsQuery>,
) -> Result<Json<ListMentorsResponse>> {
    let mentors = state.directory.list_available().await?;

    let mentors = match query.q.as_deref() {
        Some(q) => filter_mentors(&mentors, q),
        None => mentors,
    };

    Ok(Json(ListMentorsResponse {
        total: mentors.len(),
        mentors,
    }))
}
