//! Mentor directory
//!
//! Read-only listing of mentors open to new mentees, plus the substring
//! filter applied on top of a fetched list.

use grantflow_common::db::models::AvailabilityStatus;
use grantflow_common::{MentorRow, Repository, Result};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Summary of a mentor as shown in the directory
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MentorSummary {
    /// Profile id of the mentor (the id used to request mentorship)
    pub user_id: Uuid,
    pub full_name: String,
    pub headline: Option<String>,
    pub bio: Option<String>,
    pub expertise_areas: Vec<String>,
    pub years_of_experience: i32,
    pub linkedin_url: Option<String>,
    pub availability_status: AvailabilityStatus,
}

impl From<MentorRow> for MentorSummary {
    fn from(row: MentorRow) -> Self {
        let availability = row.mentor.availability();
        let expertise_areas = row.mentor.expertise();
        Self {
            user_id: row.mentor.user_id,
            full_name: row.profile.full_name,
            headline: row.mentor.headline,
            bio: row.mentor.bio,
            expertise_areas,
            years_of_experience: row.mentor.years_of_experience,
            linkedin_url: row.mentor.linkedin_url,
            availability_status: availability,
        }
    }
}

/// Mentor directory service
#[derive(Clone)]
pub struct MentorDirectory {
    repo: Repository,
}

impl MentorDirectory {
    pub fn new(repo: Repository) -> Self {
        Self { repo }
    }

    /// List mentors currently open to new mentees. Mentors whose
    /// availability is `limited` or `unavailable` are never included.
    pub async fn list_available(&self) -> Result<Vec<MentorSummary>> {
        let rows = self.repo.list_available_mentors().await?;
        Ok(rows.into_iter().map(MentorSummary::from).collect())
    }
}

/// Case-insensitive substring filter over name, expertise, and bio.
/// An empty query matches every mentor.
pub fn filter_mentors(mentors: &[MentorSummary], query: &str) -> Vec<MentorSummary> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return mentors.to_vec();
    }

    mentors
        .iter()
        .filter(|m| {
            m.full_name.to_lowercase().contains(&query)
                || m.expertise_areas
                    .iter()
                    .any(|e| e.to_lowercase().contains(&query))
                || m.bio
                    .as_deref()
                    .is_some_and(|b| b.to_lowercase().contains(&query))
        })
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mentor(name: &str, expertise: &[&str], bio: Option<&str>) -> MentorSummary {
        MentorSummary {
            user_id: Uuid::new_v4(),
            full_name: name.to_string(),
            headline: None,
            bio: bio.map(String::from),
            expertise_areas: expertise.iter().map(|s| s.to_string()).collect(),
            years_of_experience: 5,
            linkedin_url: None,
            availability_status: AvailabilityStatus::Available,
        }
    }

    #[test]
    fn test_filter_by_name_case_insensitive() {
        let mentors = vec![
            mentor("Tunde Adebayo", &["fintech"], None),
            mentor("Grace Okoro", &["agritech"], None),
        ];
        let hits = filter_mentors(&mentors, "TUNDE");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].full_name, "Tunde Adebayo");
    }

    #[test]
    fn test_filter_by_expertise() {
        let mentors = vec![
            mentor("Tunde Adebayo", &["Fintech", "Payments"], None),
            mentor("Grace Okoro", &["Agritech"], None),
        ];
        let hits = filter_mentors(&mentors, "payments");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].full_name, "Tunde Adebayo");
    }

    #[test]
    fn test_filter_by_bio() {
        let mentors = vec![
            mentor("Tunde Adebayo", &[], Some("Scaled two startups in Lagos")),
            mentor("Grace Okoro", &[], Some("Background in supply chains")),
        ];
        let hits = filter_mentors(&mentors, "lagos");
        assert_eq!(hits.len(), 1);
    }

    #[test]
    fn test_empty_query_matches_all() {
        let mentors = vec![
            mentor("Tunde Adebayo", &[], None),
            mentor("Grace Okoro", &[], None),
        ];
        assert_eq!(filter_mentors(&mentors, "").len(), 2);
        assert_eq!(filter_mentors(&mentors, "   ").len(), 2);
    }

    #[test]
    fn test_no_match() {
        let mentors = vec![mentor("Tunde Adebayo", &["fintech"], None)];
        assert!(filter_mentors(&mentors, "healthtech").is_empty());
    }
}
