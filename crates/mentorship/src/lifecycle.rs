//! Mentorship match lifecycle
//!
//! A match is created `pending` by a mentee's request (or `active` directly
//! by an admin), and the mentor moves it to `active` or `rejected`. Each
//! decision fires a notification and an email to the mentee as best-effort
//! side effects: their failure is logged and never rolls back the
//! transition.

use crate::mail;
use crate::notify::NotificationService;
use crate::templates;
use grantflow_common::auth::AuthContext;
use grantflow_common::db::models::{
    MatchStatus, MentorshipMatch, NotificationKind, Profile, Role,
};
use grantflow_common::{metrics, AppError, Mailer, Repository, Result};
use std::sync::Arc;
use uuid::Uuid;

/// A mentor's decision on a pending request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchDecision {
    Accept,
    Reject,
}

impl MatchDecision {
    /// The status a match ends up in after this decision
    pub fn target_status(&self) -> MatchStatus {
        match self {
            MatchDecision::Accept => MatchStatus::Active,
            MatchDecision::Reject => MatchStatus::Rejected,
        }
    }

    /// Apply the decision to the current status. Only `pending` matches can
    /// be decided; a second decision on the same match is a conflict, not a
    /// silent overwrite.
    pub fn apply(&self, current: MatchStatus) -> Result<MatchStatus> {
        if current != MatchStatus::Pending {
            return Err(AppError::InvalidTransition {
                current: String::from(current),
                expected: String::from(MatchStatus::Pending),
            });
        }
        Ok(self.target_status())
    }
}

/// Parameters for creating a match, shared by both entry points
struct NewMatch {
    mentor_id: Uuid,
    mentee_id: Uuid,
    goals: Option<String>,
    program_id: Option<Uuid>,
    initial_status: MatchStatus,
}

/// Mentorship lifecycle service
#[derive(Clone)]
pub struct MentorshipService {
    repo: Repository,
    notifications: NotificationService,
    mailer: Arc<dyn Mailer>,
}

impl MentorshipService {
    pub fn new(repo: Repository, notifications: NotificationService, mailer: Arc<dyn Mailer>) -> Self {
        Self {
            repo,
            notifications,
            mailer,
        }
    }

    // ========================================================================
    // Creation
    // ========================================================================

    /// Applicant-initiated request: creates a `pending` match from the
    /// caller to the mentor. No side effects fire at creation time.
    pub async fn request_mentorship(
        &self,
        mentee_id: Uuid,
        mentor_id: Uuid,
        goals: Option<String>,
    ) -> Result<MentorshipMatch> {
        self.create_match(NewMatch {
            mentor_id,
            mentee_id,
            goals,
            program_id: None,
            initial_status: MatchStatus::Pending,
        })
        .await
    }

    /// Admin-initiated match: creates the pairing directly `active`,
    /// skipping the mentor's decision.
    pub async fn create_match_admin(
        &self,
        caller: &AuthContext,
        mentor_id: Uuid,
        mentee_id: Uuid,
        program_id: Option<Uuid>,
        goals: Option<String>,
    ) -> Result<MentorshipMatch> {
        caller.require_admin()?;

        self.create_match(NewMatch {
            mentor_id,
            mentee_id,
            goals,
            program_id,
            initial_status: MatchStatus::Active,
        })
        .await
    }

    /// Single creation path for both entry points: both resolve the mentor
    /// and mentee and both perform the duplicate-active-match check.
    async fn create_match(&self, new_match: NewMatch) -> Result<MentorshipMatch> {
        // The mentor must have a mentor profile, not just a profile row
        self.repo
            .find_mentor_profile_by_user(new_match.mentor_id)
            .await?
            .ok_or_else(|| AppError::MentorNotFound {
                id: new_match.mentor_id.to_string(),
            })?;

        self.repo.require_profile(new_match.mentee_id).await?;

        // Best-effort uniqueness: a concurrent insert between this check and
        // ours can still produce a duplicate (no database constraint backs it)
        if self
            .repo
            .find_active_match(new_match.mentor_id, new_match.mentee_id)
            .await?
            .is_some()
        {
            return Err(AppError::DuplicateActiveMatch {
                mentor_id: new_match.mentor_id.to_string(),
                mentee_id: new_match.mentee_id.to_string(),
            });
        }

        let created = self
            .repo
            .insert_match(
                new_match.mentor_id,
                new_match.mentee_id,
                new_match.goals,
                new_match.program_id,
                new_match.initial_status,
            )
            .await?;

        metrics::record_match_created(&created.status);

        tracing::info!(
            match_id = %created.id,
            mentor_id = %created.mentor_id,
            mentee_id = %created.mentee_id,
            status = %created.status,
            "Mentorship match created"
        );

        Ok(created)
    }

    // ========================================================================
    // Transitions
    // ========================================================================

    /// Mentor accepts a pending request
    pub async fn accept_request(&self, caller_id: Uuid, match_id: Uuid) -> Result<MentorshipMatch> {
        self.decide(caller_id, match_id, MatchDecision::Accept).await
    }

    /// Mentor declines a pending request
    pub async fn reject_request(&self, caller_id: Uuid, match_id: Uuid) -> Result<MentorshipMatch> {
        self.decide(caller_id, match_id, MatchDecision::Reject).await
    }

    async fn decide(
        &self,
        caller_id: Uuid,
        match_id: Uuid,
        decision: MatchDecision,
    ) -> Result<MentorshipMatch> {
        let record = self.repo.require_match(match_id).await?;

        // A mentor may only transition their own matches
        if record.mentor_id != caller_id {
            return Err(AppError::Forbidden {
                message: "Only the mentor on this match may decide it".to_string(),
            });
        }

        let current = record.match_status();
        let target = decision.apply(current)?;

        // Status filter in the update catches the race where the match was
        // decided between our read and this write
        let affected = self
            .repo
            .update_match_status(match_id, MatchStatus::Pending, target)
            .await?;
        if affected == 0 {
            // Re-read so the error reports where the race actually landed
            let fresh = self.repo.require_match(match_id).await?;
            return Err(AppError::InvalidTransition {
                current: fresh.status,
                expected: String::from(MatchStatus::Pending),
            });
        }

        metrics::record_transition(&record.status, &String::from(target));

        tracing::info!(
            match_id = %match_id,
            mentor_id = %caller_id,
            from = %record.status,
            to = %String::from(target),
            "Match status transitioned"
        );

        let mut updated = record;
        updated.status = String::from(target);

        // Best-effort side effects; the transition above already succeeded
        self.dispatch_decision_side_effects(&updated, decision).await;

        Ok(updated)
    }

    /// Mentee withdraws a pending request (terminal, no side effects)
    pub async fn withdraw(&self, caller_id: Uuid, match_id: Uuid) -> Result<MentorshipMatch> {
        let record = self.repo.require_match(match_id).await?;

        if record.mentee_id != caller_id {
            return Err(AppError::Forbidden {
                message: "Only the mentee on this match may withdraw it".to_string(),
            });
        }

        let current = record.match_status();
        if current != MatchStatus::Pending {
            return Err(AppError::InvalidTransition {
                current: String::from(current),
                expected: String::from(MatchStatus::Pending),
            });
        }

        let affected = self
            .repo
            .update_match_status(match_id, MatchStatus::Pending, MatchStatus::Withdrawn)
            .await?;
        if affected == 0 {
            let fresh = self.repo.require_match(match_id).await?;
            return Err(AppError::InvalidTransition {
                current: fresh.status,
                expected: String::from(MatchStatus::Pending),
            });
        }

        metrics::record_transition(&record.status, "withdrawn");

        tracing::info!(match_id = %match_id, mentee_id = %caller_id, "Match withdrawn");

        let mut updated = record;
        updated.status = String::from(MatchStatus::Withdrawn);
        Ok(updated)
    }

    // ========================================================================
    // Listing
    // ========================================================================

    /// Role-scoped match listing: mentors see their mentor-side matches,
    /// everyone else sees their mentee-side matches. Admins may list for an
    /// arbitrary profile via `for_user`; the side is chosen by the subject's
    /// role so an admin looking at a mentor sees that mentor's matches.
    pub async fn list_matches(
        &self,
        caller: &AuthContext,
        status: Option<MatchStatus>,
        for_user: Option<Uuid>,
    ) -> Result<Vec<MentorshipMatch>> {
        let subject = resolve_listing_subject(caller, for_user)?;

        let subject_role = if subject == caller.user_id {
            caller.role
        } else {
            self.repo.require_profile(subject).await?.role()
        };

        if lists_mentor_side(subject_role) {
            self.repo.list_matches_for_mentor(subject, status).await
        } else {
            self.repo.list_matches_for_mentee(subject, status).await
        }
    }

    // ========================================================================
    // Side effects
    // ========================================================================

    /// Fire the decision's notification and email. Failures here are logged
    /// and swallowed; the caller's transition has already been committed.
    async fn dispatch_decision_side_effects(&self, record: &MentorshipMatch, decision: MatchDecision) {
        let (mentee, mentor) = match self.load_pair(record).await {
            Ok(pair) => pair,
            Err(e) => {
                tracing::error!(
                    match_id = %record.id,
                    error = %e,
                    "Skipping decision side effects: failed to load profiles"
                );
                return;
            }
        };

        let (kind, title, message, email) = match decision {
            MatchDecision::Accept => (
                NotificationKind::Success,
                "Mentorship request accepted".to_string(),
                format!("{} accepted your mentorship request.", mentor.full_name),
                templates::accepted_email(&mentee.full_name, &mentor.full_name),
            ),
            MatchDecision::Reject => (
                NotificationKind::Info,
                "Mentorship request declined".to_string(),
                format!(
                    "{} is unable to take on your mentorship request right now.",
                    mentor.full_name
                ),
                templates::rejected_email(&mentee.full_name, &mentor.full_name),
            ),
        };

        if let Err(e) = self
            .notifications
            .create(
                mentee.id,
                title,
                message,
                kind,
                Some(format!("/mentorship/matches/{}", record.id)),
                serde_json::json!({ "match_id": record.id }),
            )
            .await
        {
            tracing::error!(
                match_id = %record.id,
                mentee_id = %mentee.id,
                error = %e,
                "Failed to create decision notification"
            );
        }

        mail::send_rendered(self.mailer.as_ref(), &mentee, email).await;
    }

    async fn load_pair(&self, record: &MentorshipMatch) -> Result<(Profile, Profile)> {
        let mentee = self.repo.require_profile(record.mentee_id).await?;
        let mentor = self.repo.require_profile(record.mentor_id).await?;
        Ok((mentee, mentor))
    }
}

/// Who a listing is about. Listing for another profile is admin-only.
fn resolve_listing_subject(caller: &AuthContext, for_user: Option<Uuid>) -> Result<Uuid> {
    match for_user {
        Some(user_id) if user_id != caller.user_id => {
            caller.require_admin()?;
            Ok(user_id)
        }
        _ => Ok(caller.user_id),
    }
}

/// Mentors are listed by their mentor-side matches; every other role by
/// their mentee-side matches.
fn lists_mentor_side(role: Role) -> bool {
    role == Role::Mentor
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accept_pending() {
        assert_eq!(
            MatchDecision::Accept.apply(MatchStatus::Pending).unwrap(),
            MatchStatus::Active
        );
    }

    #[test]
    fn test_reject_pending() {
        assert_eq!(
            MatchDecision::Reject.apply(MatchStatus::Pending).unwrap(),
            MatchStatus::Rejected
        );
    }

    #[test]
    fn test_double_decision_conflicts() {
        for current in [MatchStatus::Active, MatchStatus::Rejected, MatchStatus::Withdrawn] {
            let err = MatchDecision::Accept.apply(current).unwrap_err();
            assert!(matches!(err, AppError::InvalidTransition { .. }));

            let err = MatchDecision::Reject.apply(current).unwrap_err();
            assert!(matches!(err, AppError::InvalidTransition { .. }));
        }
    }

    #[test]
    fn test_target_statuses() {
        assert_eq!(MatchDecision::Accept.target_status(), MatchStatus::Active);
        assert_eq!(MatchDecision::Reject.target_status(), MatchStatus::Rejected);
    }

    #[test]
    fn test_listing_subject_requires_admin_for_other_users() {
        let caller = ctx(Role::Mentor);
        let other = Uuid::new_v4();

        assert!(resolve_listing_subject(&caller, Some(other)).is_err());
        assert_eq!(
            resolve_listing_subject(&caller, None).unwrap(),
            caller.user_id
        );
        assert_eq!(
            resolve_listing_subject(&caller, Some(caller.user_id)).unwrap(),
            caller.user_id
        );

        let admin = ctx(Role::Admin);
        assert_eq!(resolve_listing_subject(&admin, Some(other)).unwrap(), other);
    }

    #[test]
    fn test_listing_side_follows_subject_role() {
        assert!(lists_mentor_side(Role::Mentor));
        assert!(!lists_mentor_side(Role::Applicant));
        assert!(!lists_mentor_side(Role::Partner));
        assert!(!lists_mentor_side(Role::Admin));
    }

    // ------------------------------------------------------------------
    // Service behavior over a mock database
    // ------------------------------------------------------------------

    use grantflow_common::db::models::Notification;
    use grantflow_common::db::DbPool;
    use grantflow_common::email::MockMailer;
    use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase, MockExecResult};

    fn ctx(role: Role) -> AuthContext {
        AuthContext {
            user_id: Uuid::new_v4(),
            role,
            request_id: "req-test".to_string(),
        }
    }

    fn match_row(status: &str, mentor_id: Uuid, mentee_id: Uuid) -> MentorshipMatch {
        let now = chrono::Utc::now();
        MentorshipMatch {
            id: Uuid::new_v4(),
            mentor_id,
            mentee_id,
            status: status.to_string(),
            goals: None,
            program_id: None,
            start_date: now.into(),
            created_at: now.into(),
        }
    }

    fn profile_row(id: Uuid, role: &str, name: &str) -> Profile {
        let now = chrono::Utc::now();
        Profile {
            id,
            role: role.to_string(),
            full_name: name.to_string(),
            email: format!("{}@example.org", name.to_lowercase()),
            phone: None,
            avatar_url: None,
            created_at: now.into(),
            updated_at: now.into(),
        }
    }

    fn notification_row(user_id: Uuid) -> Notification {
        Notification {
            id: Uuid::new_v4(),
            user_id,
            title: "Mentorship request accepted".to_string(),
            message: "accepted".to_string(),
            kind: "success".to_string(),
            link: None,
            is_read: false,
            metadata: serde_json::json!({}),
            created_at: chrono::Utc::now().into(),
        }
    }

    fn service(conn: DatabaseConnection, mailer: Arc<dyn Mailer>) -> MentorshipService {
        let repo = Repository::new(DbPool {
            primary: conn,
            replica: None,
        });
        let notifications = NotificationService::new(repo.clone());
        MentorshipService::new(repo, notifications, mailer)
    }

    #[tokio::test]
    async fn test_accept_survives_failing_mailer() {
        let mentor_id = Uuid::new_v4();
        let mentee_id = Uuid::new_v4();
        let record = match_row("pending", mentor_id, mentee_id);

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![record.clone()]])
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            }])
            .append_query_results([
                vec![profile_row(mentee_id, "applicant", "Ada")],
                vec![profile_row(mentor_id, "mentor", "Tunde")],
            ])
            .append_query_results([vec![notification_row(mentee_id)]])
            .into_connection();

        let svc = service(db, Arc::new(MockMailer::failing()));
        let updated = svc.accept_request(mentor_id, record.id).await.unwrap();

        // The email failed but the transition stands
        assert_eq!(updated.status, "active");
    }

    #[tokio::test]
    async fn test_reject_survives_side_effect_query_failure() {
        let mentor_id = Uuid::new_v4();
        let record = match_row("pending", mentor_id, Uuid::new_v4());

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![record.clone()]])
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            }])
            .append_query_errors([sea_orm::DbErr::Custom("connection reset".to_string())])
            .into_connection();

        let svc = service(db, Arc::new(MockMailer::new()));
        let updated = svc.reject_request(mentor_id, record.id).await.unwrap();

        assert_eq!(updated.status, "rejected");
    }

    #[tokio::test]
    async fn test_lost_race_reports_fresh_status() {
        let mentor_id = Uuid::new_v4();
        let pending = match_row("pending", mentor_id, Uuid::new_v4());
        let mut raced = pending.clone();
        raced.status = "rejected".to_string();

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![pending.clone()], vec![raced]])
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 0,
            }])
            .into_connection();

        let svc = service(db, Arc::new(MockMailer::new()));
        let err = svc.accept_request(mentor_id, pending.id).await.unwrap_err();

        match err {
            AppError::InvalidTransition { current, expected } => {
                assert_eq!(current, "rejected");
                assert_eq!(expected, "pending");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_admin_lists_mentor_subject_by_mentor_side() {
        let admin = ctx(Role::Admin);
        let mentor_id = Uuid::new_v4();
        let record = match_row("active", mentor_id, Uuid::new_v4());

        let conn = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![profile_row(mentor_id, "mentor", "Tunde")]])
            .append_query_results([vec![record]])
            .into_connection();

        let svc = service(conn.clone(), Arc::new(MockMailer::new()));
        let matches = svc
            .list_matches(&admin, None, Some(mentor_id))
            .await
            .unwrap();
        assert_eq!(matches.len(), 1);

        // The second statement must filter on the mentor side of the match
        let log = format!("{:?}", conn.into_transaction_log());
        assert!(log.contains(r#""mentor_id" = $"#));
        assert!(!log.contains(r#""mentee_id" = $"#));
    }
}
