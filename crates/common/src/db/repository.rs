//! Repository pattern for database operations
//!
//! Provides a clean interface for all data access operations
//! with proper error handling. Every query that mutates on behalf
//! of a user carries the owning user's id in its filter.

use crate::db::models::*;
use crate::db::DbPool;
use crate::errors::{AppError, Result};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Select, Set,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A mentor profile joined with its identity profile, as produced by the
/// directory listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MentorRow {
    pub profile: Profile,
    pub mentor: MentorProfile,
}

/// Repository for data access operations
#[derive(Clone)]
pub struct Repository {
    pool: DbPool,
}

impl Repository {
    /// Create a new repository with the given connection pool
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Get the read connection
    fn read_conn(&self) -> &DatabaseConnection {
        self.pool.read()
    }

    /// Get the write connection
    fn write_conn(&self) -> &DatabaseConnection {
        self.pool.write()
    }

    // ========================================================================
    // Health Check
    // ========================================================================

    /// Ping the database
    pub async fn ping(&self) -> Result<()> {
        self.pool.ping().await
    }

    // ========================================================================
    // Profile Operations
    // ========================================================================

    /// Find profile by ID
    pub async fn find_profile_by_id(&self, id: Uuid) -> Result<Option<Profile>> {
        ProfileEntity::find_by_id(id)
            .one(self.read_conn())
            .await
            .map_err(Into::into)
    }

    /// Find all profiles matching the given ids
    pub async fn find_profiles_by_ids(&self, ids: Vec<Uuid>) -> Result<Vec<Profile>> {
        ProfileEntity::find()
            .filter(ProfileColumn::Id.is_in(ids))
            .all(self.read_conn())
            .await
            .map_err(Into::into)
    }

    /// Find the mentor profile belonging to a profile id
    pub async fn find_mentor_profile_by_user(&self, user_id: Uuid) -> Result<Option<MentorProfile>> {
        MentorProfileEntity::find()
            .filter(MentorProfileColumn::UserId.eq(user_id))
            .one(self.read_conn())
            .await
            .map_err(Into::into)
    }

    /// Query for mentors open to new mentees. Order is deterministic: most
    /// experienced first, creation order as tiebreak.
    fn available_mentors_query() -> Select<MentorProfileEntity> {
        MentorProfileEntity::find()
            .filter(
                MentorProfileColumn::AvailabilityStatus
                    .eq(String::from(AvailabilityStatus::Available)),
            )
            .order_by_desc(MentorProfileColumn::YearsOfExperience)
            .order_by_asc(MentorProfileColumn::CreatedAt)
    }

    /// List mentors with availability_status = available, joined with their
    /// identity profiles by user-id intersection. Mentor rows without a
    /// matching profile are skipped.
    pub async fn list_available_mentors(&self) -> Result<Vec<MentorRow>> {
        let mentors = Self::available_mentors_query().all(self.read_conn()).await?;

        let user_ids: Vec<Uuid> = mentors.iter().map(|m| m.user_id).collect();
        let profiles = self.find_profiles_by_ids(user_ids).await?;

        let rows = mentors
            .into_iter()
            .filter_map(|mentor| {
                profiles
                    .iter()
                    .find(|p| p.id == mentor.user_id)
                    .cloned()
                    .map(|profile| MentorRow { profile, mentor })
            })
            .collect();

        Ok(rows)
    }

    // ========================================================================
    // Match Operations
    // ========================================================================

    /// Insert a mentorship match with the given initial status
    pub async fn insert_match(
        &self,
        mentor_id: Uuid,
        mentee_id: Uuid,
        goals: Option<String>,
        program_id: Option<Uuid>,
        status: MatchStatus,
    ) -> Result<MentorshipMatch> {
        let now = chrono::Utc::now();

        let row = MentorshipMatchActiveModel {
            id: Set(Uuid::new_v4()),
            mentor_id: Set(mentor_id),
            mentee_id: Set(mentee_id),
            status: Set(String::from(status)),
            goals: Set(goals),
            program_id: Set(program_id),
            start_date: Set(now.into()),
            created_at: Set(now.into()),
        };

        row.insert(self.write_conn()).await.map_err(Into::into)
    }

    /// Find match by ID
    pub async fn find_match_by_id(&self, id: Uuid) -> Result<Option<MentorshipMatch>> {
        MentorshipMatchEntity::find_by_id(id)
            .one(self.read_conn())
            .await
            .map_err(Into::into)
    }

    /// Find an active match for a (mentor, mentee) pair, if any
    pub async fn find_active_match(
        &self,
        mentor_id: Uuid,
        mentee_id: Uuid,
    ) -> Result<Option<MentorshipMatch>> {
        MentorshipMatchEntity::find()
            .filter(MentorshipMatchColumn::MentorId.eq(mentor_id))
            .filter(MentorshipMatchColumn::MenteeId.eq(mentee_id))
            .filter(MentorshipMatchColumn::Status.eq(String::from(MatchStatus::Active)))
            .one(self.read_conn())
            .await
            .map_err(Into::into)
    }

    /// List matches where the given profile is the mentor
    pub async fn list_matches_for_mentor(
        &self,
        mentor_id: Uuid,
        status: Option<MatchStatus>,
    ) -> Result<Vec<MentorshipMatch>> {
        let mut query = MentorshipMatchEntity::find()
            .filter(MentorshipMatchColumn::MentorId.eq(mentor_id));

        if let Some(status) = status {
            query = query.filter(MentorshipMatchColumn::Status.eq(String::from(status)));
        }

        query
            .order_by_desc(MentorshipMatchColumn::CreatedAt)
            .all(self.read_conn())
            .await
            .map_err(Into::into)
    }

    /// List matches where the given profile is the mentee
    pub async fn list_matches_for_mentee(
        &self,
        mentee_id: Uuid,
        status: Option<MatchStatus>,
    ) -> Result<Vec<MentorshipMatch>> {
        let mut query = MentorshipMatchEntity::find()
            .filter(MentorshipMatchColumn::MenteeId.eq(mentee_id));

        if let Some(status) = status {
            query = query.filter(MentorshipMatchColumn::Status.eq(String::from(status)));
        }

        query
            .order_by_desc(MentorshipMatchColumn::CreatedAt)
            .all(self.read_conn())
            .await
            .map_err(Into::into)
    }

    /// Update a match status. The update is filtered on the expected current
    /// status so a concurrent transition touches zero rows instead of
    /// clobbering; returns the number of rows affected.
    pub async fn update_match_status(
        &self,
        match_id: Uuid,
        from: MatchStatus,
        to: MatchStatus,
    ) -> Result<u64> {
        let result = MentorshipMatchEntity::update_many()
            .col_expr(
                MentorshipMatchColumn::Status,
                Expr::value(String::from(to)),
            )
            .filter(MentorshipMatchColumn::Id.eq(match_id))
            .filter(MentorshipMatchColumn::Status.eq(String::from(from)))
            .exec(self.write_conn())
            .await?;

        Ok(result.rows_affected)
    }

    // ========================================================================
    // Session Operations
    // ========================================================================

    /// Insert a session log entry
    pub async fn insert_session(
        &self,
        match_id: Uuid,
        session_date: chrono::DateTime<chrono::Utc>,
        duration_minutes: i32,
        mode: SessionMode,
        notes: Option<String>,
    ) -> Result<MentorshipSession> {
        let now = chrono::Utc::now();

        let row = MentorshipSessionActiveModel {
            id: Set(Uuid::new_v4()),
            match_id: Set(match_id),
            session_date: Set(session_date.into()),
            duration_minutes: Set(duration_minutes),
            mode: Set(String::from(mode)),
            notes: Set(notes),
            status: Set("completed".to_string()),
            created_at: Set(now.into()),
        };

        row.insert(self.write_conn()).await.map_err(Into::into)
    }

    /// List sessions recorded against a match, newest first
    pub async fn list_sessions_for_match(&self, match_id: Uuid) -> Result<Vec<MentorshipSession>> {
        MentorshipSessionEntity::find()
            .filter(MentorshipSessionColumn::MatchId.eq(match_id))
            .order_by_desc(MentorshipSessionColumn::SessionDate)
            .all(self.read_conn())
            .await
            .map_err(Into::into)
    }

    // ========================================================================
    // Notification Operations
    // ========================================================================

    /// Insert a notification for a recipient
    pub async fn insert_notification(
        &self,
        user_id: Uuid,
        title: String,
        message: String,
        kind: NotificationKind,
        link: Option<String>,
        metadata: serde_json::Value,
    ) -> Result<Notification> {
        let now = chrono::Utc::now();

        let row = NotificationActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(user_id),
            title: Set(title),
            message: Set(message),
            kind: Set(String::from(kind)),
            link: Set(link),
            is_read: Set(false),
            metadata: Set(metadata),
            created_at: Set(now.into()),
        };

        row.insert(self.write_conn()).await.map_err(Into::into)
    }

    /// Find a notification by ID
    pub async fn find_notification_by_id(&self, id: Uuid) -> Result<Option<Notification>> {
        NotificationEntity::find_by_id(id)
            .one(self.read_conn())
            .await
            .map_err(Into::into)
    }

    /// Query for a user's notifications, newest first
    fn notifications_query(user_id: Uuid, unread_only: bool, limit: u64) -> Select<NotificationEntity> {
        let mut query = NotificationEntity::find()
            .filter(NotificationColumn::UserId.eq(user_id));

        if unread_only {
            query = query.filter(NotificationColumn::IsRead.eq(false));
        }

        query
            .order_by_desc(NotificationColumn::CreatedAt)
            .limit(limit)
    }

    /// List notifications for a user, newest first
    pub async fn list_notifications(
        &self,
        user_id: Uuid,
        unread_only: bool,
        limit: u64,
    ) -> Result<Vec<Notification>> {
        Self::notifications_query(user_id, unread_only, limit)
            .all(self.read_conn())
            .await
            .map_err(Into::into)
    }

    /// Mark a notification read; the user_id filter enforces ownership.
    /// Returns the number of rows affected.
    pub async fn mark_notification_read(&self, id: Uuid, user_id: Uuid) -> Result<u64> {
        let result = NotificationEntity::update_many()
            .col_expr(NotificationColumn::IsRead, Expr::value(true))
            .filter(NotificationColumn::Id.eq(id))
            .filter(NotificationColumn::UserId.eq(user_id))
            .exec(self.write_conn())
            .await?;

        Ok(result.rows_affected)
    }

    /// Mark all of a user's notifications read
    pub async fn mark_all_notifications_read(&self, user_id: Uuid) -> Result<u64> {
        let result = NotificationEntity::update_many()
            .col_expr(NotificationColumn::IsRead, Expr::value(true))
            .filter(NotificationColumn::UserId.eq(user_id))
            .filter(NotificationColumn::IsRead.eq(false))
            .exec(self.write_conn())
            .await?;

        Ok(result.rows_affected)
    }

    /// Delete a notification; the user_id filter enforces ownership
    pub async fn delete_notification(&self, id: Uuid, user_id: Uuid) -> Result<bool> {
        let result = NotificationEntity::delete_many()
            .filter(NotificationColumn::Id.eq(id))
            .filter(NotificationColumn::UserId.eq(user_id))
            .exec(self.write_conn())
            .await?;

        Ok(result.rows_affected > 0)
    }

    /// Resolve a match, failing with MatchNotFound when absent
    pub async fn require_match(&self, id: Uuid) -> Result<MentorshipMatch> {
        self.find_match_by_id(id)
            .await?
            .ok_or_else(|| AppError::MatchNotFound { id: id.to_string() })
    }

    /// Resolve a profile, failing with ProfileNotFound when absent
    pub async fn require_profile(&self, id: Uuid) -> Result<Profile> {
        self.find_profile_by_id(id)
            .await?
            .ok_or_else(|| AppError::ProfileNotFound { id: id.to_string() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DbBackend, QueryTrait};

    #[test]
    fn test_available_mentors_query_excludes_non_available() {
        let sql = Repository::available_mentors_query()
            .build(DbBackend::Postgres)
            .to_string();

        assert!(sql.contains(r#""availability_status" = 'available'"#));
        assert!(!sql.contains("limited"));
        assert!(!sql.contains("unavailable"));
        assert!(sql.contains(r#""years_of_experience" DESC"#));
    }

    #[test]
    fn test_notifications_query_scopes_to_user_and_unread() {
        let user_id = Uuid::new_v4();
        let sql = Repository::notifications_query(user_id, true, 50)
            .build(DbBackend::Postgres)
            .to_string();

        assert!(sql.contains(r#""user_id" ="#));
        assert!(sql.contains(&user_id.to_string()));
        assert!(sql.contains(r#""is_read" = FALSE"#));
        assert!(sql.contains("LIMIT 50"));
    }

    #[test]
    fn test_notifications_query_includes_read_when_not_unread_only() {
        let sql = Repository::notifications_query(Uuid::new_v4(), false, 20)
            .build(DbBackend::Postgres)
            .to_string();

        assert!(!sql.contains("is_read"));
        assert!(sql.contains(r#""created_at" DESC"#));
        assert!(sql.contains("LIMIT 20"));
    }
}
