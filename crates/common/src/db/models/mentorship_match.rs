//! Mentorship match entity - the central record of the mentorship lifecycle

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Match lifecycle status enum
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    Pending,
    Active,
    Rejected,
    Withdrawn,
}

impl From<String> for MatchStatus {
    fn from(s: String) -> Self {
        match s.as_str() {
            "pending" => MatchStatus::Pending,
            "active" => MatchStatus::Active,
            "rejected" => MatchStatus::Rejected,
            "withdrawn" => MatchStatus::Withdrawn,
            _ => MatchStatus::Pending,
        }
    }
}

impl From<MatchStatus> for String {
    fn from(status: MatchStatus) -> Self {
        match status {
            MatchStatus::Pending => "pending".to_string(),
            MatchStatus::Active => "active".to_string(),
            MatchStatus::Rejected => "rejected".to_string(),
            MatchStatus::Withdrawn => "withdrawn".to_string(),
        }
    }
}

impl MatchStatus {
    /// Parse a status string, rejecting unknown values
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(MatchStatus::Pending),
            "active" => Some(MatchStatus::Active),
            "rejected" => Some(MatchStatus::Rejected),
            "withdrawn" => Some(MatchStatus::Withdrawn),
            _ => None,
        }
    }

    /// Terminal states admit no further transition
    pub fn is_terminal(&self) -> bool {
        matches!(self, MatchStatus::Rejected | MatchStatus::Withdrawn)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "mentorship_matches")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    /// Profile id of the mentor side
    pub mentor_id: Uuid,

    /// Profile id of the mentee side
    pub mentee_id: Uuid,

    #[sea_orm(column_type = "Text")]
    pub status: String,

    #[sea_orm(column_type = "Text", nullable)]
    pub goals: Option<String>,

    /// Grant program this pairing was created under (admin path only)
    pub program_id: Option<Uuid>,

    pub start_date: DateTimeWithTimeZone,

    pub created_at: DateTimeWithTimeZone,
}

impl Model {
    /// Get the match status as an enum
    pub fn match_status(&self) -> MatchStatus {
        MatchStatus::from(self.status.clone())
    }

    pub fn is_pending(&self) -> bool {
        self.match_status() == MatchStatus::Pending
    }

    pub fn is_active(&self) -> bool {
        self.match_status() == MatchStatus::Active
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::profile::Entity",
        from = "Column::MenteeId",
        to = "super::profile::Column::Id"
    )]
    Mentee,

    #[sea_orm(has_many = "super::mentorship_session::Entity")]
    Sessions,
}

impl Related<super::mentorship_session::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Sessions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_roundtrip() {
        for status in [
            MatchStatus::Pending,
            MatchStatus::Active,
            MatchStatus::Rejected,
            MatchStatus::Withdrawn,
        ] {
            let s = String::from(status);
            assert_eq!(MatchStatus::from(s), status);
        }
    }

    #[test]
    fn test_terminal_states() {
        assert!(MatchStatus::Rejected.is_terminal());
        assert!(MatchStatus::Withdrawn.is_terminal());
        assert!(!MatchStatus::Pending.is_terminal());
        assert!(!MatchStatus::Active.is_terminal());
    }

    #[test]
    fn test_parse_rejects_unknown() {
        assert_eq!(MatchStatus::parse("active"), Some(MatchStatus::Active));
        assert_eq!(MatchStatus::parse("completed"), None);
    }
}
