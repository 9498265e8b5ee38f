//! Mentorship session entity - immutable log entries recorded by the mentor

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Session delivery mode enum
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SessionMode {
    Virtual,
    InPerson,
    Phone,
}

impl From<String> for SessionMode {
    fn from(s: String) -> Self {
        match s.as_str() {
            "virtual" => SessionMode::Virtual,
            "in-person" => SessionMode::InPerson,
            "phone" => SessionMode::Phone,
            _ => SessionMode::Virtual,
        }
    }
}

impl From<SessionMode> for String {
    fn from(mode: SessionMode) -> Self {
        match mode {
            SessionMode::Virtual => "virtual".to_string(),
            SessionMode::InPerson => "in-person".to_string(),
            SessionMode::Phone => "phone".to_string(),
        }
    }
}

impl SessionMode {
    /// Parse a mode string, rejecting unknown values
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "virtual" => Some(SessionMode::Virtual),
            "in-person" => Some(SessionMode::InPerson),
            "phone" => Some(SessionMode::Phone),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "mentorship_sessions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    pub match_id: Uuid,

    pub session_date: DateTimeWithTimeZone,

    pub duration_minutes: i32,

    #[sea_orm(column_type = "Text")]
    pub mode: String,

    #[sea_orm(column_type = "Text", nullable)]
    pub notes: Option<String>,

    #[sea_orm(column_type = "Text")]
    pub status: String,

    pub created_at: DateTimeWithTimeZone,
}

impl Model {
    /// Get the delivery mode as an enum
    pub fn session_mode(&self) -> SessionMode {
        SessionMode::from(self.mode.clone())
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::mentorship_match::Entity",
        from = "Column::MatchId",
        to = "super::mentorship_match::Column::Id"
    )]
    Match,
}

impl Related<super::mentorship_match::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Match.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_roundtrip() {
        for mode in [SessionMode::Virtual, SessionMode::InPerson, SessionMode::Phone] {
            let s = String::from(mode);
            assert_eq!(SessionMode::from(s), mode);
        }
    }

    #[test]
    fn test_parse_rejects_unknown() {
        assert_eq!(SessionMode::parse("in-person"), Some(SessionMode::InPerson));
        assert_eq!(SessionMode::parse("telepathy"), None);
    }
}
