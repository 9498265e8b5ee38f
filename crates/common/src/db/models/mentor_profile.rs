//! Mentor profile entity - extension of Profile for mentor-role users

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Mentor availability enum
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AvailabilityStatus {
    Available,
    Limited,
    Unavailable,
}

impl From<String> for AvailabilityStatus {
    fn from(s: String) -> Self {
        match s.as_str() {
            "available" => AvailabilityStatus::Available,
            "limited" => AvailabilityStatus::Limited,
            "unavailable" => AvailabilityStatus::Unavailable,
            _ => AvailabilityStatus::Unavailable,
        }
    }
}

impl From<AvailabilityStatus> for String {
    fn from(status: AvailabilityStatus) -> Self {
        match status {
            AvailabilityStatus::Available => "available".to_string(),
            AvailabilityStatus::Limited => "limited".to_string(),
            AvailabilityStatus::Unavailable => "unavailable".to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "mentor_profiles")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    /// Profile id of the mentor (the identity space used by match.mentor_id)
    pub user_id: Uuid,

    #[sea_orm(column_type = "Text", nullable)]
    pub bio: Option<String>,

    #[sea_orm(column_type = "Text", nullable)]
    pub headline: Option<String>,

    /// JSON array of expertise strings
    pub expertise_areas: Json,

    pub years_of_experience: i32,

    #[sea_orm(column_type = "Text")]
    pub availability_status: String,

    pub max_mentees: i32,

    #[sea_orm(column_type = "Text", nullable)]
    pub linkedin_url: Option<String>,

    pub created_at: DateTimeWithTimeZone,

    pub updated_at: DateTimeWithTimeZone,
}

impl Model {
    /// Get the availability status as an enum
    pub fn availability(&self) -> AvailabilityStatus {
        AvailabilityStatus::from(self.availability_status.clone())
    }

    /// Expertise areas as plain strings, skipping malformed entries
    pub fn expertise(&self) -> Vec<String> {
        self.expertise_areas
            .as_array()
            .map(|arr| {
                arr.iter()
                    .filter_map(|v| v.as_str().map(String::from))
                    .collect()
            })
            .unwrap_or_default()
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::profile::Entity",
        from = "Column::UserId",
        to = "super::profile::Column::Id"
    )]
    Profile,
}

impl Related<super::profile::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Profile.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_availability_roundtrip() {
        for status in [
            AvailabilityStatus::Available,
            AvailabilityStatus::Limited,
            AvailabilityStatus::Unavailable,
        ] {
            let s = String::from(status);
            assert_eq!(AvailabilityStatus::from(s), status);
        }
    }

    #[test]
    fn test_unknown_availability_defaults_closed() {
        assert_eq!(
            AvailabilityStatus::from("on-sabbatical".to_string()),
            AvailabilityStatus::Unavailable
        );
    }
}
