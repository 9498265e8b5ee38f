//! Profile entity - the identity record for every platform user

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Platform role enum
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Applicant,
    Mentor,
    Partner,
    Admin,
}

impl From<String> for Role {
    fn from(s: String) -> Self {
        match s.as_str() {
            "applicant" => Role::Applicant,
            "mentor" => Role::Mentor,
            "partner" => Role::Partner,
            "admin" => Role::Admin,
            _ => Role::Applicant,
        }
    }
}

impl From<Role> for String {
    fn from(role: Role) -> Self {
        match role {
            Role::Applicant => "applicant".to_string(),
            Role::Mentor => "mentor".to_string(),
            Role::Partner => "partner".to_string(),
            Role::Admin => "admin".to_string(),
        }
    }
}

impl Role {
    /// Parse a role string, rejecting unknown values
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "applicant" => Some(Role::Applicant),
            "mentor" => Some(Role::Mentor),
            "partner" => Some(Role::Partner),
            "admin" => Some(Role::Admin),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "profiles")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    #[sea_orm(column_type = "Text")]
    pub role: String,

    #[sea_orm(column_type = "Text")]
    pub full_name: String,

    #[sea_orm(column_type = "Text")]
    pub email: String,

    #[sea_orm(column_type = "Text", nullable)]
    pub phone: Option<String>,

    #[sea_orm(column_type = "Text", nullable)]
    pub avatar_url: Option<String>,

    pub created_at: DateTimeWithTimeZone,

    pub updated_at: DateTimeWithTimeZone,
}

impl Model {
    /// Get the role as an enum
    pub fn role(&self) -> Role {
        Role::from(self.role.clone())
    }

    pub fn is_admin(&self) -> bool {
        self.role() == Role::Admin
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_one = "super::mentor_profile::Entity")]
    MentorProfile,
}

impl Related<super::mentor_profile::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MentorProfile.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_roundtrip() {
        for role in [Role::Applicant, Role::Mentor, Role::Partner, Role::Admin] {
            let s = String::from(role);
            assert_eq!(Role::from(s), role);
        }
    }

    #[test]
    fn test_role_parse_rejects_unknown() {
        assert_eq!(Role::parse("mentor"), Some(Role::Mentor));
        assert_eq!(Role::parse("superuser"), None);
    }
}
