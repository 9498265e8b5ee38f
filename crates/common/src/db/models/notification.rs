//! Notification entity - per-user notification records

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Notification severity/kind enum
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    Info,
    Success,
    Warning,
    Error,
}

impl From<String> for NotificationKind {
    fn from(s: String) -> Self {
        match s.as_str() {
            "info" => NotificationKind::Info,
            "success" => NotificationKind::Success,
            "warning" => NotificationKind::Warning,
            "error" => NotificationKind::Error,
            _ => NotificationKind::Info,
        }
    }
}

impl From<NotificationKind> for String {
    fn from(kind: NotificationKind) -> Self {
        match kind {
            NotificationKind::Info => "info".to_string(),
            NotificationKind::Success => "success".to_string(),
            NotificationKind::Warning => "warning".to_string(),
            NotificationKind::Error => "error".to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "notifications")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    /// Recipient profile id
    pub user_id: Uuid,

    #[sea_orm(column_type = "Text")]
    pub title: String,

    #[sea_orm(column_type = "Text")]
    pub message: String,

    #[sea_orm(column_type = "Text")]
    pub kind: String,

    #[sea_orm(column_type = "Text", nullable)]
    pub link: Option<String>,

    pub is_read: bool,

    /// Opaque key-value bag attached by the producing operation
    pub metadata: Json,

    pub created_at: DateTimeWithTimeZone,
}

impl Model {
    /// Get the notification kind as an enum
    pub fn notification_kind(&self) -> NotificationKind {
        NotificationKind::from(self.kind.clone())
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::profile::Entity",
        from = "Column::UserId",
        to = "super::profile::Column::Id"
    )]
    Recipient,
}

impl Related<super::profile::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Recipient.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_roundtrip() {
        for kind in [
            NotificationKind::Info,
            NotificationKind::Success,
            NotificationKind::Warning,
            NotificationKind::Error,
        ] {
            let s = String::from(kind);
            assert_eq!(NotificationKind::from(s), kind);
        }
    }
}
