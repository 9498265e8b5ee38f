//! SeaORM entity models
//!
//! Database entities for the GrantFlow mentorship backend

mod mentor_profile;
mod mentorship_match;
mod mentorship_session;
mod notification;
mod profile;

pub use profile::{
    Entity as ProfileEntity,
    Model as Profile,
    ActiveModel as ProfileActiveModel,
    Column as ProfileColumn,
    Role,
};

pub use mentor_profile::{
    Entity as MentorProfileEntity,
    Model as MentorProfile,
    ActiveModel as MentorProfileActiveModel,
    Column as MentorProfileColumn,
    AvailabilityStatus,
};

pub use mentorship_match::{
    Entity as MentorshipMatchEntity,
    Model as MentorshipMatch,
    ActiveModel as MentorshipMatchActiveModel,
    Column as MentorshipMatchColumn,
    MatchStatus,
};

pub use mentorship_session::{
    Entity as MentorshipSessionEntity,
    Model as MentorshipSession,
    ActiveModel as MentorshipSessionActiveModel,
    Column as MentorshipSessionColumn,
    SessionMode,
};

pub use notification::{
    Entity as NotificationEntity,
    Model as Notification,
    ActiveModel as NotificationActiveModel,
    Column as NotificationColumn,
    NotificationKind,
};
