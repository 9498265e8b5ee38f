//! GrantFlow mentorship domain
//!
//! The mentorship core of the platform:
//! - Mentor directory and client-side filtering
//! - Match request flow and accept/reject lifecycle
//! - Session logging
//! - Per-user notifications
//! - Transactional email templates

pub mod directory;
pub mod lifecycle;
pub(crate) mod mail;
pub mod notify;
pub mod sessions;
pub mod templates;

pub use directory::{filter_mentors, MentorDirectory, MentorSummary};
pub use lifecycle::{MatchDecision, MentorshipService};
pub use notify::NotificationService;
pub use sessions::SessionLog;
