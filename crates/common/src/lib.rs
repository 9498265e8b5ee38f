//! GrantFlow Common Library
//!
//! Shared code for GrantFlow services including:
//! - Database models and repository patterns
//! - Error types and handling
//! - Configuration management
//! - Authentication utilities
//! - Transactional email dispatch
//! - Metrics and observability

pub mod auth;
pub mod config;
pub mod db;
pub mod email;
pub mod errors;
pub mod metrics;

// Re-export commonly used types
pub use config::AppConfig;
pub use db::{MentorRow, Repository};
pub use email::{Mailer, OutgoingEmail, SendOutcome};
pub use errors::{AppError, Result};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default notification page size
pub const DEFAULT_NOTIFICATION_LIMIT: u64 = 50;
