//! API handlers module

pub mod health;
pub mod mentors;
pub mod mentorship;
pub mod notifications;
pub mod sessions;
