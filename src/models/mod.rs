//! Domain models for TrainPulse.
//!
//! # Core Concepts
//!
//! - [`User`]: An account with one of three roles. Admins manage the
//!   catalog, trainers deliver sessions, trainees submit feedback.
//! - [`Trainer`]: The trainer profile attached to a trainer-role user
//!   (department and specialty).
//! - [`TrainingSession`]: A scheduled session delivered by a trainer.
//! - [`Feedback`]: A trainee's rating of one session. Immutable once
//!   submitted; its `sentiment_score` is computed from the comment text
//!   exactly once at creation and never recomputed.
//!
//! Dashboard types aggregate feedback per role; the shapes differ, so
//! [`DashboardResponse`] serializes untagged.

mod dashboard;
mod feedback;
mod session;
mod trainer;
mod user;

pub use dashboard::*;
pub use feedback::*;
pub use session::*;
pub use trainer::*;
pub use user::*;
