use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A scheduled training session delivered by a trainer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingSession {
    pub id: Uuid,
    pub trainer_id: Uuid,
    pub title: String,
    /// When the session takes place.
    pub date: DateTime<Utc>,
    pub description: String,
}

/// Input for scheduling a new session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateSessionInput {
    pub trainer_id: Uuid,
    pub title: String,
    /// Defaults to the current time if not specified.
    pub date: Option<DateTime<Utc>>,
    pub description: String,
}
