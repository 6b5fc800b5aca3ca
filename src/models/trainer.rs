use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The trainer profile attached to a trainer-role user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trainer {
    pub id: Uuid,
    pub user_id: Uuid,
    pub department: String,
    pub specialty: String,
    pub created_at: DateTime<Utc>,
}

/// A trainer with the display fields from its user account, used for
/// listing responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainerWithUser {
    #[serde(flatten)]
    pub trainer: Trainer,
    pub full_name: String,
    pub username: String,
}

/// Input for creating a trainer profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTrainerInput {
    pub user_id: Uuid,
    pub department: String,
    pub specialty: String,
}

/// Input for updating a trainer profile. All fields are optional for
/// partial updates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateTrainerInput {
    pub department: Option<String>,
    pub specialty: Option<String>,
}
