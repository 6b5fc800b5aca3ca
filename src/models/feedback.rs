use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A trainee's rating of one training session.
///
/// Feedback is immutable once submitted. The `sentiment_score` is
/// derived from `comments` by [`crate::sentiment::score`] at creation
/// time and stored with the record; it is never recomputed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Feedback {
    pub id: Uuid,
    pub session_id: Uuid,
    pub trainee_id: Uuid,
    pub overall_rating: i32,
    pub knowledge_rating: i32,
    pub communication_rating: i32,
    pub materials_rating: i32,
    pub engagement_rating: i32,
    /// Free-text comment the sentiment score was derived from.
    pub comments: Option<String>,
    pub strengths: Vec<String>,
    pub improvements: Vec<String>,
    /// Positivity signal in `[0, 100]`; 50 means no signal.
    pub sentiment_score: u8,
    pub created_at: DateTime<Utc>,
}

/// Input for submitting feedback on a session.
///
/// The trainee is taken from the authenticated request and the sentiment
/// score is computed server-side, so neither appears here. All five
/// ratings are on a 1-5 scale.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateFeedbackInput {
    pub session_id: Uuid,
    pub overall_rating: i32,
    pub knowledge_rating: i32,
    pub communication_rating: i32,
    pub materials_rating: i32,
    pub engagement_rating: i32,
    pub comments: Option<String>,
    #[serde(default)]
    pub strengths: Vec<String>,
    #[serde(default)]
    pub improvements: Vec<String>,
}
