use serde::{Deserialize, Serialize};

use super::{Feedback, Trainer, TrainingSession};
use crate::sentiment::SentimentDistribution;

/// Aggregate numbers shown on the admin dashboard.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminMetrics {
    pub total_trainers: usize,
    pub total_feedback: usize,
    /// Mean overall rating, rounded to one decimal place. 0.0 when there
    /// is no feedback.
    pub avg_rating: f64,
    /// Mean sentiment score, rounded to the nearest integer. 50 when
    /// there is no feedback.
    pub sentiment_score: u8,
    pub sentiment_distribution: SentimentDistribution,
}

/// Aggregate numbers shown on a trainer's own dashboard.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainerMetrics {
    pub total_sessions: usize,
    pub total_feedback: usize,
    pub avg_rating: f64,
    pub sentiment_score: u8,
    pub sentiment_distribution: SentimentDistribution,
}

/// Dashboard payload for admins: platform-wide metrics plus the raw
/// rows they are computed from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminDashboard {
    pub metrics: AdminMetrics,
    pub trainers: Vec<Trainer>,
    pub feedback: Vec<Feedback>,
    pub sessions: Vec<TrainingSession>,
}

/// Dashboard payload for trainers: metrics over their own sessions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainerDashboard {
    pub metrics: TrainerMetrics,
    pub feedback: Vec<Feedback>,
    pub sessions: Vec<TrainingSession>,
}

/// Dashboard payload for trainees: what they can attend and what they
/// already rated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraineeDashboard {
    pub sessions: Vec<TrainingSession>,
    pub submitted_feedback: Vec<Feedback>,
}

/// The role-shaped `/dashboard` response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DashboardResponse {
    Admin(AdminDashboard),
    Trainer(TrainerDashboard),
    Trainee(TraineeDashboard),
}
