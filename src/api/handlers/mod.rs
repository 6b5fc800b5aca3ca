use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use uuid::Uuid;

use super::middleware::AuthSession;
use crate::auth;
use crate::db::Database;
use crate::models::*;
use crate::sentiment::SentimentDistribution;

// ============================================================
// Error Handling
// ============================================================

/// Log an internal error and return a sanitized response to the client.
/// The full error is logged server-side for debugging, but clients only
/// see a generic message to avoid leaking internal details.
///
/// Some errors are validation errors that should be exposed to the client
/// (e.g., "Ratings must be between 1 and 5"). These are returned as-is
/// with a BAD_REQUEST status.
fn internal_error(e: impl std::fmt::Display) -> (StatusCode, String) {
    let msg = e.to_string();

    // Known validation errors that are safe to expose
    if msg.contains("not found")
        || msg.contains("already taken")
        || msg.contains("between 1 and 5")
    {
        tracing::warn!("Validation error: {}", msg);
        return (StatusCode::BAD_REQUEST, msg);
    }

    tracing::error!("Internal error: {}", msg);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "Internal server error".to_string(),
    )
}

/// Reject callers whose role is not in the allowed set.
fn require_role(user: &User, roles: &[Role]) -> Result<(), (StatusCode, String)> {
    if roles.contains(&user.role) {
        Ok(())
    } else {
        Err((
            StatusCode::FORBIDDEN,
            "Forbidden - Insufficient permissions".to_string(),
        ))
    }
}

// ============================================================
// Health
// ============================================================

pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

// ============================================================
// Accounts
// ============================================================

pub async fn register(
    State(db): State<Database>,
    Json(input): Json<RegisterInput>,
) -> Result<(StatusCode, Json<AuthResponse>), (StatusCode, String)> {
    let user = db
        .create_user(NewUser {
            username: input.username,
            password_hash: auth::hash_password(&input.password),
            full_name: input.full_name,
            role: input.role.unwrap_or(Role::Trainee),
        })
        .map_err(internal_error)?;

    let token = issue_token(&db, user.id).map_err(internal_error)?;
    Ok((StatusCode::CREATED, Json(AuthResponse { user, token })))
}

pub async fn login(
    State(db): State<Database>,
    Json(input): Json<LoginInput>,
) -> Result<Json<AuthResponse>, (StatusCode, String)> {
    let credentials = db
        .get_user_credentials(&input.username)
        .map_err(internal_error)?;

    // Same response whether the username or the password was wrong
    let Some((user, password_hash)) = credentials else {
        return Err(invalid_credentials());
    };
    if !auth::verify_password(&input.password, &password_hash) {
        return Err(invalid_credentials());
    }

    let token = issue_token(&db, user.id).map_err(internal_error)?;
    Ok(Json(AuthResponse { user, token }))
}

pub async fn logout(
    State(db): State<Database>,
    Extension(session): Extension<AuthSession>,
) -> Result<StatusCode, (StatusCode, String)> {
    db.revoke_auth_token(&session.token_fingerprint)
        .map_err(internal_error)?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn current_user(Extension(session): Extension<AuthSession>) -> Json<User> {
    Json(session.user)
}

fn issue_token(db: &Database, user_id: Uuid) -> anyhow::Result<String> {
    let token = auth::new_session_token();
    db.insert_auth_token(&auth::token_fingerprint(&token), user_id)?;
    Ok(token)
}

fn invalid_credentials() -> (StatusCode, String) {
    (
        StatusCode::UNAUTHORIZED,
        "Invalid username or password".to_string(),
    )
}

// ============================================================
// Sessions
// ============================================================

pub async fn list_sessions(
    State(db): State<Database>,
) -> Result<Json<Vec<TrainingSession>>, (StatusCode, String)> {
    db.get_all_sessions().map(Json).map_err(internal_error)
}

pub async fn create_session(
    State(db): State<Database>,
    Extension(session): Extension<AuthSession>,
    Json(input): Json<CreateSessionInput>,
) -> Result<(StatusCode, Json<TrainingSession>), (StatusCode, String)> {
    require_role(&session.user, &[Role::Admin, Role::Trainer])?;

    db.create_session(input)
        .map(|s| (StatusCode::CREATED, Json(s)))
        .map_err(internal_error)
}

pub async fn get_session(
    State(db): State<Database>,
    Path(id): Path<Uuid>,
) -> Result<Json<TrainingSession>, (StatusCode, String)> {
    db.get_session(id)
        .map_err(internal_error)?
        .map(Json)
        .ok_or((StatusCode::NOT_FOUND, "Session not found".to_string()))
}

// ============================================================
// Trainers
// ============================================================

pub async fn list_trainers(
    State(db): State<Database>,
) -> Result<Json<Vec<TrainerWithUser>>, (StatusCode, String)> {
    db.get_all_trainers_with_users()
        .map(Json)
        .map_err(internal_error)
}

pub async fn get_trainer_by_user(
    State(db): State<Database>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<TrainerWithUser>, (StatusCode, String)> {
    db.get_trainer_with_user_by_user(user_id)
        .map_err(internal_error)?
        .map(Json)
        .ok_or((
            StatusCode::NOT_FOUND,
            "Trainer profile not found".to_string(),
        ))
}

pub async fn create_trainer(
    State(db): State<Database>,
    Extension(session): Extension<AuthSession>,
    Json(input): Json<CreateTrainerInput>,
) -> Result<(StatusCode, Json<Trainer>), (StatusCode, String)> {
    require_role(&session.user, &[Role::Admin])?;

    db.create_trainer(input)
        .map(|t| (StatusCode::CREATED, Json(t)))
        .map_err(internal_error)
}

pub async fn update_trainer(
    State(db): State<Database>,
    Extension(session): Extension<AuthSession>,
    Path(id): Path<Uuid>,
    Json(input): Json<UpdateTrainerInput>,
) -> Result<Json<Trainer>, (StatusCode, String)> {
    let trainer = db
        .get_trainer(id)
        .map_err(internal_error)?
        .ok_or((StatusCode::NOT_FOUND, "Trainer not found".to_string()))?;

    // Trainers may only edit their own profile; admins may edit any
    if trainer.user_id != session.user.id && session.user.role != Role::Admin {
        return Err((
            StatusCode::FORBIDDEN,
            "Forbidden - You can only update your own trainer profile".to_string(),
        ));
    }

    db.update_trainer(id, input)
        .map_err(internal_error)?
        .map(Json)
        .ok_or((StatusCode::NOT_FOUND, "Trainer not found".to_string()))
}

// ============================================================
// Feedback
// ============================================================

pub async fn list_feedback(
    State(db): State<Database>,
    Extension(session): Extension<AuthSession>,
) -> Result<Json<Vec<Feedback>>, (StatusCode, String)> {
    require_role(&session.user, &[Role::Admin])?;

    db.get_all_feedback().map(Json).map_err(internal_error)
}

pub async fn create_feedback(
    State(db): State<Database>,
    Extension(session): Extension<AuthSession>,
    Json(input): Json<CreateFeedbackInput>,
) -> Result<(StatusCode, Json<Feedback>), (StatusCode, String)> {
    require_role(&session.user, &[Role::Trainee])?;

    db.create_feedback(session.user.id, input)
        .map(|f| (StatusCode::CREATED, Json(f)))
        .map_err(internal_error)
}

pub async fn list_session_feedback(
    State(db): State<Database>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<Vec<Feedback>>, (StatusCode, String)> {
    db.get_feedback_by_session(session_id)
        .map(Json)
        .map_err(internal_error)
}

pub async fn list_trainer_feedback(
    State(db): State<Database>,
    Extension(session): Extension<AuthSession>,
    Path(trainer_id): Path<Uuid>,
) -> Result<Json<Vec<Feedback>>, (StatusCode, String)> {
    require_role(&session.user, &[Role::Admin, Role::Trainer])?;

    // A trainer may only read feedback on their own sessions
    if session.user.role == Role::Trainer {
        let own = db
            .get_trainer_by_user(session.user.id)
            .map_err(internal_error)?;
        if own.map(|t| t.id) != Some(trainer_id) {
            return Err((
                StatusCode::FORBIDDEN,
                "Forbidden - You can only view your own feedback".to_string(),
            ));
        }
    }

    db.get_feedback_by_trainer(trainer_id)
        .map(Json)
        .map_err(internal_error)
}

pub async fn list_trainee_feedback(
    State(db): State<Database>,
    Extension(session): Extension<AuthSession>,
) -> Result<Json<Vec<Feedback>>, (StatusCode, String)> {
    require_role(&session.user, &[Role::Trainee])?;

    db.get_feedback_by_trainee(session.user.id)
        .map(Json)
        .map_err(internal_error)
}

// ============================================================
// Dashboard
// ============================================================

pub async fn dashboard(
    State(db): State<Database>,
    Extension(session): Extension<AuthSession>,
) -> Result<Json<DashboardResponse>, (StatusCode, String)> {
    let user = session.user;

    let response = match user.role {
        Role::Admin => {
            let feedback = db.get_all_feedback().map_err(internal_error)?;
            let trainers = db.get_all_trainers().map_err(internal_error)?;
            let sessions = db.get_all_sessions().map_err(internal_error)?;

            DashboardResponse::Admin(AdminDashboard {
                metrics: AdminMetrics {
                    total_trainers: trainers.len(),
                    total_feedback: feedback.len(),
                    avg_rating: average_rating(&feedback),
                    sentiment_score: average_sentiment(&feedback),
                    sentiment_distribution: sentiment_distribution(&feedback),
                },
                trainers,
                feedback,
                sessions,
            })
        }
        Role::Trainer => {
            let trainer = db
                .get_trainer_by_user(user.id)
                .map_err(internal_error)?
                .ok_or((
                    StatusCode::NOT_FOUND,
                    "Trainer profile not found".to_string(),
                ))?;

            let feedback = db
                .get_feedback_by_trainer(trainer.id)
                .map_err(internal_error)?;
            let sessions = db
                .get_sessions_by_trainer(trainer.id)
                .map_err(internal_error)?;

            DashboardResponse::Trainer(TrainerDashboard {
                metrics: TrainerMetrics {
                    total_sessions: sessions.len(),
                    total_feedback: feedback.len(),
                    avg_rating: average_rating(&feedback),
                    sentiment_score: average_sentiment(&feedback),
                    sentiment_distribution: sentiment_distribution(&feedback),
                },
                feedback,
                sessions,
            })
        }
        Role::Trainee => {
            let sessions = db.get_all_sessions().map_err(internal_error)?;
            let submitted_feedback = db
                .get_feedback_by_trainee(user.id)
                .map_err(internal_error)?;

            DashboardResponse::Trainee(TraineeDashboard {
                sessions,
                submitted_feedback,
            })
        }
    };

    Ok(Json(response))
}

/// Mean overall rating rounded to one decimal place; 0.0 with no feedback.
fn average_rating(feedback: &[Feedback]) -> f64 {
    if feedback.is_empty() {
        return 0.0;
    }

    let sum: i32 = feedback.iter().map(|f| f.overall_rating).sum();
    (sum as f64 / feedback.len() as f64 * 10.0).round() / 10.0
}

/// Mean sentiment score rounded to the nearest integer; 50 (neutral) with
/// no feedback.
fn average_sentiment(feedback: &[Feedback]) -> u8 {
    if feedback.is_empty() {
        return 50;
    }

    let sum: u32 = feedback.iter().map(|f| u32::from(f.sentiment_score)).sum();
    (f64::from(sum) / feedback.len() as f64).round() as u8
}

fn sentiment_distribution(feedback: &[Feedback]) -> SentimentDistribution {
    SentimentDistribution::tally(feedback.iter().map(|f| f.sentiment_score))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn feedback_with(overall_rating: i32, sentiment_score: u8) -> Feedback {
        Feedback {
            id: Uuid::new_v4(),
            session_id: Uuid::new_v4(),
            trainee_id: Uuid::new_v4(),
            overall_rating,
            knowledge_rating: 3,
            communication_rating: 3,
            materials_rating: 3,
            engagement_rating: 3,
            comments: None,
            strengths: Vec::new(),
            improvements: Vec::new(),
            sentiment_score,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn average_rating_rounds_to_one_decimal() {
        let feedback = vec![
            feedback_with(5, 50),
            feedback_with(4, 50),
            feedback_with(4, 50),
        ];
        // 13 / 3 = 4.333... -> 4.3
        assert_eq!(average_rating(&feedback), 4.3);
    }

    #[test]
    fn average_rating_of_nothing_is_zero() {
        assert_eq!(average_rating(&[]), 0.0);
    }

    #[test]
    fn average_sentiment_rounds_to_integer() {
        let feedback = vec![feedback_with(3, 100), feedback_with(3, 33)];
        // (100 + 33) / 2 = 66.5 -> 67
        assert_eq!(average_sentiment(&feedback), 67);
    }

    #[test]
    fn average_sentiment_of_nothing_is_neutral() {
        assert_eq!(average_sentiment(&[]), 50);
    }

    #[test]
    fn distribution_buckets_feedback_scores() {
        let feedback = vec![
            feedback_with(5, 90),
            feedback_with(3, 50),
            feedback_with(1, 10),
        ];
        let distribution = sentiment_distribution(&feedback);
        assert_eq!(distribution.positive, 1);
        assert_eq!(distribution.neutral, 1);
        assert_eq!(distribution.negative, 1);
    }
}
