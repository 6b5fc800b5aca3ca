mod handlers;
mod middleware;

use axum::{
    middleware::from_fn_with_state,
    routing::{get, patch, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::db::Database;

pub fn create_router(db: Database) -> Router {
    let public = Router::new()
        .route("/health", get(handlers::health))
        .route("/register", post(handlers::register))
        .route("/login", post(handlers::login));

    let protected = Router::new()
        .route("/logout", post(handlers::logout))
        .route("/user", get(handlers::current_user))
        // Sessions
        .route("/sessions", get(handlers::list_sessions))
        .route("/sessions", post(handlers::create_session))
        .route("/sessions/{id}", get(handlers::get_session))
        // Trainers
        .route("/trainers", get(handlers::list_trainers))
        .route("/trainers", post(handlers::create_trainer))
        .route("/trainers/by-user/{user_id}", get(handlers::get_trainer_by_user))
        .route("/trainers/{id}", patch(handlers::update_trainer))
        // Feedback
        .route("/feedback", get(handlers::list_feedback))
        .route("/feedback", post(handlers::create_feedback))
        .route("/feedback/session/{session_id}", get(handlers::list_session_feedback))
        .route("/feedback/trainer/{trainer_id}", get(handlers::list_trainer_feedback))
        .route("/feedback/trainee", get(handlers::list_trainee_feedback))
        // Dashboard
        .route("/dashboard", get(handlers::dashboard))
        .route_layer(from_fn_with_state(db.clone(), middleware::require_auth));

    Router::new()
        .nest("/api/v1", public.merge(protected))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(db)
}
