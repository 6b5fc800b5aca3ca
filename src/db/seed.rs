//! Demo-data bootstrap for local development.
//!
//! Idempotent: accounts are keyed by username and sessions are only
//! created for trainers that have none, so re-running `trainpulse seed`
//! is safe.

use anyhow::Result;
use chrono::{Duration, Utc};

use super::Database;
use crate::auth;
use crate::models::*;

const DEMO_PASSWORD: &str = "password";

struct DemoTrainer {
    username: &'static str,
    full_name: &'static str,
    department: &'static str,
    specialty: &'static str,
}

const DEMO_TRAINERS: &[DemoTrainer] = &[
    DemoTrainer {
        username: "trainer",
        full_name: "Sarah Johnson",
        department: "Engineering",
        specialty: "Technical Training",
    },
    DemoTrainer {
        username: "trainer1",
        full_name: "Michael Davis",
        department: "Design",
        specialty: "UX/UI Design",
    },
    DemoTrainer {
        username: "trainer2",
        full_name: "Emily Wilson",
        department: "Data Science",
        specialty: "Machine Learning",
    },
];

const DEMO_TRAINEES: &[(&str, &str)] = &[
    ("trainee", "John Smith"),
    ("trainee1", "Lisa Brown"),
    ("trainee2", "Robert Garcia"),
];

const DEMO_SESSIONS: &[(&str, &str)] = &[
    (
        "Introduction to JavaScript",
        "Learn the fundamentals of the JavaScript programming language.",
    ),
    (
        "Advanced React Development",
        "Dive deep into advanced React concepts and best practices.",
    ),
    (
        "Database Design Fundamentals",
        "Understanding database design principles and normalization.",
    ),
];

pub fn seed_demo_data(db: &Database) -> Result<()> {
    ensure_user(db, "admin", "Admin User", Role::Admin)?;

    for demo in DEMO_TRAINERS {
        let user = ensure_user(db, demo.username, demo.full_name, Role::Trainer)?;
        if db.get_trainer_by_user(user.id)?.is_none() {
            db.create_trainer(CreateTrainerInput {
                user_id: user.id,
                department: demo.department.to_string(),
                specialty: demo.specialty.to_string(),
            })?;
            tracing::info!("Created trainer profile for {}", demo.username);
        }
    }

    for (username, full_name) in DEMO_TRAINEES {
        ensure_user(db, username, full_name, Role::Trainee)?;
    }

    // One batch of sessions per trainer that has none yet, spread over
    // the coming weeks.
    for (index, trainer) in db.get_all_trainers()?.into_iter().enumerate() {
        if !db.get_sessions_by_trainer(trainer.id)?.is_empty() {
            continue;
        }
        let (title, description) = DEMO_SESSIONS[index % DEMO_SESSIONS.len()];
        db.create_session(CreateSessionInput {
            trainer_id: trainer.id,
            title: title.to_string(),
            date: Some(Utc::now() + Duration::weeks(index as i64 + 1)),
            description: description.to_string(),
        })?;
    }

    Ok(())
}

fn ensure_user(db: &Database, username: &str, full_name: &str, role: Role) -> Result<User> {
    if let Some(existing) = db.get_user_by_username(username)? {
        return Ok(existing);
    }

    let user = db.create_user(NewUser {
        username: username.to_string(),
        password_hash: auth::hash_password(DEMO_PASSWORD),
        full_name: full_name.to_string(),
        role,
    })?;
    tracing::info!("Created demo user {}", username);
    Ok(user)
}
