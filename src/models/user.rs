use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An account on the platform.
///
/// The password hash lives only in the storage layer and is never part
/// of this struct, so a `User` is always safe to serialize into a
/// response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub full_name: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

/// What an account is allowed to do.
///
/// - `Admin`: manages trainers and sees all feedback
/// - `Trainer`: delivers sessions and sees feedback on their own sessions
/// - `Trainee`: attends sessions and submits feedback
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    Trainer,
    Trainee,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Trainer => "trainer",
            Self::Trainee => "trainee",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "admin" => Some(Self::Admin),
            "trainer" => Some(Self::Trainer),
            "trainee" => Some(Self::Trainee),
            _ => None,
        }
    }
}

/// Input for registering a new account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterInput {
    pub username: String,
    pub password: String,
    pub full_name: String,
    /// Defaults to `Trainee` if not specified.
    #[serde(default)]
    pub role: Option<Role>,
}

/// Input for logging in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginInput {
    pub username: String,
    pub password: String,
}

/// A user record ready for insertion, with the password already hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub password_hash: String,
    pub full_name: String,
    pub role: Role,
}

/// Response for successful registration or login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub user: User,
    /// Opaque bearer token for subsequent requests.
    pub token: String,
}
