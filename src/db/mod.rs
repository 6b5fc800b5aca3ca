mod schema;
mod seed;

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use anyhow::Result;
use chrono::Utc;
use rusqlite::Connection;
use uuid::Uuid;

use crate::models::*;
use crate::sentiment;

pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    pub fn open(path: PathBuf) -> Result<Self> {
        let parent = path
            .parent()
            .ok_or_else(|| anyhow::anyhow!("Database path has no parent directory"))?;
        std::fs::create_dir_all(parent)?;
        let conn = Connection::open(&path)?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "foreign_keys", "ON")?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn open_default() -> Result<Self> {
        let dirs = directories::ProjectDirs::from("", "", "trainpulse")
            .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?;
        let db_path = dirs.data_dir().join("trainpulse.db");
        Self::open(db_path)
    }

    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.pragma_update(None, "foreign_keys", "ON")?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn migrate(&self) -> Result<()> {
        let conn = self.conn.lock().expect("database lock poisoned");
        schema::run_migrations(&conn)
    }

    /// Populate the database with the demo accounts and sample sessions.
    pub fn seed_demo_data(&self) -> Result<()> {
        seed::seed_demo_data(self)
    }

    // ============================================================
    // User operations
    // ============================================================

    pub fn create_user(&self, input: NewUser) -> Result<User> {
        if self.get_user_by_username(&input.username)?.is_some() {
            anyhow::bail!("Username already taken");
        }

        let conn = self.conn.lock().expect("database lock poisoned");
        let id = Uuid::new_v4();
        let now = Utc::now();

        conn.execute(
            "INSERT INTO users (id, username, password_hash, full_name, role, created_at)
             VALUES (?, ?, ?, ?, ?, ?)",
            (
                id.to_string(),
                &input.username,
                &input.password_hash,
                &input.full_name,
                input.role.as_str(),
                now.to_rfc3339(),
            ),
        )?;

        Ok(User {
            id,
            username: input.username,
            full_name: input.full_name,
            role: input.role,
            created_at: now,
        })
    }

    pub fn get_user(&self, id: Uuid) -> Result<Option<User>> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let mut stmt = conn.prepare(
            "SELECT id, username, full_name, role, created_at
             FROM users WHERE id = ?",
        )?;

        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            Ok(Some(User {
                id: parse_uuid(row.get::<_, String>(0)?),
                username: row.get(1)?,
                full_name: row.get(2)?,
                role: Role::from_str(&row.get::<_, String>(3)?).unwrap_or(Role::Trainee),
                created_at: parse_datetime(row.get::<_, String>(4)?),
            }))
        } else {
            Ok(None)
        }
    }

    pub fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let mut stmt = conn.prepare(
            "SELECT id, username, full_name, role, created_at
             FROM users WHERE username = ?",
        )?;

        let mut rows = stmt.query([username])?;
        if let Some(row) = rows.next()? {
            Ok(Some(User {
                id: parse_uuid(row.get::<_, String>(0)?),
                username: row.get(1)?,
                full_name: row.get(2)?,
                role: Role::from_str(&row.get::<_, String>(3)?).unwrap_or(Role::Trainee),
                created_at: parse_datetime(row.get::<_, String>(4)?),
            }))
        } else {
            Ok(None)
        }
    }

    /// Fetch a user together with their stored password hash, for login.
    pub fn get_user_credentials(&self, username: &str) -> Result<Option<(User, String)>> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let mut stmt = conn.prepare(
            "SELECT id, username, full_name, role, created_at, password_hash
             FROM users WHERE username = ?",
        )?;

        let mut rows = stmt.query([username])?;
        if let Some(row) = rows.next()? {
            let user = User {
                id: parse_uuid(row.get::<_, String>(0)?),
                username: row.get(1)?,
                full_name: row.get(2)?,
                role: Role::from_str(&row.get::<_, String>(3)?).unwrap_or(Role::Trainee),
                created_at: parse_datetime(row.get::<_, String>(4)?),
            };
            Ok(Some((user, row.get(5)?)))
        } else {
            Ok(None)
        }
    }

    // ============================================================
    // Trainer operations
    // ============================================================

    pub fn create_trainer(&self, input: CreateTrainerInput) -> Result<Trainer> {
        self.get_user(input.user_id)?
            .ok_or_else(|| anyhow::anyhow!("User not found"))?;

        let conn = self.conn.lock().expect("database lock poisoned");
        let id = Uuid::new_v4();
        let now = Utc::now();

        conn.execute(
            "INSERT INTO trainers (id, user_id, department, specialty, created_at)
             VALUES (?, ?, ?, ?, ?)",
            (
                id.to_string(),
                input.user_id.to_string(),
                &input.department,
                &input.specialty,
                now.to_rfc3339(),
            ),
        )?;

        Ok(Trainer {
            id,
            user_id: input.user_id,
            department: input.department,
            specialty: input.specialty,
            created_at: now,
        })
    }

    pub fn get_trainer(&self, id: Uuid) -> Result<Option<Trainer>> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let mut stmt = conn.prepare(
            "SELECT id, user_id, department, specialty, created_at
             FROM trainers WHERE id = ?",
        )?;

        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            Ok(Some(Trainer {
                id: parse_uuid(row.get::<_, String>(0)?),
                user_id: parse_uuid(row.get::<_, String>(1)?),
                department: row.get(2)?,
                specialty: row.get(3)?,
                created_at: parse_datetime(row.get::<_, String>(4)?),
            }))
        } else {
            Ok(None)
        }
    }

    pub fn get_trainer_by_user(&self, user_id: Uuid) -> Result<Option<Trainer>> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let mut stmt = conn.prepare(
            "SELECT id, user_id, department, specialty, created_at
             FROM trainers WHERE user_id = ?",
        )?;

        let mut rows = stmt.query([user_id.to_string()])?;
        if let Some(row) = rows.next()? {
            Ok(Some(Trainer {
                id: parse_uuid(row.get::<_, String>(0)?),
                user_id: parse_uuid(row.get::<_, String>(1)?),
                department: row.get(2)?,
                specialty: row.get(3)?,
                created_at: parse_datetime(row.get::<_, String>(4)?),
            }))
        } else {
            Ok(None)
        }
    }

    pub fn update_trainer(&self, id: Uuid, input: UpdateTrainerInput) -> Result<Option<Trainer>> {
        let Some(existing) = self.get_trainer(id)? else {
            return Ok(None);
        };

        let conn = self.conn.lock().expect("database lock poisoned");
        let department = input.department.unwrap_or(existing.department);
        let specialty = input.specialty.unwrap_or(existing.specialty);

        conn.execute(
            "UPDATE trainers SET department = ?, specialty = ? WHERE id = ?",
            (&department, &specialty, id.to_string()),
        )?;

        Ok(Some(Trainer {
            id,
            user_id: existing.user_id,
            department,
            specialty,
            created_at: existing.created_at,
        }))
    }

    pub fn get_all_trainers(&self) -> Result<Vec<Trainer>> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let mut stmt = conn.prepare(
            "SELECT id, user_id, department, specialty, created_at
             FROM trainers ORDER BY department, specialty",
        )?;

        let trainers = stmt
            .query_map([], |row| {
                Ok(Trainer {
                    id: parse_uuid(row.get::<_, String>(0)?),
                    user_id: parse_uuid(row.get::<_, String>(1)?),
                    department: row.get(2)?,
                    specialty: row.get(3)?,
                    created_at: parse_datetime(row.get::<_, String>(4)?),
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(trainers)
    }

    /// All trainers joined with the display fields of their user account.
    pub fn get_all_trainers_with_users(&self) -> Result<Vec<TrainerWithUser>> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let mut stmt = conn.prepare(
            "SELECT t.id, t.user_id, t.department, t.specialty, t.created_at,
                    u.full_name, u.username
             FROM trainers t JOIN users u ON u.id = t.user_id
             ORDER BY u.full_name",
        )?;

        let trainers = stmt
            .query_map([], |row| {
                Ok(TrainerWithUser {
                    trainer: Trainer {
                        id: parse_uuid(row.get::<_, String>(0)?),
                        user_id: parse_uuid(row.get::<_, String>(1)?),
                        department: row.get(2)?,
                        specialty: row.get(3)?,
                        created_at: parse_datetime(row.get::<_, String>(4)?),
                    },
                    full_name: row.get(5)?,
                    username: row.get(6)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(trainers)
    }

    /// The trainer profile for a user, joined with the user's display
    /// fields.
    pub fn get_trainer_with_user_by_user(&self, user_id: Uuid) -> Result<Option<TrainerWithUser>> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let mut stmt = conn.prepare(
            "SELECT t.id, t.user_id, t.department, t.specialty, t.created_at,
                    u.full_name, u.username
             FROM trainers t JOIN users u ON u.id = t.user_id
             WHERE t.user_id = ?",
        )?;

        let mut rows = stmt.query([user_id.to_string()])?;
        if let Some(row) = rows.next()? {
            Ok(Some(TrainerWithUser {
                trainer: Trainer {
                    id: parse_uuid(row.get::<_, String>(0)?),
                    user_id: parse_uuid(row.get::<_, String>(1)?),
                    department: row.get(2)?,
                    specialty: row.get(3)?,
                    created_at: parse_datetime(row.get::<_, String>(4)?),
                },
                full_name: row.get(5)?,
                username: row.get(6)?,
            }))
        } else {
            Ok(None)
        }
    }

    // ============================================================
    // Session operations
    // ============================================================

    pub fn create_session(&self, input: CreateSessionInput) -> Result<TrainingSession> {
        self.get_trainer(input.trainer_id)?
            .ok_or_else(|| anyhow::anyhow!("Trainer not found"))?;

        let conn = self.conn.lock().expect("database lock poisoned");
        let id = Uuid::new_v4();
        let date = input.date.unwrap_or_else(Utc::now);

        conn.execute(
            "INSERT INTO sessions (id, trainer_id, title, date, description)
             VALUES (?, ?, ?, ?, ?)",
            (
                id.to_string(),
                input.trainer_id.to_string(),
                &input.title,
                date.to_rfc3339(),
                &input.description,
            ),
        )?;

        Ok(TrainingSession {
            id,
            trainer_id: input.trainer_id,
            title: input.title,
            date,
            description: input.description,
        })
    }

    pub fn get_session(&self, id: Uuid) -> Result<Option<TrainingSession>> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let mut stmt = conn.prepare(
            "SELECT id, trainer_id, title, date, description
             FROM sessions WHERE id = ?",
        )?;

        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            Ok(Some(TrainingSession {
                id: parse_uuid(row.get::<_, String>(0)?),
                trainer_id: parse_uuid(row.get::<_, String>(1)?),
                title: row.get(2)?,
                date: parse_datetime(row.get::<_, String>(3)?),
                description: row.get(4)?,
            }))
        } else {
            Ok(None)
        }
    }

    pub fn get_all_sessions(&self) -> Result<Vec<TrainingSession>> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let mut stmt = conn.prepare(
            "SELECT id, trainer_id, title, date, description
             FROM sessions ORDER BY date",
        )?;

        let sessions = stmt
            .query_map([], |row| {
                Ok(TrainingSession {
                    id: parse_uuid(row.get::<_, String>(0)?),
                    trainer_id: parse_uuid(row.get::<_, String>(1)?),
                    title: row.get(2)?,
                    date: parse_datetime(row.get::<_, String>(3)?),
                    description: row.get(4)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(sessions)
    }

    pub fn get_sessions_by_trainer(&self, trainer_id: Uuid) -> Result<Vec<TrainingSession>> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let mut stmt = conn.prepare(
            "SELECT id, trainer_id, title, date, description
             FROM sessions WHERE trainer_id = ? ORDER BY date",
        )?;

        let sessions = stmt
            .query_map([trainer_id.to_string()], |row| {
                Ok(TrainingSession {
                    id: parse_uuid(row.get::<_, String>(0)?),
                    trainer_id: parse_uuid(row.get::<_, String>(1)?),
                    title: row.get(2)?,
                    date: parse_datetime(row.get::<_, String>(3)?),
                    description: row.get(4)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(sessions)
    }

    // ============================================================
    // Feedback operations
    // ============================================================

    pub fn create_feedback(&self, trainee_id: Uuid, input: CreateFeedbackInput) -> Result<Feedback> {
        self.get_session(input.session_id)?
            .ok_or_else(|| anyhow::anyhow!("Session not found"))?;

        let ratings = [
            input.overall_rating,
            input.knowledge_rating,
            input.communication_rating,
            input.materials_rating,
            input.engagement_rating,
        ];
        if ratings.iter().any(|r| !(1..=5).contains(r)) {
            anyhow::bail!("Ratings must be between 1 and 5");
        }

        // The sentiment score is derived from the comment exactly once,
        // here; an absent comment scores as the empty string.
        let sentiment_score = sentiment::score(input.comments.as_deref().unwrap_or(""));

        let conn = self.conn.lock().expect("database lock poisoned");
        let id = Uuid::new_v4();
        let now = Utc::now();

        conn.execute(
            "INSERT INTO feedback (id, session_id, trainee_id, overall_rating, knowledge_rating,
                                   communication_rating, materials_rating, engagement_rating,
                                   comments, strengths, improvements, sentiment_score, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
            (
                id.to_string(),
                input.session_id.to_string(),
                trainee_id.to_string(),
                input.overall_rating,
                input.knowledge_rating,
                input.communication_rating,
                input.materials_rating,
                input.engagement_rating,
                &input.comments,
                serde_json::to_string(&input.strengths)?,
                serde_json::to_string(&input.improvements)?,
                sentiment_score,
                now.to_rfc3339(),
            ),
        )?;

        Ok(Feedback {
            id,
            session_id: input.session_id,
            trainee_id,
            overall_rating: input.overall_rating,
            knowledge_rating: input.knowledge_rating,
            communication_rating: input.communication_rating,
            materials_rating: input.materials_rating,
            engagement_rating: input.engagement_rating,
            comments: input.comments,
            strengths: input.strengths,
            improvements: input.improvements,
            sentiment_score,
            created_at: now,
        })
    }

    pub fn get_all_feedback(&self) -> Result<Vec<Feedback>> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let mut stmt = conn.prepare(
            "SELECT id, session_id, trainee_id, overall_rating, knowledge_rating,
                    communication_rating, materials_rating, engagement_rating,
                    comments, strengths, improvements, sentiment_score, created_at
             FROM feedback ORDER BY created_at DESC",
        )?;

        let feedback = stmt
            .query_map([], map_feedback_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(feedback)
    }

    pub fn get_feedback_by_session(&self, session_id: Uuid) -> Result<Vec<Feedback>> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let mut stmt = conn.prepare(
            "SELECT id, session_id, trainee_id, overall_rating, knowledge_rating,
                    communication_rating, materials_rating, engagement_rating,
                    comments, strengths, improvements, sentiment_score, created_at
             FROM feedback WHERE session_id = ? ORDER BY created_at DESC",
        )?;

        let feedback = stmt
            .query_map([session_id.to_string()], map_feedback_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(feedback)
    }

    /// All feedback on any of a trainer's sessions.
    pub fn get_feedback_by_trainer(&self, trainer_id: Uuid) -> Result<Vec<Feedback>> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let mut stmt = conn.prepare(
            "SELECT f.id, f.session_id, f.trainee_id, f.overall_rating, f.knowledge_rating,
                    f.communication_rating, f.materials_rating, f.engagement_rating,
                    f.comments, f.strengths, f.improvements, f.sentiment_score, f.created_at
             FROM feedback f JOIN sessions s ON s.id = f.session_id
             WHERE s.trainer_id = ? ORDER BY f.created_at DESC",
        )?;

        let feedback = stmt
            .query_map([trainer_id.to_string()], map_feedback_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(feedback)
    }

    pub fn get_feedback_by_trainee(&self, trainee_id: Uuid) -> Result<Vec<Feedback>> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let mut stmt = conn.prepare(
            "SELECT id, session_id, trainee_id, overall_rating, knowledge_rating,
                    communication_rating, materials_rating, engagement_rating,
                    comments, strengths, improvements, sentiment_score, created_at
             FROM feedback WHERE trainee_id = ? ORDER BY created_at DESC",
        )?;

        let feedback = stmt
            .query_map([trainee_id.to_string()], map_feedback_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(feedback)
    }

    // ============================================================
    // Auth token operations
    // ============================================================

    pub fn insert_auth_token(&self, fingerprint: &str, user_id: Uuid) -> Result<()> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let now = Utc::now();

        conn.execute(
            "INSERT INTO auth_tokens (token_hash, user_id, created_at) VALUES (?, ?, ?)",
            (fingerprint, user_id.to_string(), now.to_rfc3339()),
        )?;

        Ok(())
    }

    /// Resolve a token fingerprint to its user, if the token is live.
    pub fn user_for_token(&self, fingerprint: &str) -> Result<Option<User>> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let mut stmt = conn.prepare(
            "SELECT u.id, u.username, u.full_name, u.role, u.created_at
             FROM auth_tokens a JOIN users u ON u.id = a.user_id
             WHERE a.token_hash = ?",
        )?;

        let mut rows = stmt.query([fingerprint])?;
        if let Some(row) = rows.next()? {
            Ok(Some(User {
                id: parse_uuid(row.get::<_, String>(0)?),
                username: row.get(1)?,
                full_name: row.get(2)?,
                role: Role::from_str(&row.get::<_, String>(3)?).unwrap_or(Role::Trainee),
                created_at: parse_datetime(row.get::<_, String>(4)?),
            }))
        } else {
            Ok(None)
        }
    }

    pub fn revoke_auth_token(&self, fingerprint: &str) -> Result<bool> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let rows = conn.execute("DELETE FROM auth_tokens WHERE token_hash = ?", [fingerprint])?;
        Ok(rows > 0)
    }
}

impl Clone for Database {
    fn clone(&self) -> Self {
        Self {
            conn: self.conn.clone(),
        }
    }
}

fn map_feedback_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Feedback> {
    let strengths: String = row.get(9)?;
    let improvements: String = row.get(10)?;

    Ok(Feedback {
        id: parse_uuid(row.get::<_, String>(0)?),
        session_id: parse_uuid(row.get::<_, String>(1)?),
        trainee_id: parse_uuid(row.get::<_, String>(2)?),
        overall_rating: row.get(3)?,
        knowledge_rating: row.get(4)?,
        communication_rating: row.get(5)?,
        materials_rating: row.get(6)?,
        engagement_rating: row.get(7)?,
        comments: row.get(8)?,
        strengths: serde_json::from_str(&strengths).unwrap_or_default(),
        improvements: serde_json::from_str(&improvements).unwrap_or_default(),
        sentiment_score: row.get(11)?,
        created_at: parse_datetime(row.get::<_, String>(12)?),
    })
}

fn parse_uuid(s: String) -> Uuid {
    Uuid::parse_str(&s).unwrap_or_else(|_| Uuid::nil())
}

fn parse_datetime(s: String) -> chrono::DateTime<Utc> {
    chrono::DateTime::parse_from_rfc3339(&s)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}
