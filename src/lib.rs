//! TrainPulse: a feedback service for training sessions.
//!
//! Trainees rate sessions and leave free-text comments; trainers and
//! admins read aggregated metrics over the collected feedback. Each
//! comment is scored once at submission time by the lexicon scorer in
//! [`sentiment`] and the score is stored with the feedback record.

pub mod api;
pub mod auth;
pub mod db;
pub mod models;
pub mod sentiment;
