use crate::domain::session::{AvailabilityWindow, ParticipantStatus, Session, SessionStatus};
use crate::store::{AvailabilityStore, SessionStore};
use anyhow::Result;
use chrono::{DateTime, Utc};
use std::collections::HashMap;

/// Session store over a plain vector. Fixture-driven runs and tests use
/// this; a database-backed store implements the same trait.
#[derive(Debug, Clone, Default)]
pub struct MemorySessionStore {
    sessions: Vec<Session>,
}

impl MemorySessionStore {
    pub fn new(sessions: Vec<Session>) -> Self {
        Self { sessions }
    }
}

#[async_trait::async_trait]
impl SessionStore for MemorySessionStore {
    async fn upcoming_sessions(&self, now: DateTime<Utc>) -> Result<Vec<Session>> {
        Ok(self
            .sessions
            .iter()
            .filter(|s| s.scheduled_time > now && s.status != SessionStatus::Cancelled)
            .cloned()
            .collect())
    }

    async fn history_for(&self, user_id: &str, now: DateTime<Utc>) -> Result<Vec<Session>> {
        Ok(self
            .sessions
            .iter()
            .filter(|s| {
                s.scheduled_time <= now
                    && s.status != SessionStatus::Cancelled
                    && s.participants
                        .iter()
                        .any(|p| p.user_id == user_id && p.status == ParticipantStatus::Confirmed)
            })
            .cloned()
            .collect())
    }
}

#[derive(Debug, Clone, Default)]
pub struct MemoryAvailabilityStore {
    windows: HashMap<String, Vec<AvailabilityWindow>>,
}

impl MemoryAvailabilityStore {
    pub fn new(windows: HashMap<String, Vec<AvailabilityWindow>>) -> Self {
        Self { windows }
    }

    pub fn insert(&mut self, user_id: impl Into<String>, windows: Vec<AvailabilityWindow>) {
        self.windows.insert(user_id.into(), windows);
    }
}

#[async_trait::async_trait]
impl AvailabilityStore for MemoryAvailabilityStore {
    async fn windows_for(&self, user_id: &str) -> Result<Vec<AvailabilityWindow>> {
        Ok(self.windows.get(user_id).cloned().unwrap_or_default())
    }
}
