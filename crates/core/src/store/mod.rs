use crate::domain::session::{AvailabilityWindow, Session};
use anyhow::Result;
use chrono::{DateTime, Utc};

pub mod memory;

pub use memory::{MemoryAvailabilityStore, MemorySessionStore};

#[async_trait::async_trait]
pub trait SessionStore: Send + Sync {
    /// Joinable sessions scheduled after `now`, cancelled ones excluded.
    async fn upcoming_sessions(&self, now: DateTime<Utc>) -> Result<Vec<Session>>;

    /// Past sessions the user actually attended, for the social and
    /// home-beach signals.
    async fn history_for(&self, user_id: &str, now: DateTime<Utc>) -> Result<Vec<Session>>;
}

#[async_trait::async_trait]
pub trait AvailabilityStore: Send + Sync {
    async fn windows_for(&self, user_id: &str) -> Result<Vec<AvailabilityWindow>>;
}
