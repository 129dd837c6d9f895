use crate::domain::level::SkillLevel;
use anyhow::ensure;
use chrono::{DateTime, Datelike, NaiveTime, Timelike, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    Planned,
    Active,
    Completed,
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParticipantStatus {
    Confirmed,
    Pending,
    Declined,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionParticipant {
    pub user_id: String,
    pub status: ParticipantStatus,
}

/// A planned group surf at one beach. Skill bounds are inclusive on both
/// ends; participants include everyone who has responded, whatever the
/// response was.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub id: String,
    pub beach_id: String,
    pub scheduled_time: DateTime<Utc>,
    pub min_level: SkillLevel,
    pub max_level: SkillLevel,
    pub max_participants: u32,
    pub participants: Vec<SessionParticipant>,
    pub status: SessionStatus,
}

impl Session {
    pub fn confirmed_count(&self) -> usize {
        self.participants
            .iter()
            .filter(|p| p.status == ParticipantStatus::Confirmed)
            .count()
    }

    pub fn has_room(&self) -> bool {
        (self.confirmed_count() as u32) < self.max_participants
    }

    pub fn level_range_contains(&self, level: SkillLevel) -> bool {
        (self.min_level..=self.max_level).contains(&level)
    }
}

/// A weekly recurring slot in a surfer's calendar. Days run Sunday = 0
/// through Saturday = 6; a session matches when it falls on the window's
/// day and its start hour is at or after the window start and strictly
/// before the window end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailabilityWindow {
    pub day_of_week: u8,
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl AvailabilityWindow {
    pub fn new(day_of_week: u8, start: NaiveTime, end: NaiveTime) -> anyhow::Result<Self> {
        ensure!(
            day_of_week <= 6,
            "day of week must be 0 (Sunday) through 6 (Saturday), got {day_of_week}"
        );
        ensure!(
            start < end,
            "availability window must start before it ends ({start} >= {end})"
        );
        Ok(Self {
            day_of_week,
            start,
            end,
        })
    }

    pub fn covers(&self, at: DateTime<Utc>) -> bool {
        at.weekday().num_days_from_sunday() == u32::from(self.day_of_week)
            && (self.start.hour()..self.end.hour()).contains(&at.hour())
    }
}
