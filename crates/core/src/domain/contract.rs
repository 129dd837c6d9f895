use crate::domain::level::SkillLevel;
use crate::domain::session::{
    AvailabilityWindow, ParticipantStatus, Session, SessionParticipant, SessionStatus,
};
use anyhow::{ensure, Context};
use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Session payload as it arrives from outside, before cross-field checks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawSession {
    pub id: String,
    pub beach_id: String,
    pub scheduled_time: DateTime<Utc>,
    pub min_level: SkillLevel,
    pub max_level: SkillLevel,
    pub max_participants: u32,
    #[serde(default)]
    pub participants: Vec<RawParticipant>,
    #[serde(default = "default_session_status")]
    pub status: SessionStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawParticipant {
    pub user_id: String,
    #[serde(default = "default_participant_status")]
    pub status: ParticipantStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawAvailabilityWindow {
    pub day_of_week: u8,
    pub start: String,
    pub end: String,
}

fn default_session_status() -> SessionStatus {
    SessionStatus::Planned
}

fn default_participant_status() -> ParticipantStatus {
    ParticipantStatus::Confirmed
}

impl RawSession {
    pub fn validate_and_into_session(self) -> anyhow::Result<Session> {
        let id = self.id.trim().to_string();
        ensure!(!id.is_empty(), "session id must be non-empty");

        let beach_id = self.beach_id.trim().to_string();
        ensure!(
            !beach_id.is_empty(),
            "session {id}: beach id must be non-empty"
        );

        ensure!(
            self.min_level <= self.max_level,
            "session {id}: min level {} is above max level {}",
            self.min_level,
            self.max_level
        );
        ensure!(
            self.max_participants >= 1,
            "session {id}: max participants must be at least 1"
        );

        let mut seen_users = BTreeSet::new();
        let mut participants = Vec::with_capacity(self.participants.len());
        for participant in self.participants {
            participants.push(participant.validate_and_into_participant(&id, &mut seen_users)?);
        }

        Ok(Session {
            id,
            beach_id,
            scheduled_time: self.scheduled_time,
            min_level: self.min_level,
            max_level: self.max_level,
            max_participants: self.max_participants,
            participants,
            status: self.status,
        })
    }
}

impl RawParticipant {
    fn validate_and_into_participant(
        self,
        session_id: &str,
        seen_users: &mut BTreeSet<String>,
    ) -> anyhow::Result<SessionParticipant> {
        let user_id = self.user_id.trim().to_string();
        ensure!(
            !user_id.is_empty(),
            "session {session_id}: participant user id must be non-empty"
        );
        ensure!(
            seen_users.insert(user_id.clone()),
            "session {session_id}: duplicate participant {user_id}"
        );
        Ok(SessionParticipant {
            user_id,
            status: self.status,
        })
    }
}

impl RawAvailabilityWindow {
    pub fn validate_and_into_window(self) -> anyhow::Result<AvailabilityWindow> {
        let start = parse_clock(&self.start)?;
        let end = parse_clock(&self.end)?;
        AvailabilityWindow::new(self.day_of_week, start, end)
    }
}

fn parse_clock(raw: &str) -> anyhow::Result<NaiveTime> {
    NaiveTime::parse_from_str(raw.trim(), "%H:%M")
        .with_context(|| format!("invalid clock time {raw:?}, expected HH:MM"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;
    use serde_json::json;

    fn raw_session_value() -> serde_json::Value {
        json!({
            "id": "sess_1",
            "beach_id": "beach_hadera",
            "scheduled_time": "2025-06-07T08:00:00Z",
            "min_level": "beginner",
            "max_level": "advanced",
            "max_participants": 6,
            "participants": [
                {"user_id": "u1", "status": "confirmed"},
                {"user_id": "u2", "status": "pending"}
            ],
            "status": "planned"
        })
    }

    #[test]
    fn valid_session_passes() {
        let raw: RawSession = serde_json::from_value(raw_session_value()).unwrap();
        let session = raw.validate_and_into_session().unwrap();
        assert_eq!(session.id, "sess_1");
        assert_eq!(session.min_level, SkillLevel::Beginner);
        assert_eq!(session.participants.len(), 2);
        assert_eq!(session.confirmed_count(), 1);
    }

    #[test]
    fn statuses_default_when_omitted() {
        let mut value = raw_session_value();
        value.as_object_mut().unwrap().remove("status");
        value["participants"][1]
            .as_object_mut()
            .unwrap()
            .remove("status");
        let raw: RawSession = serde_json::from_value(value).unwrap();
        let session = raw.validate_and_into_session().unwrap();
        assert_eq!(session.status, SessionStatus::Planned);
        assert_eq!(session.participants[1].status, ParticipantStatus::Confirmed);
    }

    #[test]
    fn inverted_level_range_is_rejected() {
        let mut value = raw_session_value();
        value["min_level"] = json!("expert");
        let raw: RawSession = serde_json::from_value(value).unwrap();
        let err = raw.validate_and_into_session().unwrap_err();
        assert!(err.to_string().contains("above max level"));
    }

    #[test]
    fn duplicate_participants_are_rejected() {
        let mut value = raw_session_value();
        value["participants"][1]["user_id"] = json!("u1");
        let raw: RawSession = serde_json::from_value(value).unwrap();
        let err = raw.validate_and_into_session().unwrap_err();
        assert!(err.to_string().contains("duplicate participant"));
    }

    #[test]
    fn zero_capacity_is_rejected() {
        let mut value = raw_session_value();
        value["max_participants"] = json!(0);
        let raw: RawSession = serde_json::from_value(value).unwrap();
        assert!(raw.validate_and_into_session().is_err());
    }

    #[test]
    fn unknown_level_fails_at_parse_time() {
        let mut value = raw_session_value();
        value["max_level"] = json!("legendary");
        assert!(serde_json::from_value::<RawSession>(value).is_err());
    }

    #[test]
    fn window_parses_clock_strings() {
        let raw = RawAvailabilityWindow {
            day_of_week: 6,
            start: "06:00".into(),
            end: "09:30".into(),
        };
        let window = raw.validate_and_into_window().unwrap();
        assert_eq!(window.day_of_week, 6);
        assert_eq!(window.start.hour(), 6);
        assert_eq!(window.end.minute(), 30);
    }

    #[test]
    fn window_rejects_garbage_clock() {
        let raw = RawAvailabilityWindow {
            day_of_week: 0,
            start: "dawn".into(),
            end: "09:00".into(),
        };
        let err = raw.validate_and_into_window().unwrap_err();
        assert!(err.to_string().contains("invalid clock time"));
    }
}
