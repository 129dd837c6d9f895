use anyhow::{ensure, Context, Result};
use lineup_core::domain::contract::{RawAvailabilityWindow, RawSession};
use lineup_core::domain::session::{AvailabilityWindow, Session};
use lineup_core::ingest::types::ProviderReadings;
use std::collections::HashSet;
use std::path::Path;

pub fn load_sessions(path: &Path) -> Result<Vec<Session>> {
    let json = read(path)?;
    parse_sessions(&json).with_context(|| format!("invalid sessions file {}", path.display()))
}

pub fn load_availability(path: &Path) -> Result<Vec<AvailabilityWindow>> {
    let json = read(path)?;
    parse_availability(&json)
        .with_context(|| format!("invalid availability file {}", path.display()))
}

pub fn load_readings(path: &Path) -> Result<ProviderReadings> {
    let json = read(path)?;
    parse_readings(&json).with_context(|| format!("invalid readings file {}", path.display()))
}

pub fn parse_sessions(json: &str) -> Result<Vec<Session>> {
    let raw: Vec<RawSession> = serde_json::from_str(json)?;
    let sessions = raw
        .into_iter()
        .map(RawSession::validate_and_into_session)
        .collect::<Result<Vec<_>>>()?;

    let mut seen = HashSet::new();
    for session in &sessions {
        ensure!(
            seen.insert(session.id.as_str()),
            "duplicate session id {}",
            session.id
        );
    }
    Ok(sessions)
}

pub fn parse_availability(json: &str) -> Result<Vec<AvailabilityWindow>> {
    let raw: Vec<RawAvailabilityWindow> = serde_json::from_str(json)?;
    raw.into_iter()
        .map(RawAvailabilityWindow::validate_and_into_window)
        .collect()
}

pub fn parse_readings(json: &str) -> Result<ProviderReadings> {
    Ok(serde_json::from_str(json)?)
}

fn read(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use lineup_core::domain::level::SkillLevel;

    #[test]
    fn parses_a_session_list() {
        let json = r#"[
            {
                "id": "sess_dawn",
                "beach_id": "beach_hadera",
                "scheduled_time": "2025-06-07T05:30:00Z",
                "min_level": "intermediate",
                "max_level": "expert",
                "max_participants": 4,
                "participants": [{"user_id": "u1"}]
            }
        ]"#;
        let sessions = parse_sessions(json).unwrap();
        assert_eq!(sessions.len(), 1);
        assert_eq!(sessions[0].min_level, SkillLevel::Intermediate);
        assert_eq!(sessions[0].participants[0].user_id, "u1");
    }

    #[test]
    fn rejects_duplicate_session_ids() {
        let json = r#"[
            {"id": "s1", "beach_id": "b", "scheduled_time": "2025-06-07T05:30:00Z",
             "min_level": "beginner", "max_level": "expert", "max_participants": 4},
            {"id": "s1", "beach_id": "b", "scheduled_time": "2025-06-08T05:30:00Z",
             "min_level": "beginner", "max_level": "expert", "max_participants": 4}
        ]"#;
        let err = parse_sessions(json).unwrap_err();
        assert!(err.to_string().contains("duplicate session id"));
    }

    #[test]
    fn session_validation_errors_surface() {
        let json = r#"[
            {"id": "s1", "beach_id": "b", "scheduled_time": "2025-06-07T05:30:00Z",
             "min_level": "expert", "max_level": "beginner", "max_participants": 4}
        ]"#;
        assert!(parse_sessions(json).is_err());
    }

    #[test]
    fn parses_availability_windows() {
        let json = r#"[
            {"day_of_week": 6, "start": "06:00", "end": "09:00"},
            {"day_of_week": 0, "start": "16:00", "end": "19:00"}
        ]"#;
        let windows = parse_availability(json).unwrap();
        assert_eq!(windows.len(), 2);
        assert_eq!(windows[1].day_of_week, 0);
    }

    #[test]
    fn parses_readings_with_and_without_weather() {
        let with_weather = r#"{
            "marine": {"wave_height": 0.8, "wave_period": 9.0, "wave_direction": 280.0,
                       "swell_wave_height": 0.5, "swell_wave_period": 11.0, "swell_wave_direction": 290.0},
            "weather": {"temperature_2m": 27.5, "weather_code": 1,
                        "wind_speed_10m": 14.0, "wind_direction_10m": 320.0, "wind_gusts_10m": 22.0}
        }"#;
        let readings = parse_readings(with_weather).unwrap();
        assert_eq!(readings.marine.wave_height, 0.8);
        assert!(readings.weather.is_some());

        let marine_only = r#"{
            "marine": {"wave_height": 0.8, "wave_period": null, "wave_direction": null,
                       "swell_wave_height": null, "swell_wave_period": null, "swell_wave_direction": null}
        }"#;
        let readings = parse_readings(marine_only).unwrap();
        assert!(readings.weather.is_none());
    }
}
