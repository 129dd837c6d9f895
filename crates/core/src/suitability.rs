use crate::domain::level::SkillLevel;
use serde::{Deserialize, Serialize};

// Wind penalties apply to every level, after the wave-height penalties.
const WIND_STRONG_KNOTS: f64 = 20.0;
const WIND_SEVERE_KNOTS: f64 = 30.0;

/// Rate conditions for one skill level, 0-100.
///
/// Starts at 100 and subtracts stacking penalties; thresholds are plain
/// `if`s, so one wave height can trigger several penalties at once (5 ft
/// for a beginner loses both the >3 ft and >4 ft penalties, 80 total).
/// Inputs are not validated here; out-of-range readings are rejected where
/// raw data enters the system. The result is clamped to 0-100 for any
/// finite input.
pub fn score_for_level(wave_height_ft: f64, wind_speed_knots: f64, level: SkillLevel) -> u8 {
    let mut score: i32 = 100;

    match level {
        SkillLevel::Beginner => {
            if wave_height_ft < 1.0 {
                score -= 20; // too flat
            }
            if wave_height_ft > 3.0 {
                score -= 30; // too big
            }
            if wave_height_ft > 4.0 {
                score -= 50;
            }
        }
        SkillLevel::Intermediate => {
            if wave_height_ft < 1.0 {
                score -= 15;
            }
            if wave_height_ft < 2.0 {
                score -= 10;
            }
            if wave_height_ft > 6.0 {
                score -= 20;
            }
            if wave_height_ft > 8.0 {
                score -= 50;
            }
        }
        SkillLevel::Advanced => {
            if wave_height_ft < 1.0 {
                score -= 10;
            }
            if wave_height_ft > 10.0 {
                score -= 15;
            }
        }
        SkillLevel::Expert => {
            // Experts can handle anything; only dead-flat days lose points.
            if wave_height_ft < 2.0 {
                score -= 5;
            }
        }
    }

    if wind_speed_knots > WIND_STRONG_KNOTS {
        score -= 15;
    }
    if wind_speed_knots > WIND_SEVERE_KNOTS {
        score -= 35;
    }

    score.clamp(0, 100) as u8
}

/// Suitability of one set of conditions for all four skill levels.
///
/// One field per level, so the "exactly four entries" invariant holds by
/// construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuitabilityVector {
    pub beginner: u8,
    pub intermediate: u8,
    pub advanced: u8,
    pub expert: u8,
}

impl SuitabilityVector {
    /// Score the same conditions once per level.
    pub fn rate(wave_height_ft: f64, wind_speed_knots: f64) -> Self {
        Self {
            beginner: score_for_level(wave_height_ft, wind_speed_knots, SkillLevel::Beginner),
            intermediate: score_for_level(
                wave_height_ft,
                wind_speed_knots,
                SkillLevel::Intermediate,
            ),
            advanced: score_for_level(wave_height_ft, wind_speed_knots, SkillLevel::Advanced),
            expert: score_for_level(wave_height_ft, wind_speed_knots, SkillLevel::Expert),
        }
    }

    pub fn for_level(&self, level: SkillLevel) -> u8 {
        match level {
            SkillLevel::Beginner => self.beginner,
            SkillLevel::Intermediate => self.intermediate,
            SkillLevel::Advanced => self.advanced,
            SkillLevel::Expert => self.expert,
        }
    }
}
