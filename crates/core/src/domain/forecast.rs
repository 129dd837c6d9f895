use crate::suitability::SuitabilityVector;
use anyhow::ensure;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The two readings the suitability scorer consumes, validated at
/// construction. Negative or non-finite readings are upstream data-quality
/// bugs and are rejected here instead of being clamped away.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Conditions {
    pub wave_height_ft: f64,
    pub wind_speed_knots: f64,
}

impl Conditions {
    pub fn new(wave_height_ft: f64, wind_speed_knots: f64) -> anyhow::Result<Self> {
        ensure!(
            wave_height_ft.is_finite() && wave_height_ft >= 0.0,
            "wave height must be a non-negative number of feet (got {wave_height_ft})"
        );
        ensure!(
            wind_speed_knots.is_finite() && wind_speed_knots >= 0.0,
            "wind speed must be a non-negative number of knots (got {wind_speed_knots})"
        );
        Ok(Self {
            wave_height_ft,
            wind_speed_knots,
        })
    }

    pub fn suitability(&self) -> SuitabilityVector {
        SuitabilityVector::rate(self.wave_height_ft, self.wind_speed_knots)
    }
}

/// Display buckets for wave height in feet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WaveBand {
    Tiny,
    Small,
    Medium,
    Large,
    Huge,
}

impl WaveBand {
    pub fn classify(wave_height_ft: f64) -> Self {
        if wave_height_ft < 1.0 {
            WaveBand::Tiny
        } else if wave_height_ft < 3.0 {
            WaveBand::Small
        } else if wave_height_ft < 6.0 {
            WaveBand::Medium
        } else if wave_height_ft < 10.0 {
            WaveBand::Large
        } else {
            WaveBand::Huge
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            WaveBand::Tiny => "Tiny",
            WaveBand::Small => "Small",
            WaveBand::Medium => "Medium",
            WaveBand::Large => "Large",
            WaveBand::Huge => "Huge",
        }
    }
}

/// One beach's current conditions, already unit-normalized: heights in
/// feet, speeds in knots, temperatures in Fahrenheit, directions as
/// 16-point compass strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastConditions {
    pub wave_height_ft: f64,
    pub wave_period_sec: f64,
    pub wave_direction: String,
    pub swell_height_ft: Option<f64>,
    pub swell_period_sec: Option<f64>,
    pub swell_direction: Option<String>,
    pub wind_speed_knots: f64,
    pub wind_gusts_knots: Option<f64>,
    pub wind_direction: String,
    pub air_temp_f: i32,
    pub water_temp_f: i32,
    pub weather_code: Option<u16>,
    pub weather_description: Option<String>,
    /// Marine providers do not report tide; kept at zero until one does.
    pub tide_height_ft: f64,
    /// Provider confidence, 0-100.
    pub confidence: u8,
}

/// A forecast observation for one beach plus its per-level suitability.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastSnapshot {
    pub beach_id: String,
    pub fetched_at: DateTime<Utc>,
    pub conditions: ForecastConditions,
    pub suitability: SuitabilityVector,
}
