use serde::{Deserialize, Serialize};

/// Current sea state as a marine provider reports it: metric units,
/// directions in degrees. Field names follow the Open-Meteo marine
/// current block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawMarineReading {
    /// Meters.
    pub wave_height: f64,
    /// Seconds.
    pub wave_period: Option<f64>,
    /// Degrees.
    pub wave_direction: Option<f64>,
    pub swell_wave_height: Option<f64>,
    pub swell_wave_period: Option<f64>,
    pub swell_wave_direction: Option<f64>,
}

/// Current land weather near the beach. Wind here beats the marine wind
/// for shore conditions, but the whole block is optional and the
/// normalizer falls back to calm defaults without it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawWeatherReading {
    /// Celsius.
    pub temperature_2m: f64,
    /// WMO interpretation code.
    pub weather_code: Option<u16>,
    /// Kilometers per hour.
    pub wind_speed_10m: f64,
    /// Degrees.
    pub wind_direction_10m: f64,
    /// Kilometers per hour.
    pub wind_gusts_10m: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderReadings {
    pub marine: RawMarineReading,
    #[serde(default)]
    pub weather: Option<RawWeatherReading>,
}
