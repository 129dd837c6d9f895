use crate::domain::forecast::{ForecastConditions, ForecastSnapshot};
use crate::ingest::types::{ProviderReadings, RawMarineReading, RawWeatherReading};
use crate::suitability::SuitabilityVector;
use anyhow::{ensure, Result};
use chrono::{DateTime, Datelike, Utc};

const FEET_PER_METER: f64 = 3.281;
const KNOTS_PER_KMH: f64 = 0.539957;

const DEFAULT_WAVE_PERIOD_SEC: f64 = 10.0;
const DEFAULT_WIND_DIRECTION: &str = "N";
const DEFAULT_AIR_TEMP_F: i32 = 70;
const DEFAULT_CONFIDENCE: u8 = 85;

const COMPASS_POINTS: [&str; 16] = [
    "N", "NNE", "NE", "ENE", "E", "ESE", "SE", "SSE", "S", "SSW", "SW", "WSW", "W", "WNW", "NW",
    "NNW",
];

/// Israel coast monthly averages, January first.
const MEDITERRANEAN_WATER_TEMP_F: [i32; 12] = [63, 61, 62, 65, 70, 76, 81, 83, 82, 78, 72, 66];

/// Turns one provider reading into a unit-normalized snapshot with its
/// suitability vector. Wind and air readings are optional; without them
/// the snapshot assumes a calm northerly day at 70F. Suitability is
/// always computed from the normalized feet-and-knots values.
pub fn normalize_forecast(
    beach_id: &str,
    readings: &ProviderReadings,
    fetched_at: DateTime<Utc>,
) -> Result<ForecastSnapshot> {
    validate_marine(&readings.marine)?;
    if let Some(weather) = &readings.weather {
        validate_weather(weather)?;
    }

    let marine = &readings.marine;
    let wave_height_ft = meters_to_feet(marine.wave_height);
    let wave_period_sec = match marine.wave_period {
        Some(period) if period > 0.0 => period,
        _ => DEFAULT_WAVE_PERIOD_SEC,
    };
    let wave_direction = compass_point(marine.wave_direction.unwrap_or(0.0)).to_string();

    let swell_height_ft = marine
        .swell_wave_height
        .filter(|height| *height > 0.0)
        .map(meters_to_feet);
    let swell_direction = marine
        .swell_wave_direction
        .map(|degrees| compass_point(degrees).to_string());

    let weather = readings.weather.as_ref();
    let wind_speed_knots = weather.map(|w| kmh_to_knots(w.wind_speed_10m)).unwrap_or(0.0);
    let wind_gusts_knots = weather.and_then(|w| w.wind_gusts_10m).map(kmh_to_knots);
    let wind_direction = weather
        .map(|w| compass_point(w.wind_direction_10m).to_string())
        .unwrap_or_else(|| DEFAULT_WIND_DIRECTION.to_string());
    let air_temp_f = weather
        .map(|w| celsius_to_fahrenheit(w.temperature_2m))
        .unwrap_or(DEFAULT_AIR_TEMP_F);
    let weather_code = weather.and_then(|w| w.weather_code);
    let weather_description = weather_code.map(|code| weather_description(code).to_string());

    let conditions = ForecastConditions {
        wave_height_ft,
        wave_period_sec,
        wave_direction,
        swell_height_ft,
        swell_period_sec: marine.swell_wave_period.filter(|period| *period > 0.0),
        swell_direction,
        wind_speed_knots,
        wind_gusts_knots,
        wind_direction,
        air_temp_f,
        water_temp_f: water_temp_estimate_f(fetched_at),
        weather_code,
        weather_description,
        // No tide source yet.
        tide_height_ft: 0.0,
        confidence: DEFAULT_CONFIDENCE,
    };

    let suitability = SuitabilityVector::rate(wave_height_ft, wind_speed_knots);

    Ok(ForecastSnapshot {
        beach_id: beach_id.to_string(),
        fetched_at,
        conditions,
        suitability,
    })
}

fn validate_marine(marine: &RawMarineReading) -> Result<()> {
    ensure!(
        marine.wave_height.is_finite() && marine.wave_height >= 0.0,
        "marine wave height must be a non-negative number of meters (got {})",
        marine.wave_height
    );
    for (label, value) in [
        ("wave period", marine.wave_period),
        ("swell height", marine.swell_wave_height),
        ("swell period", marine.swell_wave_period),
    ] {
        if let Some(value) = value {
            ensure!(
                value.is_finite() && value >= 0.0,
                "marine {label} must be non-negative (got {value})"
            );
        }
    }
    for (label, value) in [
        ("wave direction", marine.wave_direction),
        ("swell direction", marine.swell_wave_direction),
    ] {
        if let Some(value) = value {
            ensure!(value.is_finite(), "marine {label} must be finite (got {value})");
        }
    }
    Ok(())
}

fn validate_weather(weather: &RawWeatherReading) -> Result<()> {
    ensure!(
        weather.wind_speed_10m.is_finite() && weather.wind_speed_10m >= 0.0,
        "wind speed must be non-negative (got {})",
        weather.wind_speed_10m
    );
    if let Some(gusts) = weather.wind_gusts_10m {
        ensure!(
            gusts.is_finite() && gusts >= 0.0,
            "wind gusts must be non-negative (got {gusts})"
        );
    }
    ensure!(
        weather.wind_direction_10m.is_finite(),
        "wind direction must be finite (got {})",
        weather.wind_direction_10m
    );
    ensure!(
        weather.temperature_2m.is_finite(),
        "air temperature must be finite (got {})",
        weather.temperature_2m
    );
    Ok(())
}

/// Meters to feet, rounded to a tenth.
pub fn meters_to_feet(meters: f64) -> f64 {
    round_tenth(meters * FEET_PER_METER)
}

/// Kilometers per hour to knots, rounded to a tenth.
pub fn kmh_to_knots(kmh: f64) -> f64 {
    round_tenth(kmh * KNOTS_PER_KMH)
}

pub fn celsius_to_fahrenheit(celsius: f64) -> i32 {
    (celsius * 9.0 / 5.0 + 32.0).round() as i32
}

fn round_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Buckets a bearing into one of the sixteen compass points. Bearings
/// outside [0, 360) are wrapped first, so negative west-of-north values
/// land where a sailor would expect.
pub fn compass_point(degrees: f64) -> &'static str {
    let wrapped = degrees.rem_euclid(360.0);
    let index = (wrapped / 22.5).round() as usize % COMPASS_POINTS.len();
    COMPASS_POINTS[index]
}

/// WMO weather interpretation codes, as published by Open-Meteo.
pub fn weather_description(code: u16) -> &'static str {
    match code {
        0 => "Clear sky",
        1 => "Mainly clear",
        2 => "Partly cloudy",
        3 => "Overcast",
        45 => "Foggy",
        48 => "Depositing rime fog",
        51 => "Light drizzle",
        53 => "Moderate drizzle",
        55 => "Dense drizzle",
        61 => "Slight rain",
        63 => "Moderate rain",
        65 => "Heavy rain",
        71 => "Slight snow",
        73 => "Moderate snow",
        75 => "Heavy snow",
        77 => "Snow grains",
        80 => "Slight rain showers",
        81 => "Moderate rain showers",
        82 => "Violent rain showers",
        85 => "Slight snow showers",
        86 => "Heavy snow showers",
        95 => "Thunderstorm",
        96 => "Thunderstorm with slight hail",
        99 => "Thunderstorm with heavy hail",
        _ => "Unknown",
    }
}

/// Estimated Mediterranean water temperature for the month of the given
/// instant. There is no free live source for the Israeli coast, so the
/// seasonal table stands in.
pub fn water_temp_estimate_f(at: DateTime<Utc>) -> i32 {
    MEDITERRANEAN_WATER_TEMP_F[at.month0() as usize]
}
