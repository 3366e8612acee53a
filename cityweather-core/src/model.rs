use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::WeatherError;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

/// What the user asked for: a typed city name or a position.
#[derive(Debug, Clone, PartialEq)]
pub enum Query {
    City(String),
    Coordinates(Coordinates),
}

impl Query {
    /// Trims the input and rejects blank names.
    pub fn city(input: &str) -> Result<Self, WeatherError> {
        let city = input.trim();
        if city.is_empty() {
            return Err(WeatherError::InvalidInput);
        }
        Ok(Query::City(city.to_string()))
    }

    pub fn coordinates(lat: f64, lon: f64) -> Self {
        Query::Coordinates(Coordinates { lat, lon })
    }

    /// Location part of the query string.
    pub fn params(&self) -> Vec<(&'static str, String)> {
        match self {
            Query::City(name) => vec![("q", name.clone())],
            Query::Coordinates(c) => vec![("lat", c.lat.to_string()), ("lon", c.lon.to_string())],
        }
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Query::City(name) => f.write_str(name),
            Query::Coordinates(c) => write!(f, "{:.4}, {:.4}", c.lat, c.lon),
        }
    }
}

/// Current conditions for one place, already flattened out of the provider JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub city: String,
    pub country: String,
    pub temperature: f64,
    pub feels_like: f64,
    pub humidity_pct: u8,
    pub wind_speed: f64,
    pub pressure_hpa: f64,
    /// Short keyword such as "Clear" or "Rain".
    pub condition: String,
    pub description: String,
    pub icon: String,
    pub utc_offset_seconds: i32,
}

/// One 3-hourly forecast point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastSample {
    /// Provider text timestamp, `YYYY-MM-DD HH:MM:SS` in UTC.
    pub timestamp: String,
    pub temperature: f64,
    pub feels_like: f64,
    pub humidity_pct: u8,
    pub condition: String,
    pub description: String,
    pub icon: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Forecast {
    pub city: String,
    pub country: String,
    pub samples: Vec<ForecastSample>,
}

/// A forecast sample picked to stand for its whole day.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyForecastEntry<'a> {
    /// `None` when the timestamp does not parse; the card falls back to the raw text.
    pub date: Option<NaiveDate>,
    pub sample: &'a ForecastSample,
}

const NOON_MARK: &str = "12:00:00";

impl Forecast {
    /// Samples taken at 12:00:00, one per calendar day.
    pub fn daily_entries(&self) -> Vec<DailyForecastEntry<'_>> {
        self.samples
            .iter()
            .filter(|s| s.timestamp.contains(NOON_MARK))
            .map(|sample| DailyForecastEntry {
                date: sample.timestamp.get(..10).and_then(|d| d.parse().ok()),
                sample,
            })
            .collect()
    }
}

/// Both payloads of one successful lookup.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherReport {
    pub current: WeatherSnapshot,
    pub forecast: Forecast,
}
