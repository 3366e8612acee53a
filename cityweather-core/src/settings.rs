use serde::{Deserialize, Serialize};
use std::fmt;

/// Unit system sent to the provider as `units=`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitSystem {
    #[default]
    Metric,
    Imperial,
}

impl UnitSystem {
    pub fn as_str(&self) -> &'static str {
        match self {
            UnitSystem::Metric => "metric",
            UnitSystem::Imperial => "imperial",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            UnitSystem::Metric => UnitSystem::Imperial,
            UnitSystem::Imperial => UnitSystem::Metric,
        }
    }

    pub fn temperature_suffix(&self) -> &'static str {
        match self {
            UnitSystem::Metric => "°C",
            UnitSystem::Imperial => "°F",
        }
    }

    pub fn wind_suffix(&self) -> &'static str {
        match self {
            UnitSystem::Metric => "m/s",
            UnitSystem::Imperial => "mph",
        }
    }

    /// Rounded temperature with its suffix, e.g. `18°C`.
    pub fn format_temperature(&self, value: f64) -> String {
        format!("{}{}", value.round() as i64, self.temperature_suffix())
    }
}

impl fmt::Display for UnitSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for UnitSystem {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.to_lowercase().as_str() {
            "metric" => Ok(UnitSystem::Metric),
            "imperial" => Ok(UnitSystem::Imperial),
            _ => Err(anyhow::anyhow!(
                "Unknown unit system '{value}'. Supported: metric, imperial."
            )),
        }
    }
}

/// Language used when none is configured.
pub const DEFAULT_LANGUAGE: &str = "en";

/// Trimmed language code, or [`DEFAULT_LANGUAGE`] when blank.
pub fn language_or_default(code: &str) -> String {
    match code.trim() {
        "" => DEFAULT_LANGUAGE.to_string(),
        code => code.to_string(),
    }
}

/// Session state the widget reads on every request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub units: UnitSystem,
    pub language: String,
    pub last_city_utc_offset_seconds: i32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            units: UnitSystem::Metric,
            language: DEFAULT_LANGUAGE.to_string(),
            last_city_utc_offset_seconds: 0,
        }
    }
}
