use thiserror::Error;

/// Everything a lookup can fail with. The widget turns each of these into a
/// banner message; the variant itself is kept for logging and exit codes.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum WeatherError {
    #[error("city name is empty")]
    InvalidInput,

    #[error("weather provider answered with status {status}")]
    CityNotFound { status: u16 },

    #[error("weather request failed: {0}")]
    NetworkFailure(String),

    #[error("geolocation unavailable: {0}")]
    GeolocationDenied(String),

    #[error("geolocation is not supported")]
    GeolocationUnsupported,
}

impl WeatherError {
    /// Short text for the error banner.
    pub fn user_message(&self) -> &'static str {
        match self {
            WeatherError::InvalidInput => "Please enter a city name",
            WeatherError::CityNotFound { .. } => "City not found",
            WeatherError::NetworkFailure(_) => "Error fetching weather data",
            WeatherError::GeolocationDenied(_) => "Unable to retrieve your location",
            WeatherError::GeolocationUnsupported => "Geolocation is not supported by this system",
        }
    }
}

impl From<reqwest::Error> for WeatherError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            WeatherError::NetworkFailure(format!("request timed out: {err}"))
        } else {
            WeatherError::NetworkFailure(err.to_string())
        }
    }
}

impl From<serde_json::Error> for WeatherError {
    fn from(err: serde_json::Error) -> Self {
        WeatherError::NetworkFailure(format!("unexpected response body: {err}"))
    }
}
