use anyhow::Context;
use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

use crate::{
    error::WeatherError,
    model::{Forecast, ForecastSample, Query, WeatherReport, WeatherSnapshot},
    settings::Settings,
};

use super::WeatherProvider;

pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org/data/2.5";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    base_url: String,
    http: Client,
}

/// The pair of URLs one lookup hits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestUrls {
    pub current: Url,
    pub forecast: Url,
}

impl OpenWeatherProvider {
    pub fn new(api_key: String) -> anyhow::Result<Self> {
        Self::with_base_url(api_key, DEFAULT_BASE_URL, DEFAULT_TIMEOUT)
    }

    pub fn with_base_url(api_key: String, base_url: &str, timeout: Duration) -> anyhow::Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client for OpenWeather")?;

        Ok(Self {
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    pub fn request_urls(&self, query: &Query, settings: &Settings) -> Result<RequestUrls, WeatherError> {
        let mut params = query.params();
        params.push(("appid", self.api_key.clone()));
        params.push(("units", settings.units.as_str().to_string()));
        params.push(("lang", settings.language.clone()));

        let build = |endpoint: &str| {
            Url::parse_with_params(&format!("{}/{endpoint}", self.base_url), &params)
                .map_err(|e| WeatherError::NetworkFailure(format!("invalid request URL: {e}")))
        };

        Ok(RequestUrls {
            current: build("weather")?,
            forecast: build("forecast")?,
        })
    }

    async fn get(&self, url: Url) -> Result<(StatusCode, String), WeatherError> {
        let res = self.http.get(url).send().await?;
        let status = res.status();
        let body = res.text().await?;
        Ok((status, body))
    }
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    feels_like: f64,
    humidity: u8,
    #[serde(default)]
    pressure: f64,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    main: String,
    description: String,
    icon: String,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: f64,
}

#[derive(Debug, Default, Deserialize)]
struct OwSys {
    #[serde(default)]
    country: String,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    name: String,
    #[serde(default)]
    sys: OwSys,
    main: OwMain,
    weather: Vec<OwWeather>,
    wind: OwWind,
    #[serde(default)]
    timezone: i32,
}

#[derive(Debug, Deserialize)]
struct OwCity {
    name: String,
    #[serde(default)]
    country: String,
}

#[derive(Debug, Deserialize)]
struct OwForecastEntry {
    dt_txt: String,
    main: OwMain,
    weather: Vec<OwWeather>,
}

#[derive(Debug, Deserialize)]
struct OwForecastResponse {
    city: OwCity,
    list: Vec<OwForecastEntry>,
}

/// (keyword, description, icon) of the first weather entry.
fn first_condition(weather: Vec<OwWeather>) -> (String, String, String) {
    weather
        .into_iter()
        .next()
        .map(|w| (w.main, w.description, w.icon))
        .unwrap_or_else(|| ("Unknown".to_string(), "Unknown".to_string(), String::new()))
}

impl From<OwCurrentResponse> for WeatherSnapshot {
    fn from(parsed: OwCurrentResponse) -> Self {
        let (condition, description, icon) = first_condition(parsed.weather);

        WeatherSnapshot {
            city: parsed.name,
            country: parsed.sys.country,
            temperature: parsed.main.temp,
            feels_like: parsed.main.feels_like,
            humidity_pct: parsed.main.humidity,
            wind_speed: parsed.wind.speed,
            pressure_hpa: parsed.main.pressure,
            condition,
            description,
            icon,
            utc_offset_seconds: parsed.timezone,
        }
    }
}

impl From<OwForecastResponse> for Forecast {
    fn from(parsed: OwForecastResponse) -> Self {
        let samples = parsed
            .list
            .into_iter()
            .map(|entry| {
                let (condition, description, icon) = first_condition(entry.weather);
                ForecastSample {
                    timestamp: entry.dt_txt,
                    temperature: entry.main.temp,
                    feels_like: entry.main.feels_like,
                    humidity_pct: entry.main.humidity,
                    condition,
                    description,
                    icon,
                }
            })
            .collect();

        Forecast {
            city: parsed.city.name,
            country: parsed.city.country,
            samples,
        }
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    async fn fetch(&self, query: &Query, settings: &Settings) -> Result<WeatherReport, WeatherError> {
        let urls = self.request_urls(query, settings)?;
        debug!(%query, units = %settings.units, lang = %settings.language, "requesting current weather and forecast");

        let (current, forecast) = tokio::join!(self.get(urls.current), self.get(urls.forecast));
        let (current_status, current_body) = current?;
        let (forecast_status, forecast_body) = forecast?;

        for (status, body) in [(current_status, &current_body), (forecast_status, &forecast_body)] {
            if !status.is_success() {
                warn!(%query, %status, body = %truncate_body(body), "OpenWeather rejected the lookup");
                return Err(WeatherError::CityNotFound { status: status.as_u16() });
            }
        }

        let current: OwCurrentResponse = serde_json::from_str(&current_body)?;
        let forecast: OwForecastResponse = serde_json::from_str(&forecast_body)?;

        Ok(WeatherReport {
            current: current.into(),
            forecast: forecast.into(),
        })
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::UnitSystem;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn current_body() -> serde_json::Value {
        json!({
            "name": "Paris",
            "sys": { "country": "FR" },
            "main": { "temp": 17.6, "feels_like": 16.9, "humidity": 72, "pressure": 1012 },
            "weather": [{ "main": "Rain", "description": "light rain", "icon": "10d" }],
            "wind": { "speed": 4.1 },
            "timezone": 7200
        })
    }

    fn forecast_body() -> serde_json::Value {
        json!({
            "city": { "name": "Paris", "country": "FR" },
            "list": [
                {
                    "dt_txt": "2024-06-15 09:00:00",
                    "main": { "temp": 15.0, "feels_like": 14.0, "humidity": 80, "pressure": 1010 },
                    "weather": [{ "main": "Clouds", "description": "overcast clouds", "icon": "04d" }]
                },
                {
                    "dt_txt": "2024-06-15 12:00:00",
                    "main": { "temp": 19.4, "feels_like": 19.0, "humidity": 60, "pressure": 1011 },
                    "weather": [{ "main": "Clear", "description": "clear sky", "icon": "01d" }]
                }
            ]
        })
    }

    fn provider(server: &MockServer) -> OpenWeatherProvider {
        OpenWeatherProvider::with_base_url("KEY".into(), &server.uri(), DEFAULT_TIMEOUT).unwrap()
    }

    #[test]
    fn request_urls_for_city() {
        let p = OpenWeatherProvider::new("KEY".into()).unwrap();
        let settings = Settings { units: UnitSystem::Imperial, language: "fr".into(), ..Settings::default() };

        let urls = p.request_urls(&Query::City("São Paulo".into()), &settings).unwrap();

        assert_eq!(urls.current.path(), "/data/2.5/weather");
        assert_eq!(urls.forecast.path(), "/data/2.5/forecast");
        let pairs: Vec<(String, String)> = urls.current.query_pairs().into_owned().collect();
        assert_eq!(
            pairs,
            vec![
                ("q".to_string(), "São Paulo".to_string()),
                ("appid".to_string(), "KEY".to_string()),
                ("units".to_string(), "imperial".to_string()),
                ("lang".to_string(), "fr".to_string()),
            ]
        );
    }

    #[test]
    fn request_urls_for_coordinates() {
        let p = OpenWeatherProvider::new("KEY".into()).unwrap();
        let urls = p.request_urls(&Query::coordinates(51.5, -0.12), &Settings::default()).unwrap();
        let query = urls.forecast.query().unwrap();
        assert!(query.starts_with("lat=51.5&lon=-0.12&appid=KEY&units=metric&lang=en"));
    }

    #[tokio::test]
    async fn fetch_parses_both_payloads() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/weather"))
            .and(query_param("q", "Paris"))
            .respond_with(ResponseTemplate::new(200).set_body_json(current_body()))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/forecast"))
            .and(query_param("q", "Paris"))
            .respond_with(ResponseTemplate::new(200).set_body_json(forecast_body()))
            .mount(&server)
            .await;

        let report = provider(&server)
            .fetch(&Query::City("Paris".into()), &Settings::default())
            .await
            .unwrap();

        assert_eq!(report.current.city, "Paris");
        assert_eq!(report.current.country, "FR");
        assert_eq!(report.current.condition, "Rain");
        assert_eq!(report.current.utc_offset_seconds, 7200);
        assert_eq!(report.current.pressure_hpa, 1012.0);
        assert_eq!(report.forecast.samples.len(), 2);
        assert_eq!(report.forecast.samples[1].icon, "01d");
    }

    #[tokio::test]
    async fn non_ok_forecast_is_city_not_found() {
        let server = MockServer::start().await;
        Mock::given(path("/weather"))
            .respond_with(ResponseTemplate::new(200).set_body_json(current_body()))
            .mount(&server)
            .await;
        Mock::given(path("/forecast"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({ "cod": "404", "message": "city not found" })))
            .mount(&server)
            .await;

        let err = provider(&server)
            .fetch(&Query::City("Atlantis".into()), &Settings::default())
            .await
            .unwrap_err();
        assert_eq!(err, WeatherError::CityNotFound { status: 404 });
    }

    #[tokio::test]
    async fn coordinate_lookups_check_status_too() {
        let server = MockServer::start().await;
        Mock::given(path("/weather"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;
        Mock::given(path("/forecast"))
            .respond_with(ResponseTemplate::new(200).set_body_json(forecast_body()))
            .mount(&server)
            .await;

        let err = provider(&server)
            .fetch(&Query::coordinates(0.0, 0.0), &Settings::default())
            .await
            .unwrap_err();
        assert_eq!(err, WeatherError::CityNotFound { status: 401 });
    }

    #[tokio::test]
    async fn garbage_body_is_network_failure() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
            .mount(&server)
            .await;

        let err = provider(&server)
            .fetch(&Query::City("Paris".into()), &Settings::default())
            .await
            .unwrap_err();
        assert!(matches!(err, WeatherError::NetworkFailure(_)));
    }

    #[test]
    fn truncate_body_respects_char_boundaries() {
        let long = "é".repeat(300);
        let out = truncate_body(&long);
        assert!(out.ends_with("..."));
        assert_eq!(out.chars().count(), 203);
    }
}
