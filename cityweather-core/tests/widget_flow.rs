//! End-to-end widget tests against a mocked OpenWeather server.

use cityweather_core::{
    HtmlPage, MemoryStore, OpenWeatherProvider, PreferredCities, Settings, WeatherError, Widget,
    theme::background_for,
};
use serde_json::{Value, json};
use std::time::Duration;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn current_body(condition: &str) -> Value {
    json!({
        "coord": { "lon": 2.3488, "lat": 48.8534 },
        "weather": [{ "id": 500, "main": condition, "description": "light rain", "icon": "10d" }],
        "main": { "temp": 17.62, "feels_like": 17.31, "temp_min": 16.1, "temp_max": 18.9, "pressure": 1012, "humidity": 72 },
        "wind": { "speed": 4.12, "deg": 240 },
        "dt": 1718452800,
        "sys": { "country": "FR", "sunrise": 1718423100, "sunset": 1718481300 },
        "timezone": 7200,
        "name": "Paris",
        "cod": 200
    })
}

fn forecast_body() -> Value {
    let list: Vec<Value> = (0..40)
        .map(|i| {
            let day = 15 + i / 8;
            let hour = (i % 8) * 3;
            json!({
                "dt": 1718409600 + i * 10800,
                "main": { "temp": 14.0 + (i % 8) as f64, "feels_like": 13.5, "pressure": 1011, "humidity": 65 },
                "weather": [{ "id": 803, "main": "Clouds", "description": "broken clouds", "icon": "04d" }],
                "wind": { "speed": 3.2 },
                "dt_txt": format!("2024-06-{day:02} {hour:02}:00:00")
            })
        })
        .collect();

    json!({
        "cod": "200",
        "cnt": 40,
        "list": list,
        "city": { "name": "Paris", "country": "FR", "timezone": 7200 }
    })
}

async fn mount_ok(server: &MockServer, condition: &str) {
    Mock::given(method("GET"))
        .and(path("/weather"))
        .respond_with(ResponseTemplate::new(200).set_body_json(current_body(condition)))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/forecast"))
        .respond_with(ResponseTemplate::new(200).set_body_json(forecast_body()))
        .mount(server)
        .await;
}

fn widget(server: &MockServer) -> Widget<OpenWeatherProvider, HtmlPage> {
    let provider =
        OpenWeatherProvider::with_base_url("TEST_KEY".into(), &server.uri(), Duration::from_secs(5))
            .unwrap();
    Widget::new(
        provider,
        HtmlPage::default(),
        Settings::default(),
        PreferredCities::new(MemoryStore::default()),
    )
}

/// The `<p>` right after the city heading holds the temperature.
fn headline_temperature(html: &str) -> String {
    let after = html.split("</h2>").nth(1).unwrap();
    let start = after.find("<p>").unwrap() + 3;
    let end = after.find("</p>").unwrap();
    after[start..end].to_string()
}

#[tokio::test]
async fn paris_in_metric_with_rain() {
    let server = MockServer::start().await;
    mount_ok(&server, "Rain").await;
    let mut w = widget(&server);

    w.search("Paris").await.unwrap();

    let page = w.view().lock().clone();
    let temperature = headline_temperature(&page.current);
    let digits = temperature.strip_suffix("°C").unwrap();
    assert!(digits.parse::<i64>().is_ok(), "{temperature}");
    assert_eq!(temperature, "18°C");

    assert_eq!(page.background.as_deref(), Some(background_for("Rain")));
    assert_eq!(page.forecast.matches(r#"class="card""#).count(), 5);
    assert!(page.error.is_none());
    assert!(!page.loading);
    assert!(page.local_date.starts_with("Date: "));
    assert!(page.local_time.starts_with("Time: "));

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 2);
    for req in &requests {
        let pairs: Vec<(String, String)> = req.url.query_pairs().into_owned().collect();
        assert!(pairs.contains(&("q".into(), "Paris".into())));
        assert!(pairs.contains(&("appid".into(), "TEST_KEY".into())));
        assert!(pairs.contains(&("units".into(), "metric".into())));
        assert!(pairs.contains(&("lang".into(), "en".into())));
    }
}

#[tokio::test]
async fn blank_city_sends_nothing() {
    let server = MockServer::start().await;
    mount_ok(&server, "Clear").await;
    let mut w = widget(&server);

    let err = w.search(" \t ").await.unwrap_err();

    assert_eq!(err, WeatherError::InvalidInput);
    assert!(server.received_requests().await.unwrap().is_empty());
    assert_eq!(w.view().lock().error.as_deref(), Some("Please enter a city name"));
}

#[tokio::test]
async fn one_failed_endpoint_empties_both_panels() {
    let server = MockServer::start().await;
    mount_ok(&server, "Clear").await;
    let mut w = widget(&server);
    w.search("Paris").await.unwrap();
    assert!(!w.view().lock().current.is_empty());

    let failing = MockServer::start().await;
    Mock::given(path("/weather"))
        .respond_with(ResponseTemplate::new(200).set_body_json(current_body("Clear")))
        .mount(&failing)
        .await;
    Mock::given(path("/forecast"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&failing)
        .await;
    let mut w = widget(&failing);
    w.search("Paris").await.unwrap_err();

    let page = w.view().lock().clone();
    assert!(page.current.is_empty());
    assert!(page.forecast.is_empty());
    assert_eq!(page.error.as_deref(), Some("City not found"));
    assert!(!page.loading);
    assert!(!w.clock_running());
}

#[tokio::test]
async fn unit_toggle_refetches_in_imperial() {
    let server = MockServer::start().await;
    Mock::given(path("/weather"))
        .and(query_param("units", "imperial"))
        .respond_with(ResponseTemplate::new(200).set_body_json(current_body("Clear")))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(path("/forecast"))
        .and(query_param("units", "imperial"))
        .respond_with(ResponseTemplate::new(200).set_body_json(forecast_body()))
        .expect(1)
        .mount(&server)
        .await;
    mount_ok(&server, "Clear").await;

    let mut w = widget(&server);
    w.search("Paris").await.unwrap();
    assert!(w.view().lock().current.contains("m/s"));

    w.toggle_units().await.unwrap();

    let page = w.view().lock().clone();
    assert_eq!(headline_temperature(&page.current), "18°F");
    assert!(page.current.contains("4.12 mph"));
    assert!(page.forecast.contains("°F"));
    assert!(!page.forecast.contains("°C"));
}

#[tokio::test]
async fn coordinates_path_reports_rejections() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(query_param("lat", "48.85"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let mut w = widget(&server);
    let err = w.search_coordinates(48.85, 2.35).await.unwrap_err();

    assert_eq!(err, WeatherError::CityNotFound { status: 401 });
    assert_eq!(w.view().lock().error.as_deref(), Some("City not found"));
}

#[tokio::test]
async fn slow_provider_times_out() {
    let server = MockServer::start().await;
    for endpoint in ["/weather", "/forecast"] {
        Mock::given(path(endpoint))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(current_body("Clear"))
                    .set_delay(Duration::from_secs(3)),
            )
            .mount(&server)
            .await;
    }
    let provider =
        OpenWeatherProvider::with_base_url("TEST_KEY".into(), &server.uri(), Duration::from_millis(200))
            .unwrap();
    let mut w = Widget::new(
        provider,
        HtmlPage::default(),
        Settings::default(),
        PreferredCities::new(MemoryStore::default()),
    );

    let err = w.search("Paris").await.unwrap_err();

    assert!(matches!(err, WeatherError::NetworkFailure(ref msg) if msg.contains("timed out")), "{err:?}");
    let page = w.view().lock().clone();
    assert_eq!(page.error.as_deref(), Some("Error fetching weather data"));
    assert!(!page.loading);
    assert!(page.current.is_empty());
    assert!(!w.clock_running());
}
