//! HTML fragments for the current-conditions and forecast panels.
//!
//! Everything here is pure: the widget decides where the fragments go.

use std::fmt::Write;

use crate::{
    model::{Forecast, WeatherSnapshot},
    settings::UnitSystem,
};

pub const ICON_BASE_URL: &str = "https://openweathermap.org/img/wn";

/// Long date form used on forecast cards and the city clock.
pub const LONG_DATE_FORMAT: &str = "%A, %B %-d, %Y";

pub fn render_current(snapshot: &WeatherSnapshot, units: UnitSystem) -> String {
    format!(
        r#"<div class="row">
    <div class="col-md-6 text-center">
        <img src="{icon_base}/{icon}@2x.png" alt="{description}">
        <h2>{city}, {country}</h2>
        <p>{temperature}</p>
        <p>{description}</p>
    </div>
    <div class="col-md-6">
        <p>Humidity: {humidity}%</p>
        <p>Wind Speed: {wind} {wind_unit}</p>
        <p>Pressure: {pressure} hPa</p>
        <p>Feels Like: {feels_like}</p>
    </div>
</div>"#,
        icon_base = ICON_BASE_URL,
        icon = escape(&snapshot.icon),
        description = escape(&snapshot.description),
        city = escape(&snapshot.city),
        country = escape(&snapshot.country),
        temperature = units.format_temperature(snapshot.temperature),
        humidity = snapshot.humidity_pct,
        wind = snapshot.wind_speed,
        wind_unit = units.wind_suffix(),
        pressure = snapshot.pressure_hpa,
        feels_like = units.format_temperature(snapshot.feels_like),
    )
}

/// One card per noon sample, in forecast order.
pub fn render_forecast(forecast: &Forecast, units: UnitSystem) -> String {
    let mut html = String::new();

    for entry in forecast.daily_entries() {
        let title = match entry.date {
            Some(date) => date.format(LONG_DATE_FORMAT).to_string(),
            None => entry.sample.timestamp.clone(),
        };

        // Writing into a String cannot fail.
        let _ = write!(
            html,
            r#"<div class="col-md-3">
    <div class="card">
        <div class="card-body">
            <h5 class="card-title">{title}</h5>
            <img src="{icon_base}/{icon}.png" alt="{description}">
            <p class="card-text">Temperature: {temperature}</p>
        </div>
    </div>
</div>
"#,
            title = escape(&title),
            icon_base = ICON_BASE_URL,
            icon = escape(&entry.sample.icon),
            description = escape(&entry.sample.description),
            temperature = units.format_temperature(entry.sample.temperature),
        );
    }

    html
}

/// Minimal HTML escaping for text and attribute values.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
