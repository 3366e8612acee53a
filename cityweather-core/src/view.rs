//! The UI surface the widget draws on.

use std::{fmt::Write, sync::Arc};

use parking_lot::Mutex;

use crate::{render::escape, theme::DEFAULT_GRADIENT};

/// Every display element the widget touches.
pub trait View: Send + 'static {
    fn set_loading(&mut self, visible: bool);
    fn show_error(&mut self, message: &str);
    fn hide_error(&mut self);
    /// Replaces the current-conditions panel; empty clears it.
    fn set_current(&mut self, html: String);
    /// Replaces the forecast panel; empty clears it.
    fn set_forecast(&mut self, html: String);
    fn set_background(&mut self, css: &str);
    fn set_clock(&mut self, date: &str, time: &str);
    fn set_city_list(&mut self, html: String);
}

/// A view shared between the widget, the city clock and the banner timer.
pub type SharedView<V> = Arc<Mutex<V>>;

/// In-memory page. Holds the latest state of every element and can print
/// itself as a standalone HTML document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HtmlPage {
    pub loading: bool,
    pub error: Option<String>,
    pub current: String,
    pub forecast: String,
    pub background: Option<String>,
    pub local_date: String,
    pub local_time: String,
    pub city_list: String,
}

impl View for HtmlPage {
    fn set_loading(&mut self, visible: bool) {
        self.loading = visible;
    }

    fn show_error(&mut self, message: &str) {
        self.error = Some(message.to_string());
    }

    fn hide_error(&mut self) {
        self.error = None;
    }

    fn set_current(&mut self, html: String) {
        self.current = html;
    }

    fn set_forecast(&mut self, html: String) {
        self.forecast = html;
    }

    fn set_background(&mut self, css: &str) {
        self.background = Some(css.to_string());
    }

    fn set_clock(&mut self, date: &str, time: &str) {
        self.local_date = date.to_string();
        self.local_time = time.to_string();
    }

    fn set_city_list(&mut self, html: String) {
        self.city_list = html;
    }
}

impl HtmlPage {
    pub fn to_document(&self) -> String {
        let mut doc = String::new();
        let background = self.background.as_deref().unwrap_or(DEFAULT_GRADIENT);
        let hidden = |visible: bool| if visible { "block" } else { "none" };

        let _ = write!(
            doc,
            r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>Weather</title>
</head>
<body style="background: {background};">
<div id="loadingSpinner" style="display: {loading};"></div>
<div id="errorMessage" style="display: {error_display};">{error}</div>
<p id="localDate">{date}</p>
<p id="localTime">{time}</p>
<div id="weatherDisplay">
{current}
</div>
<div id="forecast" class="row">
{forecast}
</div>
<ul id="cityList">
{cities}
</ul>
</body>
</html>
"#,
            loading = hidden(self.loading),
            error_display = hidden(self.error.is_some()),
            error = escape(self.error.as_deref().unwrap_or_default()),
            date = escape(&self.local_date),
            time = escape(&self.local_time),
            current = self.current,
            forecast = self.forecast,
            cities = self.city_list,
        );

        doc
    }
}
