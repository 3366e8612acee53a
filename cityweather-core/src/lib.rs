//! Core library for the city weather widget.
//!
//! This crate defines:
//! - Configuration on disk and session settings
//! - The OpenWeather provider and the lookup orchestration around it
//! - Rendering of current conditions, forecast cards and page background
//! - The live city clock and the persisted preferred-cities list
//!
//! It is used by `cityweather-cli`, but any front end that implements
//! [`View`] can drive a [`Widget`].

pub mod clock;
pub mod config;
pub mod error;
pub mod geolocation;
pub mod model;
pub mod provider;
pub mod render;
pub mod settings;
pub mod store;
pub mod theme;
pub mod view;
pub mod widget;

pub use clock::CityClock;
pub use config::Config;
pub use error::WeatherError;
pub use geolocation::{FixedLocation, Geolocator};
pub use model::{Coordinates, Forecast, ForecastSample, Query, WeatherReport, WeatherSnapshot};
pub use provider::{WeatherProvider, openweather::OpenWeatherProvider, provider_from_config};
pub use settings::{DEFAULT_LANGUAGE, Settings, UnitSystem, language_or_default};
pub use store::{JsonFileStore, KeyValueStore, MemoryStore, PreferredCities};
pub use view::{HtmlPage, SharedView, View};
pub use widget::Widget;
