//! The weather widget: reacts to user actions, runs lookups and keeps the
//! view in sync.
//!
//! Every lookup goes through one path that toggles the loading
//! indicator around the provider call and then either renders the report or
//! reports the failure. Failures never escape without first being shown on
//! the banner; the returned `Result` is there for logging and exit codes.

use std::{
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
    time::Duration,
};

use parking_lot::Mutex;
use tracing::{debug, info, warn};

use crate::{
    clock::CityClock,
    error::WeatherError,
    geolocation::Geolocator,
    model::{Query, WeatherReport},
    provider::WeatherProvider,
    render::{render_current, render_forecast},
    settings::{Settings, language_or_default},
    store::{PreferredCities, render_city_list},
    theme::background_for,
    view::{SharedView, View},
};

/// How long the error banner stays up.
pub const ERROR_DISMISS_AFTER: Duration = Duration::from_secs(5);

#[derive(Debug)]
pub struct Widget<P: WeatherProvider, V: View> {
    provider: P,
    view: SharedView<V>,
    settings: Settings,
    clock: CityClock<V>,
    cities: PreferredCities,
    last_query: Option<Query>,
    /// Bumped whenever the banner changes; a pending dismissal only fires if
    /// nothing newer happened.
    banner_generation: Arc<AtomicU64>,
}

impl<P: WeatherProvider, V: View> Widget<P, V> {
    pub fn new(provider: P, view: V, settings: Settings, cities: PreferredCities) -> Self {
        let view = Arc::new(Mutex::new(view));
        Self {
            provider,
            clock: CityClock::new(Arc::clone(&view)),
            view,
            settings,
            cities,
            last_query: None,
            banner_generation: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn view(&self) -> SharedView<V> {
        Arc::clone(&self.view)
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn last_query(&self) -> Option<&Query> {
        self.last_query.as_ref()
    }

    pub fn clock_running(&self) -> bool {
        self.clock.is_running()
    }

    /// Look up a typed city name. Blank input fails without touching the network.
    pub async fn search(&mut self, input: &str) -> Result<(), WeatherError> {
        match Query::city(input) {
            Ok(query) => self.run(query).await,
            Err(err) => {
                self.fail(&err);
                Err(err)
            }
        }
    }

    pub async fn search_coordinates(&mut self, lat: f64, lon: f64) -> Result<(), WeatherError> {
        self.run(Query::coordinates(lat, lon)).await
    }

    /// Ask `geolocator` for a position and look it up. This is what the page
    /// does on load.
    pub async fn locate(&mut self, geolocator: &dyn Geolocator) -> Result<(), WeatherError> {
        self.view.lock().set_loading(true);

        match geolocator.current_position().await {
            Ok(position) => self.run(Query::Coordinates(position)).await,
            Err(err) => {
                warn!(error = %err, "geolocation failed");
                self.view.lock().set_loading(false);
                self.fail(&err);
                Err(err)
            }
        }
    }

    /// Flip metric/imperial and re-fetch whatever is on screen.
    pub async fn toggle_units(&mut self) -> Result<(), WeatherError> {
        self.settings.units = self.settings.units.toggled();
        info!(units = %self.settings.units, "unit system changed");
        self.refresh().await
    }

    /// Switch the description language and re-fetch. A blank code falls
    /// back to [`DEFAULT_LANGUAGE`](crate::settings::DEFAULT_LANGUAGE).
    pub async fn set_language(&mut self, code: &str) -> Result<(), WeatherError> {
        self.settings.language = language_or_default(code);
        info!(language = %self.settings.language, "language changed");
        self.refresh().await
    }

    /// Repeat the last lookup with the current settings. Nothing to do when
    /// no lookup has happened yet.
    pub async fn refresh(&mut self) -> Result<(), WeatherError> {
        match self.last_query.clone() {
            Some(query) => self.run(query).await,
            None => Ok(()),
        }
    }

    /// Render the stored preferred cities and return them.
    pub fn show_preferred_cities(&self) -> Vec<String> {
        let cities = self.cities.load();
        self.view.lock().set_city_list(render_city_list(&cities));
        cities
    }

    pub fn add_preferred_city(&mut self, city: &str) -> anyhow::Result<Vec<String>> {
        let cities = self.cities.add(city)?;
        self.view.lock().set_city_list(render_city_list(&cities));
        Ok(cities)
    }

    /// Activation of an entry in the preferred-cities list.
    pub async fn select_preferred_city(&mut self, city: &str) -> Result<(), WeatherError> {
        self.search(city).await
    }

    async fn run(&mut self, query: Query) -> Result<(), WeatherError> {
        debug!(%query, "dispatching lookup");
        self.last_query = Some(query.clone());

        self.view.lock().set_loading(true);
        let outcome = self.provider.fetch(&query, &self.settings).await;
        self.view.lock().set_loading(false);

        match outcome {
            Ok(report) => {
                self.display(report);
                Ok(())
            }
            Err(err) => {
                warn!(%query, error = %err, "lookup failed");
                self.fail(&err);
                Err(err)
            }
        }
    }

    fn display(&mut self, report: WeatherReport) {
        let units = self.settings.units;
        let current = &report.current;

        {
            let mut view = self.view.lock();
            view.set_current(render_current(current, units));
            view.set_background(background_for(&current.condition));
            view.set_forecast(render_forecast(&report.forecast, units));
            view.hide_error();
        }
        self.banner_generation.fetch_add(1, Ordering::SeqCst);

        self.settings.last_city_utc_offset_seconds = current.utc_offset_seconds;
        self.clock.start(current.utc_offset_seconds);

        info!(
            city = %current.city,
            country = %current.country,
            condition = %current.condition,
            "weather rendered"
        );
    }

    fn fail(&mut self, err: &WeatherError) {
        self.clock.stop();
        {
            let mut view = self.view.lock();
            view.set_current(String::new());
            view.set_forecast(String::new());
        }
        self.show_error(err.user_message());
    }

    fn show_error(&self, message: &str) {
        let generation = self.banner_generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.view.lock().show_error(message);

        let view = Arc::clone(&self.view);
        let current = Arc::clone(&self.banner_generation);
        let deadline = tokio::time::Instant::now() + ERROR_DISMISS_AFTER;
        tokio::spawn(async move {
            tokio::time::sleep_until(deadline).await;
            if current.load(Ordering::SeqCst) == generation {
                view.lock().hide_error();
            }
        });
    }
}
