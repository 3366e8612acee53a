//! Live local time for the displayed city.
//!
//! The clock owns at most one ticking task. Starting it again replaces the
//! running task, so the display always follows the latest city's offset.

use chrono::{DateTime, Duration as ChronoDuration, Utc};
use std::{sync::Arc, time::Duration};
use tokio::{task::JoinHandle, time};
use tracing::debug;

use crate::{
    render::LONG_DATE_FORMAT,
    view::{SharedView, View},
};

pub const TICK: Duration = Duration::from_secs(1);

/// `("Date: ...", "Time: ...")` for a city `offset_seconds` east of UTC.
pub fn city_local_time(now: DateTime<Utc>, offset_seconds: i32) -> (String, String) {
    let local = now.naive_utc() + ChronoDuration::seconds(i64::from(offset_seconds));
    (
        format!("Date: {}", local.format(LONG_DATE_FORMAT)),
        format!("Time: {}", local.format("%-I:%M:%S %p")),
    )
}

#[derive(Debug)]
pub struct CityClock<V: View> {
    view: SharedView<V>,
    ticker: Option<JoinHandle<()>>,
}

impl<V: View> CityClock<V> {
    pub fn new(view: SharedView<V>) -> Self {
        Self { view, ticker: None }
    }

    pub fn is_running(&self) -> bool {
        self.ticker.is_some()
    }

    /// Start ticking for `offset_seconds`, replacing any running ticker.
    /// The display is filled right away, then refreshed every tick.
    pub fn start(&mut self, offset_seconds: i32) {
        self.stop();

        let (date, time) = city_local_time(Utc::now(), offset_seconds);
        self.view.lock().set_clock(&date, &time);

        let view = Arc::clone(&self.view);
        let mut interval = time::interval_at(time::Instant::now() + TICK, TICK);
        let handle = tokio::spawn(async move {
            loop {
                interval.tick().await;
                let (date, time) = city_local_time(Utc::now(), offset_seconds);
                view.lock().set_clock(&date, &time);
            }
        });

        debug!(offset_seconds, "city clock started");
        self.ticker = Some(handle);
    }

    /// No-op when already stopped.
    pub fn stop(&mut self) {
        if let Some(handle) = self.ticker.take() {
            handle.abort();
            debug!("city clock stopped");
        }
    }
}

impl<V: View> Drop for CityClock<V> {
    fn drop(&mut self) {
        self.stop();
    }
}
