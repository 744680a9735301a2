//! Boundaries to the outside world.
//!
//! The engine never talks to the network, the filesystem or the light string
//! directly; it goes through these traits.

use chrono::{DateTime, Local, NaiveDate, Utc};
use metar_core::{Color, DisplayMode, StationReport};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FeedError {
    #[error("Failed to read weather feed from {source_name}: {source}")]
    Io {
        source_name: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse weather feed from {source_name}: {message}")]
    Parse { source_name: String, message: String },
}

#[derive(Error, Debug)]
pub enum SolarError {
    #[error("No solar times available for {date}")]
    Unavailable { date: NaiveDate },
    #[error("Local time {time} on {date} does not exist or is ambiguous")]
    InvalidLocalTime { date: NaiveDate, time: String },
}

#[derive(Error, Debug)]
pub enum ModeStoreError {
    #[error("Failed to access mode file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Mode file {path} is malformed: {message}")]
    Parse { path: String, message: String },
}

#[derive(Error, Debug)]
pub enum SinkError {
    #[error("Frame has {actual} colors but the light string has {expected}")]
    LengthMismatch { expected: usize, actual: usize },
    #[error("Light string rejected the frame: {0}")]
    Device(String),
}

/// Supplies the latest report for each requested station.
pub trait WeatherFeed: Send + Sync {
    /// Fetch reports for `stations`. Stations the feed knows nothing about
    /// are simply absent from the result.
    fn fetch(&self, stations: &[String]) -> Result<Vec<StationReport>, FeedError>;
}

/// Sun event instants for one local day.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SolarDay {
    pub dawn: DateTime<Utc>,
    pub sunrise: DateTime<Utc>,
    pub sunset: DateTime<Utc>,
    pub dusk: DateTime<Utc>,
}

/// Which pair of sun events bounds the day brightness window.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub enum DayWindow {
    /// Civil twilight: dawn to dusk
    #[default]
    DawnDusk,
    SunriseSunset,
}

impl SolarDay {
    pub fn window(&self, window: DayWindow) -> (DateTime<Utc>, DateTime<Utc>) {
        match window {
            DayWindow::DawnDusk => (self.dawn, self.dusk),
            DayWindow::SunriseSunset => (self.sunrise, self.sunset),
        }
    }
}

pub trait SolarClock: Send + Sync {
    /// Sun events for the given local calendar day.
    fn solar_day(&self, date: NaiveDate) -> Result<SolarDay, SolarError>;

    /// Calendar day that `now` falls on in the zone the sun events are kept
    /// in. The system zone unless the clock says otherwise.
    fn local_date(&self, now: DateTime<Utc>) -> NaiveDate {
        now.with_timezone(&Local).date_naive()
    }
}

/// Persists the display mode between restarts.
pub trait ModeStore: Send {
    fn load(&self) -> Result<DisplayMode, ModeStoreError>;
    fn save(&mut self, mode: DisplayMode) -> Result<(), ModeStoreError>;
}

/// The light string. `show` must update every position together.
pub trait RenderSink: Send {
    fn show(&mut self, frame: &[Color], brightness: f32) -> Result<(), SinkError>;
}

impl<T: ModeStore + ?Sized> ModeStore for Box<T> {
    fn load(&self) -> Result<DisplayMode, ModeStoreError> {
        (**self).load()
    }

    fn save(&mut self, mode: DisplayMode) -> Result<(), ModeStoreError> {
        (**self).save(mode)
    }
}

impl<T: RenderSink + ?Sized> RenderSink for Box<T> {
    fn show(&mut self, frame: &[Color], brightness: f32) -> Result<(), SinkError> {
        (**self).show(frame, brightness)
    }
}
