//! Drives a METAR light map: keeps the enriched station table fresh and
//! renders it frame by frame.

pub mod collab;
mod daylight;
mod mode;
mod render;

use std::collections::BTreeSet;
use std::sync::{Arc, PoisonError};
use std::time::Duration;

use metar_core::{Position, StationTable};

pub use crate::collab::*;
pub use crate::daylight::Daylight;
pub use crate::mode::{ModeReader, ModeToggle, ModeWriter, mode_cell};
pub use crate::render::{DisplayState, FrameSnapshot, RenderLoop, RenderSettings, SharedStations};

/// Unique station identifiers bound to populated positions, sorted.
pub fn bound_stations(positions: &[Position]) -> Vec<String> {
    positions
        .iter()
        .filter_map(Position::station_id)
        .map(str::to_string)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Fetches reports for the bound stations and swaps in a fresh table.
pub struct StationRefresher {
    feed: Arc<dyn WeatherFeed>,
    stations: Vec<String>,
    table: SharedStations,
}

impl StationRefresher {
    pub fn new(feed: Arc<dyn WeatherFeed>, positions: &[Position], table: SharedStations) -> Self {
        StationRefresher {
            feed,
            stations: bound_stations(positions),
            table,
        }
    }

    /// One refresh cycle. A failed fetch empties the table, so every
    /// station renders clear until the next successful cycle, and the error
    /// is returned.
    pub fn refresh(&self) -> Result<usize, FeedError> {
        let reports = match self.feed.fetch(&self.stations) {
            Ok(reports) => reports,
            Err(error) => {
                *self.table.write().unwrap_or_else(PoisonError::into_inner) =
                    StationTable::default();
                return Err(error);
            }
        };
        let fresh = StationTable::from_reports(reports);
        let count = fresh.len();
        *self.table.write().unwrap_or_else(PoisonError::into_inner) = fresh;

        tracing::info!("Loaded {} of {} bound stations", count, self.stations.len());
        Ok(count)
    }

    /// Refresh every `interval` forever. The first refresh happens after one
    /// interval; callers do the startup fetch themselves. The feed is read on
    /// the blocking pool.
    pub async fn run_every(self, interval: Duration) {
        let refresher = Arc::new(self);
        let mut ticker = tokio::time::interval(interval);
        ticker.tick().await;
        loop {
            ticker.tick().await;
            let cycle = Arc::clone(&refresher);
            match tokio::task::spawn_blocking(move || cycle.refresh()).await {
                Ok(Ok(_)) => {}
                Ok(Err(error)) => {
                    tracing::error!("Weather refresh failed, stations cleared: {error}")
                }
                Err(error) => tracing::error!("Weather refresh task failed: {error}"),
            }
        }
    }
}
