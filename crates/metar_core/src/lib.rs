pub mod brightness;
pub mod classify;
pub mod metrics;
mod models;

pub use crate::models::*;
use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Enriched stations keyed by station identifier, rebuilt whole on every
/// feed refresh.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StationTable {
    stations: HashMap<String, EnrichedStation>,
}

impl StationTable {
    /// Build a fresh table from one batch of feed reports.
    ///
    /// Reports without a flight category are dropped. A later report for the
    /// same station replaces an earlier one.
    pub fn from_reports<I>(reports: I) -> Self
    where
        I: IntoIterator<Item = StationReport>,
    {
        let stations = reports
            .into_iter()
            .filter_map(enrich)
            .map(|station| (station.station_id.clone(), station))
            .collect();
        StationTable { stations }
    }

    pub fn from_enriched<I>(stations: I) -> Self
    where
        I: IntoIterator<Item = EnrichedStation>,
    {
        let stations = stations
            .into_iter()
            .map(|station| (station.station_id.clone(), station))
            .collect();
        StationTable { stations }
    }

    pub fn get(&self, station_id: &str) -> Option<&EnrichedStation> {
        self.stations.get(station_id)
    }

    pub fn len(&self) -> usize {
        self.stations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }

    pub fn stations(&self) -> impl Iterator<Item = &EnrichedStation> {
        self.stations.values()
    }
}

/// Attach derived metrics to a report.
///
/// Returns `None` when the report has no flight category.
pub fn enrich(report: StationReport) -> Option<EnrichedStation> {
    let Some(flight_category) = report.flight_category else {
        tracing::warn!("Missing flight category for {}, skipping", report.station_id);
        return None;
    };

    let metrics = metrics::derive(report.temperature, report.dewpoint);
    tracing::debug!(
        station = %report.station_id,
        ?flight_category,
        wind_speed = report.wind_speed,
        wind_gust = report.wind_gust,
        lightning = report.lightning,
        temperature = report.temperature,
        dewpoint = report.dewpoint,
        ?metrics,
        "Enriched station"
    );

    Some(EnrichedStation {
        station_id: report.station_id,
        flight_category,
        wind_speed: report.wind_speed,
        wind_gust: report.wind_gust,
        wind_gust_speed: report.wind_gust_speed,
        lightning: report.lightning,
        temperature: report.temperature,
        dewpoint: report.dewpoint,
        metrics,
    })
}
