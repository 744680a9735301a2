//! Weather feed backed by a JSON file of METAR records.
//!
//! Records use the field names of the aviation weather data server, so a
//! cron job can drop its output next to the map without reshaping it.

use std::collections::HashSet;
use std::path::PathBuf;

use metar_core::{FlightCategory, StationReport};
use metar_engine::{FeedError, WeatherFeed};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MetarRecord {
    pub station_id: String,
    #[serde(default)]
    pub flight_category: Option<String>,
    #[serde(default)]
    pub wind_speed_kt: Option<u32>,
    #[serde(default)]
    pub wind_gust_kt: Option<u32>,
    #[serde(default)]
    pub raw_text: Option<String>,
    #[serde(default)]
    pub temp_c: Option<f64>,
    #[serde(default)]
    pub dewpoint_c: Option<f64>,
}

impl From<MetarRecord> for StationReport {
    fn from(record: MetarRecord) -> Self {
        let lightning = record
            .raw_text
            .as_deref()
            .is_some_and(|raw| raw.contains("LTG"));
        StationReport {
            station_id: record.station_id,
            flight_category: record.flight_category.as_deref().map(FlightCategory::from_report),
            wind_speed: record.wind_speed_kt.unwrap_or(0),
            wind_gust: record.wind_gust_kt.is_some(),
            wind_gust_speed: record.wind_gust_kt.unwrap_or(0),
            lightning,
            temperature: record.temp_c.unwrap_or(0.0),
            dewpoint: record.dewpoint_c.unwrap_or(0.0),
        }
    }
}

pub struct JsonFileFeed {
    path: PathBuf,
}

impl JsonFileFeed {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        JsonFileFeed { path: path.into() }
    }

    fn source_name(&self) -> String {
        self.path.display().to_string()
    }
}

impl WeatherFeed for JsonFileFeed {
    fn fetch(&self, stations: &[String]) -> Result<Vec<StationReport>, FeedError> {
        tracing::info!(
            "Reading METARs for {} stations from {}",
            stations.len(),
            self.path.display()
        );
        let content = std::fs::read_to_string(&self.path).map_err(|source| FeedError::Io {
            source_name: self.source_name(),
            source,
        })?;
        let records: Vec<MetarRecord> =
            serde_json::from_str(&content).map_err(|e| FeedError::Parse {
                source_name: self.source_name(),
                message: e.to_string(),
            })?;

        let wanted: HashSet<&str> = stations.iter().map(String::as_str).collect();
        Ok(records
            .into_iter()
            .filter(|record| wanted.contains(record.station_id.as_str()))
            .map(StationReport::from)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const METARS: &str = r#"[
      {
        "station_id": "KAUS",
        "flight_category": "VFR",
        "wind_speed_kt": 12,
        "wind_gust_kt": 24,
        "raw_text": "KAUS 011753Z 18012G24KT 10SM FEW040 31/22 A2990 RMK AO2 LTG DSNT W",
        "temp_c": 31.0,
        "dewpoint_c": 22.0
      },
      {
        "station_id": "KHYI",
        "flight_category": "IFR"
      },
      {
        "station_id": "KEDC",
        "wind_speed_kt": 5
      },
      {
        "station_id": "KSAT",
        "flight_category": "MVFR"
      }
    ]"#;

    fn feed_file(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    fn ids(ids: &[&str]) -> Vec<String> {
        ids.iter().map(|id| id.to_string()).collect()
    }

    #[test]
    fn test_record_conversion() {
        let file = feed_file(METARS);
        let feed = JsonFileFeed::new(file.path());
        let reports = feed.fetch(&ids(&["KAUS"])).unwrap();

        assert_eq!(reports.len(), 1);
        let kaus = &reports[0];
        assert_eq!(kaus.flight_category, Some(FlightCategory::Vfr));
        assert_eq!(kaus.wind_speed, 12);
        assert!(kaus.wind_gust);
        assert_eq!(kaus.wind_gust_speed, 24);
        assert!(kaus.lightning);
        assert_eq!(kaus.temperature, 31.0);
        assert_eq!(kaus.dewpoint, 22.0);
    }

    #[test]
    fn test_absent_fields_default() {
        let file = feed_file(METARS);
        let feed = JsonFileFeed::new(file.path());
        let reports = feed.fetch(&ids(&["KHYI", "KEDC"])).unwrap();

        let khyi = reports.iter().find(|r| r.station_id == "KHYI").unwrap();
        assert_eq!(khyi.flight_category, Some(FlightCategory::Ifr));
        assert_eq!(khyi.wind_speed, 0);
        assert!(!khyi.wind_gust);
        assert!(!khyi.lightning);
        assert_eq!(khyi.temperature, 0.0);

        let kedc = reports.iter().find(|r| r.station_id == "KEDC").unwrap();
        assert_eq!(kedc.flight_category, None);
    }

    #[test]
    fn test_only_requested_stations_are_returned() {
        let file = feed_file(METARS);
        let feed = JsonFileFeed::new(file.path());
        let reports = feed.fetch(&ids(&["KSAT", "KXYZ"])).unwrap();
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].station_id, "KSAT");
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let feed = JsonFileFeed::new("/no/such/metars.json");
        assert!(matches!(feed.fetch(&ids(&["KAUS"])), Err(FeedError::Io { .. })));
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let file = feed_file("{ not json");
        let feed = JsonFileFeed::new(file.path());
        assert!(matches!(feed.fetch(&ids(&["KAUS"])), Err(FeedError::Parse { .. })));
    }
}
