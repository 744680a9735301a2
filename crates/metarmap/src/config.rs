use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::NaiveTime;
use metar_core::brightness::BrightnessLevels;
use metar_core::classify::{FlightAnimation, TemperatureAnimation};
use metar_engine::{DayWindow, Daylight, RenderSettings};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse config file '{path}': {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Represents the light map configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MapConfig {
    /// One station identifier per line, `NULL` for dark positions
    pub positions_file: PathBuf,
    /// JSON file holding the persisted display mode
    pub mode_file: PathBuf,
    /// JSON file of METAR records
    pub feed_file: PathBuf,
    #[serde(default)]
    pub brightness: BrightnessLevels,
    #[serde(default)]
    pub day_window: DayWindow,
    pub solar: SolarTimes,
    /// Time between animation phase flips in milliseconds
    #[serde(default = "default_blink_interval_ms")]
    pub blink_interval_ms: u64,
    #[serde(default)]
    pub flight: FlightAnimation,
    #[serde(default)]
    pub temperature: TemperatureAnimation,
    /// Re-fetch the feed this often; fetched once at startup when absent
    #[serde(default)]
    pub refresh_interval_secs: Option<u64>,
    /// Re-check day/night this often; checked once at startup when absent
    #[serde(default)]
    pub brightness_recheck_secs: Option<u64>,
}

/// Local wall-clock times of today's sun events
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SolarTimes {
    pub dawn: NaiveTime,
    pub sunrise: NaiveTime,
    pub sunset: NaiveTime,
    pub dusk: NaiveTime,
}

fn default_blink_interval_ms() -> u64 {
    1000
}

impl MapConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let config: MapConfig =
            serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
                path: path.display().to_string(),
                source,
            })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.blink_interval_ms == 0 {
            return Err(ConfigError::Invalid("blinkIntervalMs must be positive".into()));
        }
        for (name, level) in [("day", self.brightness.day), ("night", self.brightness.night)] {
            if !(0.0..=1.0).contains(&level) {
                return Err(ConfigError::Invalid(format!(
                    "{name} brightness {level} is outside 0.0..=1.0"
                )));
            }
        }
        let solar = &self.solar;
        if !(solar.dawn <= solar.sunrise
            && solar.sunrise < solar.sunset
            && solar.sunset <= solar.dusk)
        {
            return Err(ConfigError::Invalid(
                "solar times must satisfy dawn <= sunrise < sunset <= dusk".into(),
            ));
        }
        if self.refresh_interval_secs == Some(0) || self.brightness_recheck_secs == Some(0) {
            return Err(ConfigError::Invalid("intervals must be positive".into()));
        }
        Ok(())
    }

    pub fn render_settings(&self) -> RenderSettings {
        RenderSettings {
            blink_interval: Duration::from_millis(self.blink_interval_ms),
            flight: self.flight,
            temperature: self.temperature,
        }
    }

    pub fn daylight(&self) -> Daylight {
        Daylight {
            window: self.day_window,
            levels: self.brightness,
        }
    }
}
