use serde::{Deserialize, Serialize};

/// Aviation ceiling/visibility classification, best to worst.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Eq, PartialEq, Hash)]
pub enum FlightCategory {
    #[serde(rename = "VFR")]
    Vfr,
    #[serde(rename = "MVFR")]
    Mvfr,
    #[serde(rename = "IFR")]
    Ifr,
    #[serde(rename = "LIFR")]
    Lifr,
    #[serde(other)]
    Unknown,
}

impl FlightCategory {
    /// Parse the category text reported by the feed.
    ///
    /// Anything other than the four known categories is `Unknown`, which
    /// renders as a cleared position.
    pub fn from_report(text: &str) -> Self {
        match text.trim() {
            "VFR" => FlightCategory::Vfr,
            "MVFR" => FlightCategory::Mvfr,
            "IFR" => FlightCategory::Ifr,
            "LIFR" => FlightCategory::Lifr,
            _ => FlightCategory::Unknown,
        }
    }
}

/// A single station report as supplied by the weather feed.
///
/// `flight_category` is optional because the feed may omit it; such reports
/// never make it into the enriched table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StationReport {
    pub station_id: String,
    pub flight_category: Option<FlightCategory>,
    /// Sustained wind in knots
    #[serde(default)]
    pub wind_speed: u32,
    #[serde(default)]
    pub wind_gust: bool,
    /// Gust speed in knots, 0 when no gust was reported
    #[serde(default)]
    pub wind_gust_speed: u32,
    #[serde(default)]
    pub lightning: bool,
    /// Temperature in °C
    #[serde(default)]
    pub temperature: f64,
    /// Dewpoint in °C
    #[serde(default)]
    pub dewpoint: f64,
}

impl StationReport {
    pub fn new(station_id: impl Into<String>, flight_category: Option<FlightCategory>) -> Self {
        StationReport {
            station_id: station_id.into(),
            flight_category,
            wind_speed: 0,
            wind_gust: false,
            wind_gust_speed: 0,
            lightning: false,
            temperature: 0.0,
            dewpoint: 0.0,
        }
    }
}

/// Heat index in °F, or the side of the regression's valid domain the
/// temperature fell on.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", tag = "kind", content = "value")]
pub enum HeatIndex {
    BelowRange,
    InRange(f64),
    AboveRange,
}

impl HeatIndex {
    /// True only for an in-range value strictly above `threshold_f`.
    /// Sentinels never exceed a threshold.
    pub fn exceeds(&self, threshold_f: f64) -> bool {
        matches!(self, HeatIndex::InRange(value) if *value > threshold_f)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DerivedMetrics {
    /// Relative humidity, percent
    pub relative_humidity: f64,
    pub heat_index: HeatIndex,
    /// Wet-bulb temperature in °C
    pub wet_bulb: f64,
    /// 0.7 × wet-bulb + 0.3 × dry-bulb, °C
    pub heat_stress: f64,
}

/// A report with a known flight category plus the metrics derived from it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EnrichedStation {
    pub station_id: String,
    pub flight_category: FlightCategory,
    pub wind_speed: u32,
    pub wind_gust: bool,
    pub wind_gust_speed: u32,
    pub lightning: bool,
    pub temperature: f64,
    pub dewpoint: f64,
    pub metrics: DerivedMetrics,
}

/// Channel intensities in the light string's native (GRB) order.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Eq, PartialEq, Hash, Default)]
pub struct Color(pub u8, pub u8, pub u8);

impl Color {
    pub const fn new(c0: u8, c1: u8, c2: u8) -> Self {
        Color(c0, c1, c2)
    }

    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({},{},{})", self.0, self.1, self.2)
    }
}

impl std::str::FromStr for Color {
    type Err = String;

    /// Parses `c0,c1,c2` as written in the strip's native channel order.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let channels = s
            .split(',')
            .map(|part| part.trim().parse::<u8>())
            .collect::<Result<Vec<u8>, _>>()
            .map_err(|e| format!("invalid color channel in '{s}': {e}"))?;
        match channels.as_slice() {
            [c0, c1, c2] => Ok(Color(*c0, *c1, *c2)),
            _ => Err(format!("expected three channels in '{s}'")),
        }
    }
}

/// Which classifier drives the map.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Eq, PartialEq, Hash, Default)]
pub enum DisplayMode {
    #[default]
    #[serde(rename = "metar")]
    FlightCategory,
    #[serde(rename = "temp")]
    Temperature,
}

impl DisplayMode {
    pub fn toggled(self) -> Self {
        match self {
            DisplayMode::FlightCategory => DisplayMode::Temperature,
            DisplayMode::Temperature => DisplayMode::FlightCategory,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DisplayMode::FlightCategory => "metar",
            DisplayMode::Temperature => "temp",
        }
    }

    pub fn parse(text: &str) -> Option<Self> {
        match text {
            "metar" => Some(DisplayMode::FlightCategory),
            "temp" => Some(DisplayMode::Temperature),
            _ => None,
        }
    }
}

/// Alternating animation state, flipped once per render tick.
///
/// `Base` is the phase lightning flashes in; `Flash` is the phase wind
/// blink/fade and heat flashes use.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Eq, PartialEq, Hash, Default)]
#[serde(rename_all = "camelCase")]
pub enum AnimationPhase {
    #[default]
    Base,
    Flash,
}

impl AnimationPhase {
    pub fn flipped(self) -> Self {
        match self {
            AnimationPhase::Base => AnimationPhase::Flash,
            AnimationPhase::Flash => AnimationPhase::Base,
        }
    }
}

/// One display slot, bound to a station or left dark.
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "camelCase")]
pub enum Position {
    Station(String),
    Unpopulated,
}

impl Position {
    pub fn station_id(&self) -> Option<&str> {
        match self {
            Position::Station(id) => Some(id),
            Position::Unpopulated => None,
        }
    }
}
