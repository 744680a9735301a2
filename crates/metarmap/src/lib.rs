//! File-backed collaborators and configuration for a METAR light map.

pub mod config;
pub mod feed;
pub mod mode_store;
pub mod positions;
pub mod sink;
pub mod solar;

pub use crate::config::{ConfigError, MapConfig, SolarTimes};
pub use crate::feed::{JsonFileFeed, MetarRecord};
pub use crate::mode_store::JsonModeStore;
pub use crate::positions::{PositionsError, load_positions, parse_positions};
pub use crate::sink::{LogSink, TerminalSink};
pub use crate::solar::FixedSolarTable;
