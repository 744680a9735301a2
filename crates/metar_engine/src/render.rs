//! The render loop.
//!
//! Every tick the loop reads the display mode once, classifies every
//! position into a frame buffer, hands the whole frame to the sink, then
//! sleeps for the blink interval and flips the animation phase. It runs until
//! the process is stopped.

use std::convert::Infallible;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

use chrono::Utc;
use metar_core::brightness::DayPhase;
use metar_core::classify::{self, CLEAR, FlightAnimation, TemperatureAnimation};
use metar_core::{AnimationPhase, Color, DisplayMode, Position, StationTable};
use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tokio::time::Instant;

use crate::collab::{RenderSink, SinkError, SolarClock};
use crate::daylight::Daylight;
use crate::mode::ModeReader;

/// Enriched stations shared between the refresher and the render loop.
pub type SharedStations = Arc<RwLock<StationTable>>;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderSettings {
    pub blink_interval: Duration,
    pub flight: FlightAnimation,
    pub temperature: TemperatureAnimation,
}

impl Default for RenderSettings {
    fn default() -> Self {
        RenderSettings {
            blink_interval: Duration::from_secs(1),
            flight: FlightAnimation::default(),
            temperature: TemperatureAnimation::default(),
        }
    }
}

/// Process-wide display state. Never persisted.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DisplayState {
    pub mode: DisplayMode,
    pub phase: AnimationPhase,
    pub brightness: f32,
    pub day_phase: DayPhase,
}

/// The last frame handed to the sink, for observers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FrameSnapshot {
    pub tick: u64,
    pub state: DisplayState,
    pub frame: Vec<Color>,
}

struct BrightnessRecheck {
    clock: Arc<dyn SolarClock>,
    daylight: Daylight,
    every: Duration,
    last_checked: Instant,
}

pub struct RenderLoop<S: RenderSink> {
    positions: Vec<Position>,
    stations: SharedStations,
    mode: ModeReader,
    settings: RenderSettings,
    sink: S,
    state: DisplayState,
    frame: Vec<Color>,
    tick: u64,
    recheck: Option<BrightnessRecheck>,
    snapshots: watch::Sender<FrameSnapshot>,
}

impl<S: RenderSink> RenderLoop<S> {
    /// `brightness` is the startup day/night decision.
    pub fn new(
        positions: Vec<Position>,
        stations: SharedStations,
        mode: ModeReader,
        settings: RenderSettings,
        sink: S,
        brightness: (DayPhase, f32),
    ) -> Self {
        let (day_phase, level) = brightness;
        let state = DisplayState {
            mode: mode.get(),
            phase: AnimationPhase::Base,
            brightness: level,
            day_phase,
        };
        let frame = vec![CLEAR; positions.len()];
        let (snapshots, _) = watch::channel(FrameSnapshot {
            tick: 0,
            state,
            frame: frame.clone(),
        });

        RenderLoop {
            positions,
            stations,
            mode,
            settings,
            sink,
            state,
            frame,
            tick: 0,
            recheck: None,
            snapshots,
        }
    }

    /// Re-evaluate brightness every `every` instead of only at startup.
    pub fn with_brightness_recheck(
        mut self,
        clock: Arc<dyn SolarClock>,
        daylight: Daylight,
        every: Duration,
    ) -> Self {
        self.recheck = Some(BrightnessRecheck {
            clock,
            daylight,
            every,
            last_checked: Instant::now(),
        });
        self
    }

    pub fn subscribe(&self) -> watch::Receiver<FrameSnapshot> {
        self.snapshots.subscribe()
    }

    pub fn state(&self) -> &DisplayState {
        &self.state
    }

    pub fn frame(&self) -> &[Color] {
        &self.frame
    }

    /// Fill the frame buffer for the current phase. The mode is read once.
    pub fn compose(&mut self) -> &[Color] {
        let mode = self.mode.get();
        self.state.mode = mode;
        let phase = self.state.phase;

        let stations = self.stations.read().unwrap_or_else(PoisonError::into_inner);
        for (slot, position) in self.frame.iter_mut().zip(&self.positions) {
            let Some(station_id) = position.station_id() else {
                *slot = CLEAR;
                continue;
            };
            let station = stations.get(station_id);
            *slot = match mode {
                DisplayMode::FlightCategory => {
                    classify::classify_flight(station, phase, &self.settings.flight)
                }
                DisplayMode::Temperature => {
                    classify::classify_temperature(station, phase, &self.settings.temperature)
                }
            };
        }
        &self.frame
    }

    /// Compose and push one full frame to the sink.
    pub fn tick(&mut self) -> Result<(), SinkError> {
        self.compose();
        self.sink.show(&self.frame, self.state.brightness)?;
        self.tick += 1;
        tracing::debug!(
            tick = self.tick,
            mode = self.state.mode.as_str(),
            phase = ?self.state.phase,
            "Frame shown"
        );

        self.snapshots.send_replace(FrameSnapshot {
            tick: self.tick,
            state: self.state,
            frame: self.frame.clone(),
        });
        Ok(())
    }

    /// Move to the next animation phase, re-checking brightness when due.
    pub fn advance(&mut self) {
        self.state.phase = self.state.phase.flipped();

        if let Some(recheck) = self.recheck.as_mut() {
            if recheck.last_checked.elapsed() >= recheck.every {
                recheck.last_checked = Instant::now();
                let (day_phase, level) = recheck
                    .daylight
                    .evaluate(recheck.clock.as_ref(), Utc::now());
                self.state.day_phase = day_phase;
                self.state.brightness = level;
            }
        }
    }

    /// Render forever. Only a sink failure ends the loop.
    pub async fn run(mut self) -> Result<Infallible, SinkError> {
        tracing::info!(
            "Rendering {} positions every {:?}",
            self.positions.len(),
            self.settings.blink_interval
        );
        loop {
            if let Err(error) = self.tick() {
                tracing::error!("Render sink failed: {error}");
                return Err(error);
            }
            tokio::time::sleep(self.settings.blink_interval).await;
            self.advance();
        }
    }
}
