use std::sync::{Arc, Mutex};

use metar_engine::{FrameSnapshot, ModeStore, ModeToggle, SharedStations};
use tokio::sync::watch;

pub type SharedToggle = Arc<Mutex<ModeToggle<Box<dyn ModeStore>>>>;

/// Shared state behind the status endpoints
#[derive(Clone)]
pub struct AppState {
    /// Enriched stations, swapped whole on every refresh
    pub stations: SharedStations,
    /// Last frame the render loop pushed to the light string
    pub snapshots: watch::Receiver<FrameSnapshot>,
    /// The only writer of the display mode
    pub toggle: SharedToggle,
}

impl AppState {
    pub fn new(
        stations: SharedStations,
        snapshots: watch::Receiver<FrameSnapshot>,
        toggle: ModeToggle<Box<dyn ModeStore>>,
    ) -> Self {
        Self {
            stations,
            snapshots,
            toggle: Arc::new(Mutex::new(toggle)),
        }
    }
}
