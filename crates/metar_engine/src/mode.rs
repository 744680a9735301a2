//! Shared display mode.
//!
//! The render loop reads the mode once per tick; the only writer is the
//! [`ModeToggle`] that handles button presses. There is exactly one
//! [`ModeWriter`] per cell, so a plain atomic load/store is enough.

use std::sync::Arc;
use std::sync::atomic::{AtomicU8, Ordering};

use metar_core::DisplayMode;

use crate::collab::{ModeStore, ModeStoreError};

const FLIGHT_CATEGORY: u8 = 0;
const TEMPERATURE: u8 = 1;

fn encode(mode: DisplayMode) -> u8 {
    match mode {
        DisplayMode::FlightCategory => FLIGHT_CATEGORY,
        DisplayMode::Temperature => TEMPERATURE,
    }
}

fn decode(raw: u8) -> DisplayMode {
    match raw {
        TEMPERATURE => DisplayMode::Temperature,
        _ => DisplayMode::FlightCategory,
    }
}

/// Read side of the mode cell. Cheap to clone.
#[derive(Debug, Clone)]
pub struct ModeReader {
    cell: Arc<AtomicU8>,
}

impl ModeReader {
    pub fn get(&self) -> DisplayMode {
        decode(self.cell.load(Ordering::Acquire))
    }
}

/// Write side of the mode cell. Deliberately not `Clone`.
#[derive(Debug)]
pub struct ModeWriter {
    cell: Arc<AtomicU8>,
}

impl ModeWriter {
    pub fn get(&self) -> DisplayMode {
        decode(self.cell.load(Ordering::Acquire))
    }

    pub fn set(&self, mode: DisplayMode) {
        self.cell.store(encode(mode), Ordering::Release);
    }

    pub fn reader(&self) -> ModeReader {
        ModeReader {
            cell: Arc::clone(&self.cell),
        }
    }
}

/// Create a mode cell holding `initial`.
pub fn mode_cell(initial: DisplayMode) -> (ModeWriter, ModeReader) {
    let cell = Arc::new(AtomicU8::new(encode(initial)));
    let reader = ModeReader {
        cell: Arc::clone(&cell),
    };
    (ModeWriter { cell }, reader)
}

/// Handles mode button presses: flips the live mode and persists it.
pub struct ModeToggle<S: ModeStore> {
    writer: ModeWriter,
    store: S,
    persisted: bool,
}

impl<S: ModeStore> ModeToggle<S> {
    pub fn new(writer: ModeWriter, store: S) -> Self {
        ModeToggle {
            writer,
            store,
            persisted: true,
        }
    }

    pub fn current(&self) -> DisplayMode {
        self.writer.get()
    }

    /// False while the live mode differs from what the last save wrote.
    pub fn persisted(&self) -> bool {
        self.persisted
    }

    pub fn reader(&self) -> ModeReader {
        self.writer.reader()
    }

    /// Flip the mode. The live mode changes even if persisting it fails;
    /// the error is returned so the caller can report it.
    pub fn toggle(&mut self) -> Result<DisplayMode, ModeStoreError> {
        tracing::info!("Mode button was pushed");
        let mode = self.writer.get().toggled();
        self.writer.set(mode);
        tracing::info!("Display mode is now {}", mode.as_str());

        let saved = self.store.save(mode);
        self.persisted = saved.is_ok();
        saved.map(|()| mode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default, Clone)]
    struct MemoryStore {
        saved: Arc<Mutex<Vec<DisplayMode>>>,
        fail: bool,
    }

    impl ModeStore for MemoryStore {
        fn load(&self) -> Result<DisplayMode, ModeStoreError> {
            Ok(self
                .saved
                .lock()
                .unwrap()
                .last()
                .copied()
                .unwrap_or_default())
        }

        fn save(&mut self, mode: DisplayMode) -> Result<(), ModeStoreError> {
            if self.fail {
                return Err(ModeStoreError::Io {
                    path: "memory".into(),
                    source: std::io::Error::other("read-only"),
                });
            }
            self.saved.lock().unwrap().push(mode);
            Ok(())
        }
    }

    #[test]
    fn test_reader_sees_writer_updates() {
        let (writer, reader) = mode_cell(DisplayMode::Temperature);
        assert_eq!(reader.get(), DisplayMode::Temperature);

        writer.set(DisplayMode::FlightCategory);
        assert_eq!(reader.get(), DisplayMode::FlightCategory);
        assert_eq!(writer.reader().get(), DisplayMode::FlightCategory);
    }

    #[test]
    fn test_toggle_flips_and_persists() {
        let store = MemoryStore::default();
        let (writer, reader) = mode_cell(DisplayMode::FlightCategory);
        let mut toggle = ModeToggle::new(writer, store.clone());

        assert_eq!(toggle.toggle().unwrap(), DisplayMode::Temperature);
        assert_eq!(reader.get(), DisplayMode::Temperature);
        assert_eq!(toggle.toggle().unwrap(), DisplayMode::FlightCategory);
        assert_eq!(reader.get(), DisplayMode::FlightCategory);

        assert_eq!(
            *store.saved.lock().unwrap(),
            vec![DisplayMode::Temperature, DisplayMode::FlightCategory]
        );
        assert_eq!(store.load().unwrap(), DisplayMode::FlightCategory);
    }

    #[test]
    fn test_toggle_keeps_live_mode_when_save_fails() {
        let store = MemoryStore {
            fail: true,
            ..MemoryStore::default()
        };
        let (writer, reader) = mode_cell(DisplayMode::FlightCategory);
        let mut toggle = ModeToggle::new(writer, store);

        assert!(toggle.persisted());
        assert!(toggle.toggle().is_err());
        assert_eq!(reader.get(), DisplayMode::Temperature);
        assert_eq!(toggle.current(), DisplayMode::Temperature);
        assert!(!toggle.persisted());
    }

    #[test]
    fn test_successful_save_clears_unpersisted_flag() {
        let mut store = MemoryStore {
            fail: true,
            ..MemoryStore::default()
        };
        let (writer, _reader) = mode_cell(DisplayMode::FlightCategory);
        let mut toggle = ModeToggle::new(writer, store.clone());
        assert!(toggle.toggle().is_err());
        assert!(!toggle.persisted());

        store.fail = false;
        toggle.store = store;
        assert_eq!(toggle.toggle().unwrap(), DisplayMode::FlightCategory);
        assert!(toggle.persisted());
    }
}
