use std::path::PathBuf;

use metar_core::DisplayMode;
use metar_engine::{ModeStore, ModeStoreError};
use serde_json::{Map, Value};

/// Display mode persisted under the `"mode"` key of a JSON object.
///
/// Other keys in the file are left as they are.
pub struct JsonModeStore {
    path: PathBuf,
}

impl JsonModeStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        JsonModeStore { path: path.into() }
    }

    fn path_name(&self) -> String {
        self.path.display().to_string()
    }

    fn read_object(&self) -> Result<Map<String, Value>, ModeStoreError> {
        let content = std::fs::read_to_string(&self.path).map_err(|source| ModeStoreError::Io {
            path: self.path_name(),
            source,
        })?;
        match serde_json::from_str::<Value>(&content) {
            Ok(Value::Object(object)) => Ok(object),
            Ok(_) => Err(ModeStoreError::Parse {
                path: self.path_name(),
                message: "expected a JSON object".into(),
            }),
            Err(e) => Err(ModeStoreError::Parse {
                path: self.path_name(),
                message: e.to_string(),
            }),
        }
    }
}

impl ModeStore for JsonModeStore {
    fn load(&self) -> Result<DisplayMode, ModeStoreError> {
        let object = self.read_object()?;
        let mode = object.get("mode").and_then(Value::as_str);
        match mode.and_then(DisplayMode::parse) {
            Some(mode) => Ok(mode),
            None => {
                tracing::warn!(
                    "No usable mode in {} (found {:?}), using {}",
                    self.path.display(),
                    mode,
                    DisplayMode::default().as_str()
                );
                Ok(DisplayMode::default())
            }
        }
    }

    fn save(&mut self, mode: DisplayMode) -> Result<(), ModeStoreError> {
        let mut object = match self.read_object() {
            Ok(object) => object,
            Err(ModeStoreError::Io { source, .. })
                if source.kind() == std::io::ErrorKind::NotFound =>
            {
                Map::new()
            }
            Err(error) => return Err(error),
        };
        object.insert("mode".into(), Value::String(mode.as_str().into()));

        let content = serde_json::to_string_pretty(&Value::Object(object)).map_err(|e| {
            ModeStoreError::Parse {
                path: self.path_name(),
                message: e.to_string(),
            }
        })?;
        std::fs::write(&self.path, content).map_err(|source| ModeStoreError::Io {
            path: self.path_name(),
            source,
        })
    }
}
