use std::path::Path;

use metar_core::Position;
use thiserror::Error;

/// Marks a position with no station behind it.
pub const UNPOPULATED: &str = "NULL";

#[derive(Error, Debug)]
pub enum PositionsError {
    #[error("Failed to read positions file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Positions file '{path}' lists no positions")]
    Empty { path: String },
}

/// One position per line, in light string order.
///
/// Lines are trimmed; `NULL` and blank lines are unpopulated. A trailing
/// newline does not add a position.
pub fn parse_positions(text: &str) -> Vec<Position> {
    text.lines()
        .map(str::trim)
        .map(|line| match line {
            "" | UNPOPULATED => Position::Unpopulated,
            station => Position::Station(station.to_string()),
        })
        .collect()
}

pub fn load_positions(path: &Path) -> Result<Vec<Position>, PositionsError> {
    let text = std::fs::read_to_string(path).map_err(|source| PositionsError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let positions = parse_positions(&text);
    if positions.is_empty() {
        return Err(PositionsError::Empty {
            path: path.display().to_string(),
        });
    }

    let populated = positions.iter().filter(|p| p.station_id().is_some()).count();
    tracing::info!(
        "Loaded {} positions ({} populated) from {}",
        positions.len(),
        populated,
        path.display()
    );
    Ok(positions)
}
