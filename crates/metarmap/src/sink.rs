//! Render sinks that stand in for the physical light string.

use std::io::Write;

use metar_core::Color;
use metar_engine::{RenderSink, SinkError};

/// Draws the strip as one line of colored blocks on an ANSI terminal.
///
/// Frames arrive in the strip's GRB channel order and are scaled by the
/// brightness before display.
pub struct TerminalSink<W: Write + Send> {
    out: W,
    length: usize,
}

impl<W: Write + Send> TerminalSink<W> {
    pub fn new(out: W, length: usize) -> Self {
        TerminalSink { out, length }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

fn scale(channel: u8, brightness: f32) -> u8 {
    (f32::from(channel) * brightness.clamp(0.0, 1.0)).round() as u8
}

impl<W: Write + Send> RenderSink for TerminalSink<W> {
    fn show(&mut self, frame: &[Color], brightness: f32) -> Result<(), SinkError> {
        if frame.len() != self.length {
            return Err(SinkError::LengthMismatch {
                expected: self.length,
                actual: frame.len(),
            });
        }

        let mut line = String::with_capacity(frame.len() * 24 + 8);
        line.push('\r');
        for Color(g, r, b) in frame {
            let (r, g, b) = (scale(*r, brightness), scale(*g, brightness), scale(*b, brightness));
            line.push_str(&format!("\x1b[38;2;{r};{g};{b}m\u{25cf}"));
        }
        line.push_str("\x1b[0m");

        self.out
            .write_all(line.as_bytes())
            .and_then(|_| self.out.flush())
            .map_err(|e| SinkError::Device(e.to_string()))
    }
}

/// Logs every frame instead of lighting anything.
pub struct LogSink {
    length: usize,
}

impl LogSink {
    pub fn new(length: usize) -> Self {
        LogSink { length }
    }
}

impl RenderSink for LogSink {
    fn show(&mut self, frame: &[Color], brightness: f32) -> Result<(), SinkError> {
        if frame.len() != self.length {
            return Err(SinkError::LengthMismatch {
                expected: self.length,
                actual: frame.len(),
            });
        }
        let lit = frame.iter().filter(|color| **color != Color::default()).count();
        tracing::debug!(brightness, lit, total = frame.len(), "Frame");
        tracing::trace!(
            "{}",
            frame.iter().map(Color::to_hex).collect::<Vec<_>>().join(" ")
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_sink_reorders_and_scales() {
        let mut sink = TerminalSink::new(Vec::new(), 2);
        sink.show(&[Color(255, 0, 0), Color(0, 200, 100)], 0.5).unwrap();

        let out = String::from_utf8(sink.into_inner()).unwrap();
        // GRB (255,0,0) is green
        assert!(out.contains("\x1b[38;2;0;128;0m"));
        assert!(out.contains("\x1b[38;2;100;0;50m"));
        assert!(out.ends_with("\x1b[0m"));
    }

    #[test]
    fn test_length_mismatch_is_rejected() {
        let mut terminal = TerminalSink::new(Vec::new(), 3);
        assert!(matches!(
            terminal.show(&[Color::default()], 1.0),
            Err(SinkError::LengthMismatch {
                expected: 3,
                actual: 1
            })
        ));

        let mut log = LogSink::new(1);
        assert!(log.show(&[Color::default()], 0.2).is_ok());
        assert!(log.show(&[], 0.2).is_err());
    }
}
