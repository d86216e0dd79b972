//! Editor diagnostic bridge
//!
//! Turns the located error into at most one editor marker. The marker starts
//! at the reported position and always covers [`HIGHLIGHT_WIDTH`] columns: the
//! engine reports no end position, so the span is an approximation and not the
//! width of the offending token.

use crate::locate::LocatedError;

/// Marker source owned by this bridge. Markers of other sources are left alone.
pub const MARKER_SOURCE: &str = "compiler";

/// Columns covered past the reported column.
pub const HIGHLIGHT_WIDTH: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
}

/// A highlighted span in the editor. Positions are 1-based; the end column is
/// exclusive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Marker {
    pub message: String,
    pub severity: Severity,
    pub start_line: u32,
    pub start_column: u32,
    pub end_line: u32,
    pub end_column: u32,
}

impl Marker {
    pub fn for_error(error: &LocatedError) -> Marker {
        Marker {
            message: error.message.clone(),
            severity: Severity::Error,
            start_line: error.line,
            start_column: error.column,
            end_line: error.line,
            end_column: error.column.saturating_add(HIGHLIGHT_WIDTH),
        }
    }

    /// Whether `(line, column)` falls inside this marker.
    pub fn covers(&self, line: u32, column: u32) -> bool {
        if line < self.start_line || line > self.end_line {
            return false;
        }
        let after_start = line > self.start_line || column >= self.start_column;
        let before_end = line < self.end_line || column < self.end_column;
        after_start && before_end
    }
}

/// Anything that can display markers, keyed by source.
///
/// `set_markers` replaces every marker of `source`; an empty list clears them.
pub trait MarkerSurface {
    fn set_markers(&mut self, source: &str, markers: Vec<Marker>);
}

/// Keeps a surface's `compiler` markers in step with the located error.
#[derive(Debug, Default)]
pub struct DiagnosticBridge {
    installed: Option<Option<LocatedError>>,
}

impl DiagnosticBridge {
    pub fn new() -> Self {
        DiagnosticBridge::default()
    }

    /// Push `error` to `surface` if it differs from what was pushed last.
    ///
    /// The first call always pushes. Returns whether the surface was touched.
    pub fn sync(&mut self, error: Option<&LocatedError>, surface: &mut dyn MarkerSurface) -> bool {
        if let Some(installed) = &self.installed {
            if installed.as_ref() == error {
                return false;
            }
        }
        let markers = error.map(Marker::for_error).into_iter().collect();
        surface.set_markers(MARKER_SOURCE, markers);
        self.installed = Some(error.cloned());
        true
    }
}
