use std::ops::Range;

use crate::data::loader::LoadedDataset;
use crate::data::shift;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
#[derive(Default)]
pub struct AppState {
    /// Loaded dataset (None until the user opens a pdata folder).
    pub dataset: Option<LoadedDataset>,

    /// Text inputs for the optional plot window bounds (ppm).
    pub start_input: String,
    pub stop_input: String,

    /// Applied window over the shift axis, as an index range.
    pub window: Option<Range<usize>>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    /// Ingest a newly loaded dataset and reset the window.
    pub fn set_dataset(&mut self, dataset: LoadedDataset) {
        self.dataset = Some(dataset);
        self.start_input.clear();
        self.stop_input.clear();
        self.window = None;
        self.status_message = None;
    }

    /// Apply the window bounds from the text inputs to the current axis.
    ///
    /// Bounds must match an axis point exactly; a failed lookup lands in the
    /// status bar and leaves the previous window untouched.
    pub fn apply_window(&mut self) {
        let Some(dataset) = &self.dataset else {
            return;
        };

        let start = match parse_bound(&self.start_input, "start") {
            Ok(v) => v,
            Err(msg) => {
                self.status_message = Some(msg);
                return;
            }
        };
        let stop = match parse_bound(&self.stop_input, "stop") {
            Ok(v) => v,
            Err(msg) => {
                self.status_message = Some(msg);
                return;
            }
        };

        match shift::window(&dataset.spectrum.shifts, start, stop) {
            Ok(range) => {
                self.window = Some(range);
                self.status_message = None;
            }
            Err(e) => self.status_message = Some(format!("Error: {e}")),
        }
    }

    /// Clear the applied window and show the full axis again.
    pub fn reset_window(&mut self) {
        self.window = None;
        self.start_input.clear();
        self.stop_input.clear();
        self.status_message = None;
    }
}

/// Empty input means "no bound"; anything else must parse as f64.
fn parse_bound(input: &str, which: &str) -> Result<Option<f64>, String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    trimmed
        .parse::<f64>()
        .map(Some)
        .map_err(|_| format!("Error: {which} bound '{trimmed}' is not a number"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{AcquisitionParams, PeakTable, Spectrum1D};

    fn state_with_axis(shifts: Vec<f64>) -> AppState {
        let n = shifts.len();
        let mut state = AppState::default();
        state.set_dataset(LoadedDataset {
            source: "pdata/1".into(),
            params: AcquisitionParams {
                spectral_width: 10.0,
                carrier_offset: 0.0,
                base_frequency: 500.0,
            },
            spectrum: Spectrum1D::new(shifts, vec![0.0; n]),
            peaks: PeakTable::default(),
        });
        state
    }

    #[test]
    fn applies_exact_bounds() {
        let mut state = state_with_axis(vec![5.0, 4.0, 3.0, 2.0, 1.0]);
        state.start_input = "4.0".into();
        state.stop_input = "2.0".into();
        state.apply_window();
        assert_eq!(state.window, Some(1..3));
        assert!(state.status_message.is_none());
    }

    #[test]
    fn off_axis_bound_reports_an_error_and_keeps_the_window() {
        let mut state = state_with_axis(vec![5.0, 4.0, 3.0, 2.0, 1.0]);
        state.start_input = "4.0".into();
        state.apply_window();
        assert_eq!(state.window, Some(1..5));

        state.start_input = "3.5".into();
        state.apply_window();
        assert_eq!(state.window, Some(1..5));
        assert!(state.status_message.as_deref().unwrap().contains("3.5"));
    }

    #[test]
    fn non_numeric_bound_reports_an_error() {
        let mut state = state_with_axis(vec![5.0, 4.0, 3.0]);
        state.stop_input = "abc".into();
        state.apply_window();
        assert!(state.window.is_none());
        assert!(state.status_message.is_some());
    }
}
