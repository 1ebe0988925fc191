use std::fmt;

// ---------------------------------------------------------------------------
// AcquisitionParams – the acqus fields the viewer consumes
// ---------------------------------------------------------------------------

/// Acquisition parameters read from `acqus`.
///
/// A typed struct rather than the raw parameter map, so a missing or
/// non-numeric field fails once, at construction, with a named error.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AcquisitionParams {
    /// Spectral width (`SW`), ppm.
    pub spectral_width: f64,
    /// Carrier offset (`O1`), Hz.
    pub carrier_offset: f64,
    /// Base frequency (`BF1`), MHz.
    pub base_frequency: f64,
}

// ---------------------------------------------------------------------------
// Spectrum1D – shift axis plus matching intensities
// ---------------------------------------------------------------------------

/// A processed 1D spectrum: chemical-shift axis and intensities, paired.
#[derive(Debug, Clone)]
pub struct Spectrum1D {
    /// Chemical-shift axis (ppm), strictly decreasing.
    pub shifts: Vec<f64>,
    /// Intensities – same length as `shifts`.
    pub intensities: Vec<f64>,
}

impl Spectrum1D {
    /// Pair an axis with sample intensities, truncating to the common length.
    pub fn new(mut shifts: Vec<f64>, mut intensities: Vec<f64>) -> Self {
        let n = shifts.len().min(intensities.len());
        shifts.truncate(n);
        intensities.truncate(n);
        Spectrum1D {
            shifts,
            intensities,
        }
    }

    /// Number of plotted points.
    pub fn len(&self) -> usize {
        self.shifts.len()
    }

    /// Whether the spectrum has no points.
    pub fn is_empty(&self) -> bool {
        self.shifts.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Peak / PeakTable – the filtered peak list
// ---------------------------------------------------------------------------

/// One peak-list row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Peak {
    pub ppm: f64,
    pub intensity: f64,
}

/// Peaks surviving the percentile filter, in file order.
#[derive(Debug, Clone, Default)]
pub struct PeakTable {
    pub peaks: Vec<Peak>,
}

impl PeakTable {
    /// Number of retained peaks.
    pub fn len(&self) -> usize {
        self.peaks.len()
    }

    /// Whether any peaks survived the filter.
    pub fn is_empty(&self) -> bool {
        self.peaks.is_empty()
    }
}

/// Aligned two-column rendering, as printed to stdout after a load.
impl fmt::Display for PeakTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{:>12}  {:>14}", "ppm", "intensity")?;
        for peak in &self.peaks {
            writeln!(f, "{:>12.4}  {:>14.4}", peak.ppm, peak.intensity)?;
        }
        Ok(())
    }
}
