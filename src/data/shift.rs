use std::ops::Range;

use super::error::DataError;
use super::model::AcquisitionParams;

// ---------------------------------------------------------------------------
// Chemical-shift axis
// ---------------------------------------------------------------------------

/// Number of points the frequency-domain spectrum is zero-filled to before
/// chemical-shift assignment.
pub const ZERO_FILL_SIZE: usize = 65536;

/// Compute the chemical-shift axis (ppm) for a processed spectrum.
///
/// With `offset = SW/2 - O1/BF1`, the axis runs from `SW - offset` down
/// towards `-offset` in steps of `SW / ZERO_FILL_SIZE`, capped at
/// [`ZERO_FILL_SIZE`] points. Deterministic for identical inputs.
pub fn chemical_shift_axis(params: &AcquisitionParams) -> Result<Vec<f64>, DataError> {
    if params.base_frequency == 0.0 {
        return Err(DataError::ZeroBaseFrequency);
    }
    // A strictly decreasing axis needs step > 0.
    if !(params.spectral_width > 0.0) {
        return Err(DataError::NonPositiveSpectralWidth(params.spectral_width));
    }

    let offset = params.spectral_width / 2.0 - params.carrier_offset / params.base_frequency;
    let start = params.spectral_width - offset;
    let end = -offset;
    let step = params.spectral_width / ZERO_FILL_SIZE as f64;

    let count = (((start - end) / step).ceil() as usize).min(ZERO_FILL_SIZE);
    Ok((0..count).map(|i| start - step * i as f64).collect())
}

// ---------------------------------------------------------------------------
// Exact-match windowing
// ---------------------------------------------------------------------------

/// Locate `value` on a strictly decreasing axis, by exact match.
fn position_exact(axis: &[f64], value: f64) -> Result<usize, DataError> {
    let idx = axis.partition_point(|&x| x > value);
    if axis.get(idx).copied() == Some(value) {
        Ok(idx)
    } else {
        Err(DataError::ShiftNotOnAxis(value))
    }
}

/// Resolve optional `start`/`stop` bounds to an index range over the axis.
///
/// Bounds must match an axis element exactly; a value not on the axis is an
/// error, never clipped to the nearest point. `stop` is looked up within the
/// tail selected by `start`, so a stop at or before the start bound fails.
pub fn window(
    axis: &[f64],
    start: Option<f64>,
    stop: Option<f64>,
) -> Result<Range<usize>, DataError> {
    let lo = match start {
        Some(value) => position_exact(axis, value)?,
        None => 0,
    };
    let hi = match stop {
        Some(value) => lo + position_exact(&axis[lo..], value)?,
        None => axis.len(),
    };
    Ok(lo..hi)
}
