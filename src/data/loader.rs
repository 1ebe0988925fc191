use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use super::bruker;
use super::model::{AcquisitionParams, PeakTable, Spectrum1D};
use super::peaks::{self, DEFAULT_THRESHOLD};
use super::shift;

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Everything the viewer needs from one processed dataset.
#[derive(Debug, Clone)]
pub struct LoadedDataset {
    /// The pdata directory this was read from.
    pub source: PathBuf,
    pub params: AcquisitionParams,
    pub spectrum: Spectrum1D,
    /// Peaks above the intensity percentile, in file order.
    pub peaks: PeakTable,
}

/// Load a processed Bruker dataset from a `pdata/<procno>` directory: read
/// the vendor files, compute the chemical-shift axis, and filter
/// `peaklist.xml` at [`DEFAULT_THRESHOLD`].
pub fn load_dataset(pdata_dir: &Path) -> Result<LoadedDataset> {
    let (params, samples) = bruker::read_pdata(pdata_dir)?;
    let shifts = shift::chemical_shift_axis(&params)?;
    let spectrum = Spectrum1D::new(shifts, samples);

    let peaklist_path = pdata_dir.join("peaklist.xml");
    let all_peaks = peaks::read_peaklist(&peaklist_path)?;
    let table = peaks::filter_above_percentile(&all_peaks, DEFAULT_THRESHOLD)
        .with_context(|| format!("filtering {}", peaklist_path.display()))?;

    Ok(LoadedDataset {
        source: pdata_dir.to_path_buf(),
        params,
        spectrum,
        peaks: table,
    })
}
