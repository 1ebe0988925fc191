use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use super::error::DataError;
use super::model::{Peak, PeakTable};

/// Default intensity percentile: keep the top decile of peaks.
pub const DEFAULT_THRESHOLD: f64 = 0.9;

// ---------------------------------------------------------------------------
// peaklist.xml
// ---------------------------------------------------------------------------

// TopSpin writes peak picks as PeakList → PeakList1D → Peak1D, with the
// chemical shift and intensity as attributes:
//
//   <PeakList modified="...">
//     <PeakList1D>
//       <PeakList1DHeader .../>
//       <Peak1D F1="7.2600" intensity="980000.0" type="0"/>
//     </PeakList1D>
//   </PeakList>

#[derive(Debug, Deserialize)]
struct PeakListXml {
    #[serde(rename = "PeakList1D")]
    peak_list_1d: PeakList1DXml,
}

#[derive(Debug, Deserialize)]
struct PeakList1DXml {
    #[serde(rename = "Peak1D", default)]
    peaks: Vec<Peak1DXml>,
}

#[derive(Debug, Deserialize)]
struct Peak1DXml {
    #[serde(rename = "@F1")]
    f1: f64,
    #[serde(rename = "@intensity")]
    intensity: f64,
}

impl From<Peak1DXml> for Peak {
    fn from(raw: Peak1DXml) -> Self {
        Peak {
            ppm: raw.f1,
            intensity: raw.intensity,
        }
    }
}

/// Read a `peaklist.xml` into peak rows (`ppm`, `intensity`).
///
/// Fails when the file is missing, the XML is malformed, the
/// PeakList1D nesting is absent, or no Peak1D records are present.
pub fn read_peaklist(path: &Path) -> Result<Vec<Peak>> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let list: PeakListXml = quick_xml::de::from_reader(BufReader::new(file))
        .with_context(|| format!("parsing {}", path.display()))?;

    let peaks: Vec<Peak> = list.peak_list_1d.peaks.into_iter().map(Peak::from).collect();
    if peaks.is_empty() {
        return Err(DataError::EmptyPeakList)
            .with_context(|| format!("parsing {}", path.display()));
    }
    Ok(peaks)
}

// ---------------------------------------------------------------------------
// Percentile filter
// ---------------------------------------------------------------------------

/// Quantile of `values` at `q` ∈ [0, 1], linearly interpolated between the
/// two closest ranks.
pub fn quantile(values: &[f64], q: f64) -> Result<f64, DataError> {
    if !(0.0..=1.0).contains(&q) {
        return Err(DataError::ThresholdOutOfRange(q));
    }
    if values.is_empty() {
        return Err(DataError::EmptyPeakList);
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let rank = q * (sorted.len() - 1) as f64;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    let frac = rank - lower as f64;

    Ok(if upper >= sorted.len() {
        sorted[sorted.len() - 1]
    } else {
        sorted[lower] * (1.0 - frac) + sorted[upper] * frac
    })
}

/// Keep the peaks whose intensity lies strictly above the `threshold`
/// quantile of the given peaks' own intensity distribution.
///
/// The cutoff is recomputed from the input on every call. A peak exactly at
/// the cutoff is dropped; at threshold 0 this means rows equal to the
/// minimum intensity never survive.
pub fn filter_above_percentile(peaks: &[Peak], threshold: f64) -> Result<PeakTable, DataError> {
    let intensities: Vec<f64> = peaks.iter().map(|p| p.intensity).collect();
    let cutoff = quantile(&intensities, threshold)?;

    let peaks = peaks
        .iter()
        .copied()
        .filter(|p| p.intensity > cutoff)
        .collect();
    Ok(PeakTable { peaks })
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    fn peaks_with_intensities(intensities: &[f64]) -> Vec<Peak> {
        intensities
            .iter()
            .enumerate()
            .map(|(i, &intensity)| Peak {
                ppm: i as f64,
                intensity,
            })
            .collect()
    }

    const SAMPLE_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<PeakList modified="2024-05-14T10:31:00">
  <PeakList1D>
    <PeakList1DHeader creator="topspin" source="pdata/1"/>
    <Peak1D F1="7.2600" intensity="980000.0" type="0"/>
    <Peak1D F1="3.6600" intensity="760000.0" type="0"/>
  </PeakList1D>
</PeakList>"#;

    #[test]
    fn parses_nested_peak_records() {
        let list: PeakListXml = quick_xml::de::from_str(SAMPLE_XML).unwrap();
        let peaks: Vec<Peak> = list.peak_list_1d.peaks.into_iter().map(Peak::from).collect();
        assert_eq!(peaks.len(), 2);
        assert_abs_diff_eq!(peaks[0].ppm, 7.26);
        assert_abs_diff_eq!(peaks[0].intensity, 980000.0);
    }

    #[test]
    fn rejects_missing_nesting() {
        let broken = r#"<?xml version="1.0"?><PeakList><Peak1D F1="1.0" intensity="2.0"/></PeakList>"#;
        assert!(quick_xml::de::from_str::<PeakListXml>(broken).is_err());
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(read_peaklist(&dir.path().join("peaklist.xml")).is_err());
    }

    #[test]
    fn empty_peak_list_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("peaklist.xml");
        std::fs::write(&path, "<PeakList><PeakList1D></PeakList1D></PeakList>").unwrap();
        let err = read_peaklist(&path).unwrap_err();
        assert_eq!(
            err.downcast_ref::<DataError>(),
            Some(&DataError::EmptyPeakList)
        );
    }

    #[test]
    fn quantile_interpolates_between_closest_ranks() {
        let values: Vec<f64> = (1..=10).map(f64::from).collect();
        assert_abs_diff_eq!(quantile(&values, 0.9).unwrap(), 9.1);
        assert_abs_diff_eq!(quantile(&values, 0.0).unwrap(), 1.0);
        assert_abs_diff_eq!(quantile(&values, 1.0).unwrap(), 10.0);
        assert_abs_diff_eq!(quantile(&values, 0.5).unwrap(), 5.5);
    }

    #[test]
    fn quantile_rejects_out_of_range_thresholds() {
        assert_eq!(
            quantile(&[1.0], 1.5),
            Err(DataError::ThresholdOutOfRange(1.5))
        );
        assert_eq!(
            quantile(&[1.0], -0.1),
            Err(DataError::ThresholdOutOfRange(-0.1))
        );
    }

    #[test]
    fn filter_keeps_only_rows_strictly_above_the_cutoff() {
        // Quantile of [1..10] at 0.9 is 9.1, so only the 10 survives.
        let peaks = peaks_with_intensities(&(1..=10).map(f64::from).collect::<Vec<_>>());
        let table = filter_above_percentile(&peaks, 0.9).unwrap();
        assert_eq!(table.len(), 1);
        assert_abs_diff_eq!(table.peaks[0].intensity, 10.0);
    }

    #[test]
    fn peak_equal_to_the_cutoff_is_excluded() {
        // With q = 0.5 the cutoff lands exactly on the middle value.
        let peaks = peaks_with_intensities(&[1.0, 2.0, 3.0]);
        let table = filter_above_percentile(&peaks, 0.5).unwrap();
        assert_eq!(table.len(), 1);
        assert_abs_diff_eq!(table.peaks[0].intensity, 3.0);
    }

    #[test]
    fn threshold_zero_excludes_the_minimum() {
        let peaks = peaks_with_intensities(&[5.0, 5.0, 7.0, 9.0]);
        let table = filter_above_percentile(&peaks, 0.0).unwrap();
        let kept: Vec<f64> = table.peaks.iter().map(|p| p.intensity).collect();
        assert_eq!(kept, vec![7.0, 9.0]);
    }

    #[test]
    fn refiltering_recomputes_the_cutoff_on_its_input() {
        // Filtering at 0 twice is not idempotent: the second pass sees a
        // smaller distribution and computes a new minimum.
        let peaks = peaks_with_intensities(&[1.0, 2.0, 3.0, 4.0]);
        let once = filter_above_percentile(&peaks, 0.0).unwrap();
        let kept: Vec<f64> = once.peaks.iter().map(|p| p.intensity).collect();
        assert_eq!(kept, vec![2.0, 3.0, 4.0]);

        let twice = filter_above_percentile(&once.peaks, 0.0).unwrap();
        let kept: Vec<f64> = twice.peaks.iter().map(|p| p.intensity).collect();
        assert_eq!(kept, vec![3.0, 4.0]);
    }
}
