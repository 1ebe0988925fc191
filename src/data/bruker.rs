use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use byteorder::{BigEndian, ByteOrder, LittleEndian};

use super::error::DataError;
use super::model::AcquisitionParams;

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Read a processed Bruker dataset from a `pdata/<procno>` directory.
///
/// Expects `procs` and `1r` inside `dir` and `acqus` at the dataset root two
/// levels up, the layout TopSpin writes. Returns the acquisition parameters
/// together with the decoded sample array; a missing file or parameter fails
/// the whole call, there is no partial result.
pub fn read_pdata(dir: &Path) -> Result<(AcquisitionParams, Vec<f64>)> {
    let acqus_path = dir.join("..").join("..").join("acqus");
    let acqus = parse_jcamp_file(&acqus_path).with_context(|| {
        format!(
            "no readable acqus two levels above {} (expected <dataset>/pdata/<procno>)",
            dir.display()
        )
    })?;
    let params = acquisition_params(&acqus)?;

    let procs = parse_jcamp_file(&dir.join("procs"))
        .with_context(|| format!("no readable procs in {}", dir.display()))?;
    let proc_params = proc_params(&procs)?;

    let samples = read_samples(&dir.join("1r"), &proc_params)?;
    Ok((params, samples))
}

// ---------------------------------------------------------------------------
// JCAMP-DX parameter files
// ---------------------------------------------------------------------------

/// Parse a JCAMP-DX parameter file into a key → value map.
///
/// Bruker parameter files hold one `##$KEY= value` entry per line; array
/// parameters declare their size as `(0..N)` and continue on the following
/// lines; `$$` starts a comment.
fn parse_jcamp(text: &str) -> BTreeMap<String, String> {
    let mut params = BTreeMap::new();
    let mut lines = text.lines().peekable();

    while let Some(line) = lines.next() {
        let Some(rest) = line.strip_prefix("##$") else {
            continue;
        };
        let Some((key, value)) = rest.split_once('=') else {
            continue;
        };

        let mut value = strip_comment(value).trim().to_string();
        if value.starts_with('(') && value.contains("..") {
            // Array parameter: the values follow on the next lines.
            let mut items = Vec::new();
            while let Some(next) = lines.peek() {
                if next.starts_with("##") {
                    break;
                }
                items.push(strip_comment(lines.next().unwrap()).trim().to_string());
            }
            value = items.join(" ");
        }

        params.insert(key.trim().to_string(), value);
    }
    params
}

fn strip_comment(line: &str) -> &str {
    line.split("$$").next().unwrap_or(line)
}

fn parse_jcamp_file(path: &Path) -> Result<BTreeMap<String, String>> {
    let text =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    Ok(parse_jcamp(&text))
}

fn param_f64(
    params: &BTreeMap<String, String>,
    file: &'static str,
    name: &'static str,
) -> Result<f64, DataError> {
    let raw = params
        .get(name)
        .ok_or(DataError::MissingParameter { file, name })?;
    raw.parse().map_err(|_| DataError::MalformedParameter {
        file,
        name,
        value: raw.clone(),
    })
}

fn param_i32(
    params: &BTreeMap<String, String>,
    file: &'static str,
    name: &'static str,
) -> Result<i32, DataError> {
    let raw = params
        .get(name)
        .ok_or(DataError::MissingParameter { file, name })?;
    raw.parse().map_err(|_| DataError::MalformedParameter {
        file,
        name,
        value: raw.clone(),
    })
}

fn acquisition_params(acqus: &BTreeMap<String, String>) -> Result<AcquisitionParams, DataError> {
    Ok(AcquisitionParams {
        spectral_width: param_f64(acqus, "acqus", "SW")?,
        carrier_offset: param_f64(acqus, "acqus", "O1")?,
        base_frequency: param_f64(acqus, "acqus", "BF1")?,
    })
}

// ---------------------------------------------------------------------------
// 1r binary
// ---------------------------------------------------------------------------

/// How `procs` says the `1r` payload is encoded.
#[derive(Debug, Clone, Copy)]
struct ProcParams {
    /// `BYTORDP`: 0 little-endian, 1 big-endian.
    big_endian: bool,
    /// `DTYPP`: 0 → i32 samples, 2 → f64 samples.
    double_precision: bool,
    /// `NC_proc`: stored values are scaled by 2^NC_proc.
    scale_exponent: i32,
}

fn proc_params(procs: &BTreeMap<String, String>) -> Result<ProcParams> {
    let bytordp = param_i32(procs, "procs", "BYTORDP")?;
    let dtypp = param_i32(procs, "procs", "DTYPP")?;
    let scale_exponent = param_i32(procs, "procs", "NC_proc")?;

    let big_endian = match bytordp {
        0 => false,
        1 => true,
        other => bail!("procs: unsupported BYTORDP {other}"),
    };
    let double_precision = match dtypp {
        0 => false,
        2 => true,
        other => bail!("procs: unsupported DTYPP {other}"),
    };

    Ok(ProcParams {
        big_endian,
        double_precision,
        scale_exponent,
    })
}

fn read_samples(path: &Path, procs: &ProcParams) -> Result<Vec<f64>> {
    let raw = fs::read(path).with_context(|| format!("reading {}", path.display()))?;

    let width = if procs.double_precision { 8 } else { 4 };
    if raw.is_empty() {
        bail!("{}: no sample data", path.display());
    }
    if raw.len() % width != 0 {
        bail!(
            "{}: truncated sample data ({} bytes is not a multiple of {width})",
            path.display(),
            raw.len()
        );
    }

    let scale = 2.0_f64.powi(procs.scale_exponent);
    let samples = if procs.big_endian {
        decode::<BigEndian>(&raw, procs.double_precision, scale)
    } else {
        decode::<LittleEndian>(&raw, procs.double_precision, scale)
    };
    Ok(samples)
}

fn decode<B: ByteOrder>(raw: &[u8], double_precision: bool, scale: f64) -> Vec<f64> {
    if double_precision {
        raw.chunks_exact(8).map(|c| B::read_f64(c) * scale).collect()
    } else {
        raw.chunks_exact(4)
            .map(|c| f64::from(B::read_i32(c)) * scale)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use byteorder::WriteBytesExt;

    use super::*;

    const ACQUS: &str = "\
##TITLE= Parameter file, TopSpin 4.1
##JCAMPDX= 5.0
##$BF1= 600.13
##$O1= 2823.0
##$SW= 20.0276  $$ ppm
##$D= (0..3)
0 4.0
1.0 0.002
##$PULPROG= <zg30>
##END=
";

    #[test]
    fn jcamp_scalars_arrays_and_comments() {
        let params = parse_jcamp(ACQUS);
        assert_eq!(params.get("SW").unwrap(), "20.0276");
        assert_eq!(params.get("BF1").unwrap(), "600.13");
        assert_eq!(params.get("D").unwrap(), "0 4.0 1.0 0.002");
        assert_eq!(params.get("PULPROG").unwrap(), "<zg30>");
        assert!(!params.contains_key("TITLE"));
    }

    #[test]
    fn acquisition_params_require_all_fields() {
        let mut params = parse_jcamp(ACQUS);
        params.remove("O1");
        assert_eq!(
            acquisition_params(&params),
            Err(DataError::MissingParameter {
                file: "acqus",
                name: "O1"
            })
        );
    }

    #[test]
    fn acquisition_params_reject_non_numeric_fields() {
        let mut params = parse_jcamp(ACQUS);
        params.insert("SW".into(), "twenty".into());
        assert!(matches!(
            acquisition_params(&params),
            Err(DataError::MalformedParameter { name: "SW", .. })
        ));
    }

    fn write_dataset(root: &Path, stored: &[i32]) -> std::path::PathBuf {
        let pdata = root.join("pdata").join("1");
        fs::create_dir_all(&pdata).unwrap();
        fs::write(root.join("acqus"), ACQUS).unwrap();
        fs::write(
            pdata.join("procs"),
            "##$BYTORDP= 0\n##$DTYPP= 0\n##$NC_proc= -2\n##$SI= 4\n##END=\n",
        )
        .unwrap();

        let mut raw = Vec::new();
        for &v in stored {
            raw.write_i32::<LittleEndian>(v).unwrap();
        }
        fs::write(pdata.join("1r"), raw).unwrap();
        pdata
    }

    #[test]
    fn reads_a_minimal_dataset() {
        let dir = tempfile::tempdir().unwrap();
        let pdata = write_dataset(dir.path(), &[400, -8, 0, 12]);

        let (params, samples) = read_pdata(&pdata).unwrap();
        assert_abs_diff_eq!(params.spectral_width, 20.0276);
        assert_abs_diff_eq!(params.base_frequency, 600.13);
        // NC_proc = -2 scales the stored integers by 2^-2.
        assert_eq!(samples, vec![100.0, -2.0, 0.0, 3.0]);
    }

    #[test]
    fn missing_pdata_files_are_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(read_pdata(dir.path()).is_err());
    }

    #[test]
    fn truncated_sample_payload_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let pdata = write_dataset(dir.path(), &[1, 2]);
        fs::write(pdata.join("1r"), [0u8; 7]).unwrap();
        assert!(read_pdata(&pdata).is_err());
    }

    #[test]
    fn big_endian_payloads_decode() {
        let dir = tempfile::tempdir().unwrap();
        let pdata = write_dataset(dir.path(), &[]);
        fs::write(
            pdata.join("procs"),
            "##$BYTORDP= 1\n##$DTYPP= 0\n##$NC_proc= 0\n##END=\n",
        )
        .unwrap();
        let mut raw = Vec::new();
        raw.write_i32::<BigEndian>(258).unwrap();
        fs::write(pdata.join("1r"), raw).unwrap();

        let (_, samples) = read_pdata(&pdata).unwrap();
        assert_eq!(samples, vec![258.0]);
    }
}
