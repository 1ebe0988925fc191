use thiserror::Error;

/// Data-validation failures raised by the data layer.
///
/// Plain I/O and file-format failures carry `anyhow` context naming the file
/// being read; this enum covers the contracts the arithmetic itself enforces.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DataError {
    #[error("{file}: missing required parameter {name}")]
    MissingParameter {
        file: &'static str,
        name: &'static str,
    },

    #[error("{file}: parameter {name} is not numeric: '{value}'")]
    MalformedParameter {
        file: &'static str,
        name: &'static str,
        value: String,
    },

    #[error("base frequency (BF1) is zero, chemical shifts are undefined")]
    ZeroBaseFrequency,

    #[error("spectral width (SW) must be positive, got {0}")]
    NonPositiveSpectralWidth(f64),

    #[error("peak list contains no peaks")]
    EmptyPeakList,

    #[error("percentile threshold must lie in [0, 1], got {0}")]
    ThresholdOutOfRange(f64),

    #[error("chemical shift {0} ppm is not a point on the axis")]
    ShiftNotOnAxis(f64),
}
