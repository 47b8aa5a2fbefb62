use thiserror::Error;

use hifitime::HifitimeError;

#[derive(Debug, Error)]
pub enum Error {
    /// Page is too short to contain the three header lines.
    #[error("{0}: missing header")]
    MissingHeader(String),

    /// One of the header fields (number of epochs, interval, number of satellites)
    /// could not be interpreted.
    #[error("{0}: malformed header (line {1})")]
    MalformedHeader(String, usize),

    /// No epoch marker found after the header.
    #[error("{0}: no epoch record")]
    MissingEpochRecord(String),

    /// Page ended before the announced number of records.
    #[error("{0}: truncated page (expected {1} lines, got {2})")]
    TruncatedPage(String, usize, usize),

    #[error("malformed epoch record \"{0}\"")]
    MalformedEpoch(String),

    #[error("malformed satellite record \"{0}\"")]
    MalformedRecord(String),

    /// Satellite identifier that does not belong to the constellation table.
    #[error("unknown satellite \"{0}\"")]
    UnknownSatellite(String),

    #[error("invalid epoch: {0}")]
    InvalidEpoch(#[from] HifitimeError),

    /// High rate clock streams only cover the observed part of ultra rapid products.
    #[error("predicted ultra rapid segments are not available in clock streams")]
    PredictedClockStream,

    #[error("unknown clock format \"{0}\"")]
    UnknownClockFormat(String),

    #[error("unknown interpolation method \"{0}\"")]
    UnknownInterpolationMethod(String),

    #[error("unknown ultra rapid mode \"{0}\"")]
    UnknownUltraRapidMode(String),

    /// Window of at least one point is required to interpolate.
    #[error("interpolation window size must be at least 1")]
    InvalidWindowSize,

    #[error("unknown product sort \"{0}\"")]
    UnknownProductSort(String),

    /// First or last file name of a product sequence cannot be interpreted.
    #[error("invalid product file name \"{0}\"")]
    InvalidFileName(String),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}
