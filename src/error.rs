//! Error types for the sounding-workbench crate.
use crate::profile::LevelId;
use thiserror::Error;

/// Error type for the crate.
#[derive(Clone, Copy, PartialEq, Debug, Error)]
pub enum AnalysisError {
    /// Physically invalid input, e.g. a dew point warmer than the temperature.
    #[error("Physically invalid input: {0}.")]
    Domain(&'static str),
    /// The requested pressure is outside the range of enabled levels.
    #[error("Pressure {0} hPa is outside the enabled range of the profile.")]
    PressureOutOfRange(f64),
    /// The requested height is outside the range of enabled levels.
    #[error("Height {0} m is outside the enabled range of the profile.")]
    HeightOutOfRange(f64),
    /// No level in the profile carries this identity.
    #[error("No level with id {0} in the profile.")]
    UnknownLevel(LevelId),
    /// A value (surface value, index, location, etc) that is required is not available.
    #[error("Missing value required for analysis.")]
    MissingValue,
    /// Not enough data available for analysis.
    #[error("Not enough data available for analysis.")]
    NotEnoughData,
    /// Bad or invalid input.
    #[error("Invalid input.")]
    InvalidInput,
}

/// Broad classes of [`AnalysisError`].
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ErrorKind {
    /// Physically invalid input.
    Domain,
    /// A pressure, height, or identity that could not be found.
    Lookup,
    /// Missing or insufficient data.
    Data,
}

impl AnalysisError {
    /// Which class of error this is.
    pub fn kind(&self) -> ErrorKind {
        use AnalysisError::*;

        match self {
            Domain(_) => ErrorKind::Domain,
            PressureOutOfRange(_) | HeightOutOfRange(_) | UnknownLevel(_) => ErrorKind::Lookup,
            MissingValue | NotEnoughData | InvalidInput => ErrorKind::Data,
        }
    }
}

/// Shorthand for results.
pub type Result<T> = ::std::result::Result<T, AnalysisError>;
