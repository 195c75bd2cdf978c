use std::fmt;

use thiserror::Error;

/// Which raster dimension failed validation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dimension {
    /// Raster width
    Width,
    /// Raster height
    Height,
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dimension::Width => f.write_str("width"),
            Dimension::Height => f.write_str("height"),
        }
    }
}

/// Whole-call failure reported by a decoding engine
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// The bytes are not an image the engine can parse (including empty input)
    #[error("failed to load image")]
    Load,

    /// Any other engine-side failure
    #[error("engine failure: {0}")]
    Internal(String),
}

/// Broad class of a [`DecodeError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The image argument has an unsupported shape
    InvalidArgument,
    /// A raster width or height is not a positive integer
    InvalidDimension,
    /// Raster buffer length does not match 1, 3 or 4 channels
    UnsupportedChannelCount,
    /// The engine could not parse the image at all
    EngineLoadFailure,
    /// Engine or worker failure unrelated to the input
    Internal,
}

/// Error returned by a decode call.
///
/// Argument and geometry errors are returned synchronously, before any work is
/// scheduled. Engine errors arrive through the completion convention.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DecodeError {
    /// The image argument is neither a buffer nor a usable raster descriptor
    #[error("{0}")]
    InvalidArgument(String),

    /// Width or height is zero, negative, fractional, non-finite or too large
    #[error("invalid {dimension}: {value}")]
    InvalidDimension {
        /// Offending dimension
        dimension: Dimension,
        /// Value as supplied
        value: f64,
    },

    /// `len(pixels) / (width * height)` is not 1, 3 or 4
    #[error("unsupported channel count {0}, expected 1, 3 or 4")]
    UnsupportedChannelCount(f64),

    /// Whole-image engine failure
    #[error(transparent)]
    Engine(#[from] EngineError),

    /// The engine panicked while decoding
    #[error("decoding engine panicked: {0}")]
    EnginePanicked(String),

    /// The worker went away without settling the call
    #[error("decode worker terminated without a result")]
    WorkerLost,
}

impl DecodeError {
    pub(crate) fn not_a_buffer(kind: &str) -> Self {
        DecodeError::InvalidArgument(format!(
            "image must be a buffer or a raster descriptor, got {kind}"
        ))
    }

    pub(crate) fn not_a_descriptor(reason: impl fmt::Display) -> Self {
        DecodeError::InvalidArgument(format!(
            "image is not a recognized raster descriptor: {reason}"
        ))
    }

    /// Broad class of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            DecodeError::InvalidArgument(_) => ErrorKind::InvalidArgument,
            DecodeError::InvalidDimension { .. } => ErrorKind::InvalidDimension,
            DecodeError::UnsupportedChannelCount(_) => ErrorKind::UnsupportedChannelCount,
            DecodeError::Engine(EngineError::Load) => ErrorKind::EngineLoadFailure,
            DecodeError::Engine(EngineError::Internal(_))
            | DecodeError::EnginePanicked(_)
            | DecodeError::WorkerLost => ErrorKind::Internal,
        }
    }
}

/// Result alias for decode calls
pub type Result<T> = std::result::Result<T, DecodeError>;
