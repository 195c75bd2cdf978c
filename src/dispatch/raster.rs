//! Geometry validation of caller-supplied rasters
use crate::error::{DecodeError, Dimension, Result};

/// Bytes per pixel of a raw raster
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channels {
    /// Greyscale
    Gray,
    /// Red, green, blue
    Rgb,
    /// Red, green, blue, alpha (alpha is ignored)
    Rgba,
}

impl Channels {
    /// Bytes per pixel
    pub fn count(self) -> usize {
        match self {
            Channels::Gray => 1,
            Channels::Rgb => 3,
            Channels::Rgba => 4,
        }
    }
}

/// An unvalidated raster as the caller described it
#[derive(Debug, Clone, PartialEq)]
pub struct RasterCandidate {
    /// Interleaved pixel bytes, row-major
    pub pixels: Vec<u8>,
    /// Width as supplied
    pub width: f64,
    /// Height as supplied
    pub height: f64,
}

/// A raster whose width, height and buffer length agree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRaster {
    pixels: Vec<u8>,
    width: u32,
    height: u32,
    channels: Channels,
}

impl RawRaster {
    /// Interleaved pixel bytes, `width * height * channels` long
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Width in pixels
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Channel layout derived from the buffer length
    pub fn channels(&self) -> Channels {
        self.channels
    }
}

fn check_dimension(dimension: Dimension, value: f64) -> Result<u32> {
    let valid = value.is_finite() && value.fract() == 0.0 && value >= 1.0 && value <= u32::MAX as f64;
    if !valid {
        return Err(DecodeError::InvalidDimension { dimension, value });
    }
    Ok(value as u32)
}

/// Validate width, then height, then the channel count
/// `len(pixels) / (width * height)`, which must be exactly 1, 3 or 4
pub fn validate_raster(candidate: RasterCandidate) -> Result<RawRaster> {
    let width = check_dimension(Dimension::Width, candidate.width)?;
    let height = check_dimension(Dimension::Height, candidate.height)?;

    let area = width as u64 * height as u64;
    let len = candidate.pixels.len() as u64;
    let channels = match (len % area == 0).then_some(len / area) {
        Some(1) => Channels::Gray,
        Some(3) => Channels::Rgb,
        Some(4) => Channels::Rgba,
        _ => return Err(DecodeError::UnsupportedChannelCount(len as f64 / area as f64)),
    };

    Ok(RawRaster {
        pixels: candidate.pixels,
        width,
        height,
        channels,
    })
}
