//! Image helpers for the built-in engine:
//! - Luminance conversion of raw rasters
//! - Binarization (Otsu and local-mean adaptive)
//! - Perspective transforms

/// Global and adaptive thresholding
pub mod binarization;
/// Perspective transforms
pub mod geometry;
/// Luminance conversion
pub mod grayscale;
