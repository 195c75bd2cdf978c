//! Classification of the loosely typed image argument
use std::collections::BTreeMap;

use super::raster::RasterCandidate;
use crate::error::{DecodeError, Result};

/// An image argument as a dynamically typed caller would pass it
#[derive(Debug, Clone, PartialEq)]
pub enum ImageArg {
    /// No value
    Null,
    /// A boolean
    Bool(bool),
    /// A number
    Number(f64),
    /// A string
    Text(String),
    /// A contiguous byte buffer, taken to be an encoded image file
    Bytes(Vec<u8>),
    /// A keyed object; a raster descriptor has `pixels`, `width` and `height`
    Object(BTreeMap<String, ImageArg>),
}

impl ImageArg {
    /// Name of the value's kind, for error messages
    pub fn kind(&self) -> &'static str {
        match self {
            ImageArg::Null => "null",
            ImageArg::Bool(_) => "boolean",
            ImageArg::Number(_) => "number",
            ImageArg::Text(_) => "string",
            ImageArg::Bytes(_) => "buffer",
            ImageArg::Object(_) => "object",
        }
    }
}

impl From<Vec<u8>> for ImageArg {
    fn from(bytes: Vec<u8>) -> Self {
        ImageArg::Bytes(bytes)
    }
}

impl From<&[u8]> for ImageArg {
    fn from(bytes: &[u8]) -> Self {
        ImageArg::Bytes(bytes.to_vec())
    }
}

impl<const N: usize> From<&[u8; N]> for ImageArg {
    fn from(bytes: &[u8; N]) -> Self {
        ImageArg::Bytes(bytes.to_vec())
    }
}

/// Typed raster descriptor for Rust callers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterImage {
    /// Interleaved greyscale, RGB or RGBA bytes, row-major
    pub pixels: Vec<u8>,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

impl RasterImage {
    /// Describe a raster
    pub fn new(pixels: Vec<u8>, width: u32, height: u32) -> Self {
        Self {
            pixels,
            width,
            height,
        }
    }
}

impl From<RasterImage> for ImageArg {
    fn from(raster: RasterImage) -> Self {
        let mut fields = BTreeMap::new();
        fields.insert("pixels".to_string(), ImageArg::Bytes(raster.pixels));
        fields.insert("width".to_string(), ImageArg::Number(raster.width as f64));
        fields.insert("height".to_string(), ImageArg::Number(raster.height as f64));
        ImageArg::Object(fields)
    }
}

/// The two supported image shapes
#[derive(Debug, Clone, PartialEq)]
pub enum ImageInput {
    /// Encoded image file bytes (PNG, JPEG, ...)
    Encoded(Vec<u8>),
    /// Raw pixels with explicit geometry, not yet validated
    Raw(RasterCandidate),
}

fn take_field(fields: &mut BTreeMap<String, ImageArg>, name: &str) -> Result<ImageArg> {
    fields
        .remove(name)
        .ok_or_else(|| DecodeError::not_a_descriptor(format_args!("missing field `{name}`")))
}

fn number_field(fields: &mut BTreeMap<String, ImageArg>, name: &str) -> Result<f64> {
    match take_field(fields, name)? {
        ImageArg::Number(value) => Ok(value),
        other => Err(DecodeError::not_a_descriptor(format_args!(
            "field `{name}` must be a number, got {}",
            other.kind()
        ))),
    }
}

/// Decide which shape the argument has. Pure; performs no validation of
/// raster geometry.
pub fn classify(image: ImageArg) -> Result<ImageInput> {
    match image {
        ImageArg::Bytes(bytes) => Ok(ImageInput::Encoded(bytes)),
        ImageArg::Object(mut fields) => {
            let pixels = match take_field(&mut fields, "pixels")? {
                ImageArg::Bytes(pixels) => pixels,
                other => {
                    return Err(DecodeError::not_a_descriptor(format_args!(
                        "field `pixels` must be a buffer, got {}",
                        other.kind()
                    )));
                }
            };
            let width = number_field(&mut fields, "width")?;
            let height = number_field(&mut fields, "height")?;
            Ok(ImageInput::Raw(RasterCandidate {
                pixels,
                width,
                height,
            }))
        }
        other => Err(DecodeError::not_a_buffer(other.kind())),
    }
}
