//! qrsnap - asynchronous QR code decoding
//!
//! Decode every QR symbol in an encoded image file (PNG, JPEG, ...) or in a
//! raw greyscale/RGB/RGBA raster. Each call validates its argument up front,
//! runs the decoding engine on a worker pool and settles exactly once, either
//! through a callback or through an awaitable [`PendingDecode`].
//!
//! ```no_run
//! let png = std::fs::read("code.png")?;
//! for code in qrsnap::decode_blocking(png)?.decoded() {
//!     println!("v{} {}: {}", code.version, code.ecc_level, code.text());
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![warn(missing_docs)]
#![allow(clippy::missing_docs_in_private_items)]

use std::sync::OnceLock;

/// Engine tunables and environment overrides
pub mod config;
/// QR symbol decoding (format, Reed-Solomon, segments)
pub mod decoder;
/// QR symbol location (finder patterns and grouping)
pub mod detector;
/// Argument classification, validation and asynchronous completion
pub mod dispatch;
/// The decoding engine seam and built-in engine
pub mod engine;
/// Error types
pub mod error;
/// Core data structures (results, vocabularies, BitMatrix, Point)
pub mod models;
/// Image-level scan driving detection and decoding
pub mod pipeline;
/// Utility functions (grayscale, binarization, geometry)
pub mod utils;

pub use config::EngineConfig;
pub use dispatch::{Decoder, ImageArg, Outcome, PendingDecode, RasterImage};
pub use engine::{DecodingEngine, EngineSymbol, QrEngine, SymbolData};
pub use error::{DecodeError, Dimension, EngineError, ErrorKind, Result};
pub use models::{CodeEntry, DecodeResult, DecodedCode, EccLevel, Eci, FailedCode, Mode};

fn default_decoder() -> &'static Decoder {
    static DECODER: OnceLock<Decoder> = OnceLock::new();
    DECODER.get_or_init(Decoder::new)
}

/// Decode with the built-in engine, returning an awaitable handle.
///
/// See [`Decoder::decode`].
pub fn decode(image: impl Into<ImageArg>) -> Result<PendingDecode> {
    default_decoder().decode(image)
}

/// Decode with the built-in engine, delivering the outcome to `handler`.
///
/// See [`Decoder::decode_with`].
pub fn decode_with<F>(image: impl Into<ImageArg>, handler: F) -> Result<()>
where
    F: FnOnce(Outcome) + Send + 'static,
{
    default_decoder().decode_with(image, handler)
}

/// Decode with the built-in engine and block for the result
pub fn decode_blocking(image: impl Into<ImageArg>) -> Result<DecodeResult> {
    default_decoder().decode_blocking(image)
}
