//! The decoding engine seam and the built-in QR engine.
//!
//! The dispatch layer only ever talks to [`DecodingEngine`]; [`QrEngine`] is
//! the implementation used unless a caller supplies another one.

use tracing::debug;

use crate::config::EngineConfig;
use crate::decoder::GridDecode;
use crate::dispatch::RawRaster;
use crate::error::EngineError;
use crate::pipeline;
use crate::utils::grayscale::to_luma;

/// Raw metadata of one decoded symbol, as an engine reports it.
///
/// Values are numeric codes; the dispatch layer maps them onto the public
/// vocabularies and turns anything unknown into a failed entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolData {
    /// Version number, 1-40
    pub version: u32,
    /// ECC level as the 2-bit format indicator (0=M, 1=L, 2=H, 3=Q)
    pub ecc_level: u32,
    /// Mask pattern, 0-7
    pub mask: u32,
    /// Highest data mode indicator (1, 2, 4 or 8)
    pub mode: u32,
    /// Payload bytes
    pub payload: Vec<u8>,
    /// ECI assignment number, if the symbol declared one
    pub eci: Option<u32>,
}

impl From<GridDecode> for SymbolData {
    fn from(decoded: GridDecode) -> Self {
        Self {
            version: decoded.version as u32,
            ecc_level: decoded.ecc_level.format_bits(),
            mask: decoded.mask as u32,
            mode: decoded.payload.mode,
            payload: decoded.payload.bytes,
            eci: decoded.payload.eci,
        }
    }
}

/// One located symbol
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineSymbol {
    /// Decoded cleanly
    Decoded(SymbolData),
    /// Located but not decodable, with the engine's reason
    Failed(String),
}

/// Finds and decodes every QR symbol in an image.
///
/// Implementations run on worker threads and may be shared between
/// concurrent decodes. An empty vector means no symbol was located.
pub trait DecodingEngine: Send + Sync + 'static {
    /// Decode an encoded image file (PNG, JPEG, ...)
    fn decode_encoded(&self, bytes: &[u8]) -> Result<Vec<EngineSymbol>, EngineError>;

    /// Decode a validated raw raster
    fn decode_raw(&self, raster: &RawRaster) -> Result<Vec<EngineSymbol>, EngineError>;
}

/// The built-in engine: finder-pattern detection with Reed-Solomon decoding
#[derive(Debug, Clone, Default)]
pub struct QrEngine {
    config: EngineConfig,
}

impl QrEngine {
    /// Engine with the default configuration (environment overrides applied)
    pub fn new() -> Self {
        Self::default()
    }

    /// Engine with explicit tunables
    pub fn with_config(config: EngineConfig) -> Self {
        Self { config }
    }

    /// Active configuration
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }
}

impl DecodingEngine for QrEngine {
    fn decode_encoded(&self, bytes: &[u8]) -> Result<Vec<EngineSymbol>, EngineError> {
        if bytes.is_empty() {
            return Err(EngineError::Load);
        }
        let image = image::load_from_memory(bytes).map_err(|err| {
            debug!(%err, len = bytes.len(), "image load failed");
            EngineError::Load
        })?;
        let gray = image.to_luma8();
        let (width, height) = gray.dimensions();
        Ok(pipeline::scan_luma(
            gray.as_raw(),
            width as usize,
            height as usize,
            &self.config,
        ))
    }

    fn decode_raw(&self, raster: &RawRaster) -> Result<Vec<EngineSymbol>, EngineError> {
        let (width, height) = (raster.width() as usize, raster.height() as usize);
        let gray = to_luma(raster.pixels(), width, height, raster.channels().count());
        Ok(pipeline::scan_luma(&gray, width, height, &self.config))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decoder::payload::Payload;
    use crate::models::EccLevel;

    #[test]
    fn test_symbol_data_from_grid() {
        let data = SymbolData::from(GridDecode {
            version: 3,
            ecc_level: EccLevel::Q,
            mask: 5,
            payload: Payload {
                mode: 2,
                eci: None,
                bytes: b"AB12".to_vec(),
            },
        });
        assert_eq!(
            data,
            SymbolData {
                version: 3,
                ecc_level: 3,
                mask: 5,
                mode: 2,
                payload: b"AB12".to_vec(),
                eci: None,
            }
        );
    }

    #[test]
    fn test_load_failures() {
        let engine = QrEngine::new();
        assert_eq!(engine.decode_encoded(&[]), Err(EngineError::Load));
        assert_eq!(engine.decode_encoded(b"Hello World"), Err(EngineError::Load));
    }
}
