//! Symbol decoding after detection:
//! - Grid sampling through a perspective transform
//! - Format and version information (BCH)
//! - Unmasking, codeword extraction and block de-interleaving
//! - Reed-Solomon correction
//! - Segment parsing into payload bytes

use thiserror::Error;
use tracing::trace;

use crate::models::{BitMatrix, EccLevel, Point, VERSION_MAX, VERSION_MIN};

/// Format and version information
pub mod format;
/// Function patterns, masks and codeword placement
pub mod layout;
/// Segment parsing
pub mod payload;
/// Reed-Solomon error correction
pub mod reed_solomon;
/// Grid sampling and alignment refinement
pub mod sampling;
/// Block and capacity tables
pub mod tables;

use payload::Payload;
use tables::{BlockLayout, dimension};

/// Why a located symbol could not be decoded
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolError {
    /// Grid side is not 17 + 4v for a supported v
    #[error("Invalid grid size")]
    InvalidGridSize,
    /// Version information is unreadable or out of range
    #[error("Invalid version")]
    InvalidVersion,
    /// Neither format information copy is correctable
    #[error("Format data ECC failure")]
    FormatEcc,
    /// A data block has more errors than its ECC can repair
    #[error("ECC failure")]
    DataEcc,
    /// Payload longer than the decoder accepts
    #[error("Data overflow")]
    DataOverflow,
    /// A segment runs past the end of the data codewords
    #[error("Data underflow")]
    DataUnderflow,
}

impl SymbolError {
    /// How far decoding progressed before failing; deeper failures are more
    /// informative when several attempts fail
    fn depth(self) -> u8 {
        match self {
            SymbolError::InvalidGridSize => 0,
            SymbolError::InvalidVersion => 1,
            SymbolError::FormatEcc => 2,
            SymbolError::DataEcc => 3,
            SymbolError::DataOverflow | SymbolError::DataUnderflow => 4,
        }
    }
}

/// A fully decoded grid
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridDecode {
    /// Version 1-40
    pub version: u8,
    /// Error correction level from the format information
    pub ecc_level: EccLevel,
    /// Mask pattern 0-7
    pub mask: u8,
    /// Parsed payload
    pub payload: Payload,
}

/// Decode a sampled module grid (true = dark)
pub fn decode_grid(grid: &BitMatrix) -> Result<GridDecode, SymbolError> {
    let size = grid.width();
    if size < 21 || grid.height() != size || (size - 17) % 4 != 0 {
        return Err(SymbolError::InvalidGridSize);
    }
    let version = ((size - 17) / 4) as u8;
    if !(VERSION_MIN..=VERSION_MAX).contains(&version) {
        return Err(SymbolError::InvalidVersion);
    }

    let info = format::read_format(grid).ok_or(SymbolError::FormatEcc)?;
    let layout = BlockLayout::new(version, info.ecc_level).ok_or(SymbolError::InvalidVersion)?;

    let codewords = layout::read_codewords(grid, version, info.mask, layout.total_codewords);
    let mut data = Vec::with_capacity(layout.data_codewords());
    for mut block in layout::deinterleave(&codewords, &layout) {
        reed_solomon::correct(&mut block, layout.ecc_per_block).map_err(|_| SymbolError::DataEcc)?;
        data.extend_from_slice(&block[..block.len() - layout.ecc_per_block]);
    }

    let payload = payload::parse(&data, version)?;
    Ok(GridDecode {
        version,
        ecc_level: info.ecc_level,
        mask: info.mask,
        payload,
    })
}

/// [`decode_grid`], retrying once on the transposed grid after a format or
/// ECC failure when `mirror_retry` is set. The first error wins if both fail.
pub fn decode_grid_mirrored(grid: &BitMatrix, mirror_retry: bool) -> Result<GridDecode, SymbolError> {
    match decode_grid(grid) {
        Err(err @ (SymbolError::FormatEcc | SymbolError::DataEcc)) if mirror_retry => {
            decode_grid(&grid.transpose()).map_err(|_| err)
        }
        other => other,
    }
}

fn keep_deepest(worst: &mut Option<SymbolError>, err: SymbolError) {
    if worst.is_none_or(|w| err.depth() > w.depth()) {
        *worst = Some(err);
    }
}

/// Versions to try for an estimate: the estimate, then its neighbours
fn version_candidates(estimate: u8) -> impl Iterator<Item = u8> {
    [estimate as i32, estimate as i32 + 1, estimate as i32 - 1]
        .into_iter()
        .filter(|v| (VERSION_MIN as i32..=VERSION_MAX as i32).contains(v))
        .map(|v| v as u8)
}

/// Decode the symbol whose finder centres are `tl`, `tr` and `bl`
pub fn decode_symbol(
    binary: &BitMatrix,
    tl: Point,
    tr: Point,
    bl: Point,
    version_estimate: u8,
    mirror_retry: bool,
) -> Result<GridDecode, SymbolError> {
    let mut tried: Vec<u8> = Vec::with_capacity(4);
    let mut worst: Option<SymbolError> = None;

    let mut queue: Vec<u8> = version_candidates(version_estimate).collect();
    let mut next = 0;
    while next < queue.len() {
        let version = queue[next];
        next += 1;
        if tried.contains(&version) {
            continue;
        }
        tried.push(version);

        let Some(transform) = sampling::module_transform(binary, version, tl, tr, bl) else {
            keep_deepest(&mut worst, SymbolError::InvalidGridSize);
            continue;
        };
        let grid = sampling::sample_grid(binary, &transform, dimension(version));

        if version >= 7 {
            match format::read_version(&grid) {
                Some(read) if read != version => {
                    // Trust the BCH-protected version over the spacing estimate
                    trace!(estimated = version, read, "version information disagrees");
                    queue.insert(next, read);
                    continue;
                }
                Some(_) => {}
                None => {
                    keep_deepest(&mut worst, SymbolError::InvalidVersion);
                    continue;
                }
            }
        }

        match decode_grid_mirrored(&grid, mirror_retry) {
            Ok(decoded) => return Ok(decoded),
            Err(err) => {
                trace!(version, %err, "grid decode failed");
                keep_deepest(&mut worst, err);
            }
        }
    }

    Err(worst.unwrap_or(SymbolError::InvalidGridSize))
}
