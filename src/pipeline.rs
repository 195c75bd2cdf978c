//! Image-level scan: binarize, locate finder patterns, group them into
//! candidate symbols and decode each symbol once.

use tracing::debug;

use crate::config::EngineConfig;
use crate::decoder::{SymbolError, decode_symbol};
use crate::detector::finder::{FinderDetector, FinderPattern};
use crate::detector::grouping::{FinderGroup, group_patterns};
use crate::engine::EngineSymbol;
use crate::models::BitMatrix;
use crate::utils::binarization::{adaptive_binarize, otsu_binarize};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Binarizer {
    Otsu,
    Adaptive,
}

/// Large images tend to have uneven lighting, so local thresholding goes
/// first there; global Otsu is cheaper and wins on small, clean inputs.
fn binarizer_order(width: usize, height: usize, config: &EngineConfig) -> [Binarizer; 2] {
    if width.max(height) >= config.adaptive_min_side {
        [Binarizer::Adaptive, Binarizer::Otsu]
    } else {
        [Binarizer::Otsu, Binarizer::Adaptive]
    }
}

/// Every symbol in a luminance image, ordered by where its first finder
/// pattern was seen (top to bottom, left to right)
pub fn scan_luma(gray: &[u8], width: usize, height: usize, config: &EngineConfig) -> Vec<EngineSymbol> {
    if width == 0 || height == 0 || gray.len() < width * height {
        return Vec::new();
    }

    for binarizer in binarizer_order(width, height, config) {
        let binary = match binarizer {
            Binarizer::Otsu => otsu_binarize(gray, width, height),
            Binarizer::Adaptive => adaptive_binarize(gray, width, height, config.adaptive_window),
        };
        let symbols = scan_binary(&binary, config);
        debug!(?binarizer, width, height, symbols = symbols.len(), "scan finished");
        if !symbols.is_empty() {
            return symbols;
        }
    }
    Vec::new()
}

fn decode_group(
    binary: &BitMatrix,
    patterns: &[FinderPattern],
    group: &FinderGroup,
    config: &EngineConfig,
) -> Result<EngineSymbol, SymbolError> {
    decode_symbol(
        binary,
        patterns[group.top_left].center,
        patterns[group.top_right].center,
        patterns[group.bottom_left].center,
        group.version_estimate,
        config.mirror_retry,
    )
    .map(|decoded| EngineSymbol::Decoded(decoded.into()))
}

/// Symbols in one binarized image.
///
/// Each finder pattern belongs to at most one reported symbol. Successful
/// groups claim their finders first; a failed group is reported only when
/// none of its finders was claimed and none of them lies on a decoded
/// symbol. False triples spanning two real symbols, or built from finder-like
/// runs inside one symbol's data, do not show up as extra failures.
pub fn scan_binary(binary: &BitMatrix, config: &EngineConfig) -> Vec<EngineSymbol> {
    let patterns = FinderDetector::detect(binary);
    if patterns.len() < 3 {
        return Vec::new();
    }
    let groups = group_patterns(&patterns, config.max_candidate_groups);

    let mut claimed = vec![false; patterns.len()];
    let mut found: Vec<(usize, EngineSymbol)> = Vec::new();
    let mut decoded: Vec<&FinderGroup> = Vec::new();
    let mut failures: Vec<(&FinderGroup, SymbolError)> = Vec::new();

    for group in &groups {
        if group.members().iter().any(|&i| claimed[i]) {
            continue;
        }
        match decode_group(binary, &patterns, group, config) {
            Ok(symbol) => {
                for i in group.members() {
                    claimed[i] = true;
                }
                decoded.push(group);
                found.push((group.first_seen(), symbol));
            }
            Err(err) => failures.push((group, err)),
        }
    }

    for (group, err) in failures {
        let overlaps = group.members().iter().any(|&i| {
            claimed[i]
                || decoded
                    .iter()
                    .any(|symbol| symbol.covers(&patterns, &patterns[i].center))
        });
        if overlaps {
            continue;
        }
        for i in group.members() {
            claimed[i] = true;
        }
        found.push((group.first_seen(), EngineSymbol::Failed(err.to_string())));
    }

    debug!(
        patterns = patterns.len(),
        groups = groups.len(),
        symbols = found.len(),
        "finder groups decoded"
    );

    found.sort_by_key(|(seen, _)| *seen);
    found.into_iter().map(|(_, symbol)| symbol).collect()
}
