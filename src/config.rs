//! Tunables for the built-in engine.
//!
//! Environment overrides are read once per process; [`EngineConfig`] can also
//! be built directly and handed to [`crate::QrEngine::with_config`].

use std::sync::OnceLock;

fn parse_env_usize(name: &str, default: usize) -> usize {
    std::env::var(name)
        .ok()
        .and_then(|v| v.trim().parse::<usize>().ok())
        .unwrap_or(default)
}

fn parse_env_bool_u8(name: &str, default: bool) -> bool {
    std::env::var(name)
        .ok()
        .and_then(|v| v.trim().parse::<u8>().ok())
        .map(|v| v != 0)
        .unwrap_or(default)
}

static MAX_CANDIDATE_GROUPS: OnceLock<usize> = OnceLock::new();

pub(crate) fn max_candidate_groups() -> usize {
    *MAX_CANDIDATE_GROUPS
        .get_or_init(|| parse_env_usize("QR_MAX_CANDIDATE_GROUPS", 40).clamp(1, 512))
}

static MIRROR_RETRY: OnceLock<bool> = OnceLock::new();

pub(crate) fn mirror_retry() -> bool {
    *MIRROR_RETRY.get_or_init(|| parse_env_bool_u8("QR_MIRROR_RETRY", true))
}

static ADAPTIVE_MIN_SIDE: OnceLock<usize> = OnceLock::new();

pub(crate) fn adaptive_min_side() -> usize {
    *ADAPTIVE_MIN_SIDE.get_or_init(|| parse_env_usize("QR_ADAPTIVE_MIN_SIDE", 800))
}

static ADAPTIVE_WINDOW: OnceLock<usize> = OnceLock::new();

pub(crate) fn adaptive_window() -> usize {
    // Odd so the window has a centre pixel.
    *ADAPTIVE_WINDOW.get_or_init(|| parse_env_usize("QR_ADAPTIVE_WINDOW", 31).clamp(3, 255) | 1)
}

/// Knobs for [`crate::QrEngine`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Finder-pattern triples kept for decoding, best score first
    pub max_candidate_groups: usize,
    /// Retry a symbol on its transposed grid after a format or ECC failure
    pub mirror_retry: bool,
    /// Longer image side from which adaptive thresholding is tried first
    pub adaptive_min_side: usize,
    /// Side of the square window used by adaptive thresholding (odd)
    pub adaptive_window: usize,
}

impl Default for EngineConfig {
    /// Defaults, with `QR_*` environment overrides applied
    fn default() -> Self {
        Self {
            max_candidate_groups: max_candidate_groups(),
            mirror_retry: mirror_retry(),
            adaptive_min_side: adaptive_min_side(),
            adaptive_window: adaptive_window(),
        }
    }
}
