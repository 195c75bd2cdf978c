//! QR symbol location
//!
//! - Finder pattern detection (the three square markers)
//! - Grouping of finders into candidate symbols

/// Finder pattern detection using 1:1:3:1:1 ratio scanning
pub mod finder;
/// Finder triples arranged like a QR symbol's corners
pub mod grouping;
