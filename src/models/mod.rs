/// Version bounds and the closed ECC level, mode and ECI enums
pub mod constants;
/// Packed binary module grid
pub mod matrix;
/// Image-space points
pub mod point;
/// Decoded and failed entries of a decode result
pub mod qr_code;

pub use constants::{EccLevel, Eci, Mode, VERSION_MAX, VERSION_MIN};
pub use matrix::BitMatrix;
pub use point::Point;
pub use qr_code::{CodeEntry, DecodeResult, DecodedCode, FailedCode};
