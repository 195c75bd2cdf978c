//! Luminance conversion for raw rasters.
//!
//! Y = 0.2126*R + 0.7152*G + 0.0722*B (BT.709), computed with 8-bit fixed
//! point weights. Alpha is ignored.

use rayon::prelude::*;

const COEF_R: u32 = 54;
const COEF_G: u32 = 183;
const COEF_B: u32 = 19;

/// Images below this size convert on the calling thread
const PARALLEL_MIN_PIXELS: usize = 1 << 16;

#[inline]
fn luma(r: u8, g: u8, b: u8) -> u8 {
    ((COEF_R * r as u32 + COEF_G * g as u32 + COEF_B * b as u32) >> 8).min(255) as u8
}

fn convert_row(src: &[u8], dst: &mut [u8], channels: usize) {
    for (out, px) in dst.iter_mut().zip(src.chunks_exact(channels)) {
        *out = luma(px[0], px[1], px[2]);
    }
}

/// Convert interleaved pixels with `channels` bytes per pixel (1, 3 or 4) to
/// one luminance byte per pixel
pub fn to_luma(pixels: &[u8], width: usize, height: usize, channels: usize) -> Vec<u8> {
    let pixel_count = width * height;
    if pixel_count == 0 {
        return Vec::new();
    }
    if channels == 1 {
        return pixels[..pixel_count].to_vec();
    }

    let mut gray = vec![0u8; pixel_count];
    let stride = width * channels;
    if pixel_count >= PARALLEL_MIN_PIXELS {
        gray.par_chunks_mut(width)
            .zip(pixels.par_chunks(stride))
            .for_each(|(dst, src)| convert_row(src, dst, channels));
    } else {
        for (dst, src) in gray.chunks_mut(width).zip(pixels.chunks(stride)) {
            convert_row(src, dst, channels);
        }
    }
    gray
}
