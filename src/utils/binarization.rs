use crate::models::BitMatrix;

/// Adaptive pixels are dark when this many percent below the local mean
const ADAPTIVE_BIAS_PERCENT: u64 = 8;

/// Global binarization with Otsu's threshold.
/// Returns a BitMatrix where true = dark, false = light
pub fn otsu_binarize(gray: &[u8], width: usize, height: usize) -> BitMatrix {
    threshold_binarize(gray, width, height, otsu_threshold(gray))
}

/// Otsu's threshold: dark pixels are those strictly below the returned value
pub fn otsu_threshold(gray: &[u8]) -> u8 {
    let mut histogram = [0u64; 256];
    for &pixel in gray {
        histogram[pixel as usize] += 1;
    }

    let total = gray.len() as f64;
    let total_sum: f64 = histogram
        .iter()
        .enumerate()
        .map(|(i, &c)| i as f64 * c as f64)
        .sum();

    let mut best = 0.0;
    let mut threshold = 128u8;
    let mut dark_count = 0.0;
    let mut dark_sum = 0.0;

    // Candidate t splits the histogram into [0, t) and [t, 256)
    for t in 1..256usize {
        dark_count += histogram[t - 1] as f64;
        dark_sum += (t - 1) as f64 * histogram[t - 1] as f64;
        let light_count = total - dark_count;
        if dark_count == 0.0 || light_count == 0.0 {
            continue;
        }
        let dark_mean = dark_sum / dark_count;
        let light_mean = (total_sum - dark_sum) / light_count;
        let variance = dark_count * light_count * (dark_mean - light_mean).powi(2);
        if variance > best {
            best = variance;
            threshold = t as u8;
        }
    }

    threshold
}

/// Simple global threshold binarization
pub fn threshold_binarize(gray: &[u8], width: usize, height: usize, threshold: u8) -> BitMatrix {
    let mut binary = BitMatrix::new(width, height);
    if width == 0 {
        return binary;
    }
    for (y, row) in gray.chunks(width).take(height).enumerate() {
        for (x, &pixel) in row.iter().enumerate() {
            if pixel < threshold {
                binary.set(x, y, true);
            }
        }
    }
    binary
}

/// Local mean thresholding over a `window` x `window` box, using an integral
/// image. Copes with uneven lighting that defeats a single global threshold.
pub fn adaptive_binarize(gray: &[u8], width: usize, height: usize, window: usize) -> BitMatrix {
    let mut binary = BitMatrix::new(width, height);
    if width == 0 || height == 0 {
        return binary;
    }

    let stride = width + 1;
    let mut integral = vec![0u64; stride * (height + 1)];
    for y in 0..height {
        let mut row_sum = 0u64;
        for x in 0..width {
            row_sum += gray[y * width + x] as u64;
            integral[(y + 1) * stride + x + 1] = integral[y * stride + x + 1] + row_sum;
        }
    }

    let half = window / 2;
    for y in 0..height {
        let y0 = y.saturating_sub(half);
        let y1 = (y + half + 1).min(height);
        for x in 0..width {
            let x0 = x.saturating_sub(half);
            let x1 = (x + half + 1).min(width);
            let area = ((x1 - x0) * (y1 - y0)) as u64;
            let sum = integral[y1 * stride + x1] + integral[y0 * stride + x0]
                - integral[y0 * stride + x1]
                - integral[y1 * stride + x0];
            let pixel = gray[y * width + x] as u64;
            if pixel * area * 100 < sum * (100 - ADAPTIVE_BIAS_PERCENT) {
                binary.set(x, y, true);
            }
        }
    }

    binary
}
