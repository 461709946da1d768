//! Separable Gaussian blur.

use crate::C;
use rayon::prelude::*;

/// Kernel radius in standard deviations.
const TRUNCATE: C = 4.0;

/// Returns a normalized Gaussian kernel of length `2r + 1` where
/// `r = round(4σ)`, at most `max_radius`.
pub(crate) fn kernel(sigma: C, max_radius: usize) -> Vec<C> {
    #[allow(clippy::cast_precision_loss)]
    let max_radius = max_radius as C;
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let radius = (TRUNCATE * sigma + 0.5).min(max_radius) as usize;
    #[allow(clippy::cast_precision_loss, clippy::cast_possible_wrap)]
    let weights: Vec<C> = (0..=2 * radius)
        .map(|i| {
            let x = i as C - radius as C;
            (-0.5 * x * x / (sigma * sigma)).exp()
        })
        .collect();
    let sum: C = weights.iter().sum();
    weights.into_iter().map(|w| w / sum).collect()
}

/// Maps an out of range index into `[0, len)` by mirroring about the
/// edges (`d c b a | a b c d | d c b a`).
fn reflect(idx: isize, len: usize) -> usize {
    #[allow(clippy::cast_possible_wrap)]
    let period = 2 * len as isize;
    let m = idx.rem_euclid(period);
    #[allow(clippy::cast_sign_loss)]
    let m = m as usize;
    if m < len {
        m
    } else {
        2 * len - 1 - m
    }
}

/// Convolves each row of `data` (row-major, `width` columns) with
/// `kernel`.
fn blur_rows(data: &mut [C], width: usize, kernel: &[C]) {
    let radius = kernel.len() / 2;
    data.par_chunks_mut(width).for_each(|row| {
        let src = row.to_vec();
        for (i, out) in row.iter_mut().enumerate() {
            *out = kernel
                .iter()
                .enumerate()
                .map(|(k, w)| {
                    #[allow(clippy::cast_possible_wrap)]
                    let j = i as isize + k as isize - radius as isize;
                    w * src[reflect(j, width)]
                })
                .sum();
        }
    });
}

fn transpose(data: &[C], width: usize, height: usize) -> Vec<C> {
    let mut out = vec![0.0; data.len()];
    for row in 0..height {
        for col in 0..width {
            out[col * height + row] = data[row * width + col];
        }
    }
    out
}

/// Blurs `data` (row-major, `width` × `height`) along both axes with
/// standard deviation `sigma`, in samples.
///
/// A `sigma` of zero leaves `data` untouched.
pub fn gaussian_blur(data: &mut Vec<C>, width: usize, height: usize, sigma: C) {
    if sigma <= 0.0 || data.is_empty() {
        return;
    }
    debug_assert_eq!(data.len(), width * height);
    // Reflection makes longer kernels periodic over the data.
    let kernel = kernel(sigma, width.max(height));

    // Along columns first, then rows.
    let mut columns = transpose(data, width, height);
    blur_rows(&mut columns, height, &kernel);
    *data = transpose(&columns, height, width);
    blur_rows(data, width, &kernel);
}

#[cfg(test)]
mod tests {
    use super::{gaussian_blur, kernel, reflect};
    use approx::assert_relative_eq;

    #[test]
    fn test_kernel() {
        let k = kernel(1.0, 100);
        assert_eq!(k.len(), 9);
        assert_relative_eq!(k.iter().sum::<f64>(), 1.0, epsilon = 1e-12);
        assert_relative_eq!(k[0], k[8]);
        assert_relative_eq!(k[4], 0.398_942_280_4, epsilon = 1e-4);
        assert_eq!(kernel(2.0, 100).len(), 17);
        assert_eq!(kernel(2.0, 3).len(), 7);
        let k = kernel(1e300, 5);
        assert_eq!(k.len(), 11);
        assert_relative_eq!(k.iter().sum::<f64>(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_reflect() {
        let mapped: Vec<usize> = (-4..8).map(|i| reflect(i, 4)).collect();
        assert_eq!(mapped, vec![3, 2, 1, 0, 0, 1, 2, 3, 3, 2, 1, 0]);
        // Radius larger than the data.
        assert_eq!(reflect(-9, 2), 0);
        assert_eq!(reflect(0, 1), 0);
        assert_eq!(reflect(5, 1), 0);
    }

    #[test]
    fn test_zero_sigma_is_identity() {
        let mut data = vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        gaussian_blur(&mut data, 3, 2, 0.0);
        assert_eq!(data, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
    }

    #[test]
    fn test_constant_is_preserved() {
        let mut data = vec![7.0; 5 * 4];
        gaussian_blur(&mut data, 5, 4, 1.5);
        for v in data {
            assert_relative_eq!(v, 7.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_huge_sigma_flattens() {
        let mut data = vec![0.0; 6 * 4];
        data[0] = 24.0;
        gaussian_blur(&mut data, 6, 4, 1e300);
        assert_relative_eq!(data.iter().sum::<f64>(), 24.0, epsilon = 1e-9);
        for v in data {
            assert!(v.is_finite() && v > 0.0);
        }
    }

    #[test]
    fn test_mass_is_preserved() {
        let (width, height) = (21, 15);
        let mut data = vec![0.0; width * height];
        data[7 * width + 10] = 1.0;
        gaussian_blur(&mut data, width, height, 1.0);
        assert_relative_eq!(data.iter().sum::<f64>(), 1.0, epsilon = 1e-12);
        // Symmetric around the impulse.
        assert_relative_eq!(data[7 * width + 9], data[7 * width + 11], epsilon = 1e-15);
        assert_relative_eq!(data[6 * width + 10], data[8 * width + 10], epsilon = 1e-15);
        assert!(data[7 * width + 10] > data[7 * width + 11]);
    }
}
