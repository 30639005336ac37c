// SPDX-License-Identifier: AGPL-3.0-only

//! Shared FFT plumbing: 2-D transforms, quadrant shifts, and linear
//! convolution with "same" cropping.
//!
//! rustfft transforms are unnormalized; every caller that needs a physical
//! scale either normalizes by a field maximum afterwards (PSF, aerial image)
//! or works with squared magnitudes where the constant cancels (PSD).
//! Fields are row-major flat slices of length `nx·nx`.

use rustfft::num_complex::Complex;
use rustfft::{FftDirection, FftPlanner};

/// In-place 2-D FFT over a row-major `nx×nx` complex buffer.
///
/// Row pass uses rustfft's chunked processing over the whole buffer;
/// the column pass goes through a scratch column.
pub fn fft2_inplace(data: &mut [Complex<f64>], nx: usize, direction: FftDirection) {
    debug_assert_eq!(data.len(), nx * nx);
    let mut planner = FftPlanner::new();
    let fft = planner.plan_fft(nx, direction);

    // Rows are contiguous: one chunked pass over the full buffer.
    fft.process(data);

    let mut col = vec![Complex::new(0.0, 0.0); nx];
    for x in 0..nx {
        for y in 0..nx {
            col[y] = data[y * nx + x];
        }
        fft.process(&mut col);
        for y in 0..nx {
            data[y * nx + x] = col[y];
        }
    }
}

/// Inverse quadrant shift: move the centered origin (index `nx/2`) to
/// index 0 on both axes, matching `numpy.fft.ifftshift` for any parity.
#[must_use]
pub fn ifftshift2(field: &[f64], nx: usize) -> Vec<f64> {
    let half = nx / 2;
    let mut out = vec![0.0; nx * nx];
    for y in 0..nx {
        let sy = (y + half) % nx;
        for x in 0..nx {
            let sx = (x + half) % nx;
            out[y * nx + x] = field[sy * nx + sx];
        }
    }
    out
}

/// Forward quadrant shift: move the FFT origin (index 0) to the grid
/// center `nx/2`, matching `numpy.fft.fftshift` for any parity.
#[must_use]
pub fn fftshift2(field: &[f64], nx: usize) -> Vec<f64> {
    let shift = nx - nx / 2;
    let mut out = vec![0.0; nx * nx];
    for y in 0..nx {
        let sy = (y + shift) % nx;
        for x in 0..nx {
            let sx = (x + shift) % nx;
            out[y * nx + x] = field[sy * nx + sx];
        }
    }
    out
}

/// Size-preserving linear convolution of two `nx×nx` real fields.
///
/// Both inputs are zero-padded to a power of two ≥ `2·nx−1` so the circular
/// FFT product equals the linear convolution, then an `nx×nx` window of the
/// full result is cropped. The crop offset is `nx/2`, so a kernel centered
/// at grid index `nx/2` (this crate's PSF convention) acts as an exact
/// identity for a centered delta — features stay at their mask coordinates
/// on even and odd grids alike.
#[must_use]
pub fn fftconvolve_same(a: &[f64], b: &[f64], nx: usize) -> Vec<f64> {
    debug_assert_eq!(a.len(), nx * nx);
    debug_assert_eq!(b.len(), nx * nx);
    let padded = (2 * nx - 1).next_power_of_two();

    let embed = |field: &[f64]| -> Vec<Complex<f64>> {
        let mut buf = vec![Complex::new(0.0, 0.0); padded * padded];
        for y in 0..nx {
            for x in 0..nx {
                buf[y * padded + x] = Complex::new(field[y * nx + x], 0.0);
            }
        }
        buf
    };

    let mut fa = embed(a);
    let mut fb = embed(b);
    fft2_inplace(&mut fa, padded, FftDirection::Forward);
    fft2_inplace(&mut fb, padded, FftDirection::Forward);
    for (va, vb) in fa.iter_mut().zip(fb.iter()) {
        *va *= *vb;
    }
    fft2_inplace(&mut fa, padded, FftDirection::Inverse);

    // Unnormalized forward+inverse scales by padded²; undo it during the crop.
    let scale = 1.0 / (padded as f64 * padded as f64);
    let offset = nx / 2;
    let mut out = vec![0.0; nx * nx];
    for y in 0..nx {
        for x in 0..nx {
            out[y * nx + x] = fa[(y + offset) * padded + (x + offset)].re * scale;
        }
    }
    out
}

/// Forward 1-D FFT of a real signal, returning the complex spectrum.
///
/// Used by the roughness PSD; unnormalized, consistent with the
/// `|FFT|²` convention of the power spectrum it feeds.
#[must_use]
pub fn fft1_real(signal: &[f64]) -> Vec<Complex<f64>> {
    let mut data: Vec<Complex<f64>> = signal.iter().map(|&v| Complex::new(v, 0.0)).collect();
    let mut planner = FftPlanner::new();
    planner.plan_fft_forward(signal.len()).process(&mut data);
    data
}
