// SPDX-License-Identifier: AGPL-3.0-only

//! Optical projector: circular pupil → intensity point-spread function.
//!
//! Scalar, incoherent, circular-pupil approximation. The pupil is a binary
//! low-pass indicator in the frequency domain; the coherent point-spread
//! amplitude is its (origin-shifted) inverse 2-D Fourier transform and the
//! intensity PSF is the squared magnitude, peak-normalized to 1.0.
//!
//! Defocus is modeled as an isotropic Gaussian blur of the in-focus PSF
//! followed by re-normalization. This is a coarse physical proxy for
//! defocus aberration, not an aberrated-pupil phase model; it matches the
//! focus axis of the process-window studies this crate supports.
//!
//! The PSF is a pure function of its spec. Sweeps that vary only dose reuse
//! one PSF across every cell (the optical system is dose-invariant).

use rustfft::num_complex::Complex;
use rustfft::FftDirection;
use serde::Serialize;

use crate::error::LithoError;
use crate::fourier::{fft2_inplace, fftshift2, ifftshift2};
use crate::tolerances::DIVISION_GUARD;

/// Optical configuration: grid size, pupil cutoff, defocus proxy.
#[derive(Clone, Debug, Serialize)]
pub struct PupilSpec {
    /// Grid size in pixels per side (square grid).
    pub nx: usize,
    /// Pupil cutoff radius in frequency-grid pixels.
    pub radius: f64,
    /// Defocus blur sigma in pixels; 0 = in focus.
    pub defocus_sigma: f64,
}

impl PupilSpec {
    /// Validate and construct a pupil specification.
    ///
    /// Fails fast on `radius ≥ nx/2` (the indicator would wrap past the
    /// Nyquist edge), non-positive radius, or a non-finite/negative sigma.
    pub fn new(nx: usize, radius: f64, defocus_sigma: f64) -> Result<Self, LithoError> {
        if nx == 0 {
            return Err(LithoError::InvalidPupil("grid size must be nonzero".into()));
        }
        if !radius.is_finite() || radius <= 0.0 {
            return Err(LithoError::InvalidPupil(format!(
                "radius must be positive and finite, got {radius}"
            )));
        }
        if radius >= nx as f64 / 2.0 {
            return Err(LithoError::InvalidPupil(format!(
                "radius {radius} >= nx/2 = {}",
                nx as f64 / 2.0
            )));
        }
        if !defocus_sigma.is_finite() || defocus_sigma < 0.0 {
            return Err(LithoError::InvalidPupil(format!(
                "defocus sigma must be finite and >= 0, got {defocus_sigma}"
            )));
        }
        Ok(Self {
            nx,
            radius,
            defocus_sigma,
        })
    }

    /// Same optics at a different defocus, for focus-axis sweeps.
    pub fn with_defocus(&self, defocus_sigma: f64) -> Result<Self, LithoError> {
        Self::new(self.nx, self.radius, defocus_sigma)
    }
}

/// Peak-normalized intensity point-spread function.
#[derive(Clone, Debug)]
pub struct Psf {
    /// Row-major `nx×nx` intensity field, max exactly 1.0.
    pub field: Vec<f64>,
    /// Grid size in pixels per side.
    pub nx: usize,
}

/// Centered circular indicator: 1 inside `x²+y² ≤ r²`, else 0, on the
/// `-nx/2..nx/2` coordinate grid.
#[must_use]
pub fn circular_pupil(nx: usize, radius: f64) -> Vec<f64> {
    let half = nx as i64 / 2;
    let r2 = radius * radius;
    let mut pupil = vec![0.0; nx * nx];
    for y in 0..nx {
        let dy = (y as i64 - half) as f64;
        for x in 0..nx {
            let dx = (x as i64 - half) as f64;
            if dx * dx + dy * dy <= r2 {
                pupil[y * nx + x] = 1.0;
            }
        }
    }
    pupil
}

/// Build the intensity PSF for a pupil specification.
///
/// Pipeline: indicator pupil → origin shift → inverse 2-D FFT → |field|² →
/// center shift → peak normalize → optional Gaussian defocus blur →
/// re-normalize. An all-zero pupil is a configuration error, never a
/// silent divide.
///
/// The raw inverse transform leaves the intensity peak at the FFT origin
/// (grid corner); used directly as a convolution kernel that displaces the
/// aerial image by half the grid, so the PSF is re-centered at `nx/2`
/// before it leaves this module. Feature coordinates in the mask then map
/// one-to-one onto the aerial image.
pub fn build_psf(spec: &PupilSpec) -> Result<Psf, LithoError> {
    let nx = spec.nx;
    let pupil = circular_pupil(nx, spec.radius);
    if pupil.iter().all(|&v| v == 0.0) {
        return Err(LithoError::EmptyPupil);
    }

    let shifted = ifftshift2(&pupil, nx);
    let mut data: Vec<Complex<f64>> = shifted.iter().map(|&v| Complex::new(v, 0.0)).collect();
    fft2_inplace(&mut data, nx, FftDirection::Inverse);

    // Squared magnitude; the unnormalized FFT scale cancels in the
    // peak normalization below.
    let intensity: Vec<f64> = data
        .iter()
        .map(rustfft::num_complex::Complex::norm_sqr)
        .collect();
    let mut psf = fftshift2(&intensity, nx);
    normalize_peak(&mut psf)?;

    if spec.defocus_sigma > 0.0 {
        psf = gaussian_blur(&psf, nx, spec.defocus_sigma);
        normalize_peak(&mut psf)?;
    }

    Ok(Psf { field: psf, nx })
}

/// Divide a field by its maximum so the peak is exactly 1.0.
fn normalize_peak(field: &mut [f64]) -> Result<(), LithoError> {
    let max = field.iter().copied().fold(f64::MIN, f64::max);
    if max <= DIVISION_GUARD {
        return Err(LithoError::DegenerateField(
            "cannot peak-normalize an all-zero field".into(),
        ));
    }
    for v in field.iter_mut() {
        *v /= max;
    }
    Ok(())
}

/// Separable isotropic Gaussian blur with reflected boundaries.
///
/// Kernel truncated at 4σ, matching the `scipy.ndimage.gaussian_filter`
/// convention the focus-axis studies were calibrated against.
#[must_use]
pub fn gaussian_blur(field: &[f64], nx: usize, sigma: f64) -> Vec<f64> {
    debug_assert_eq!(field.len(), nx * nx);
    if sigma <= 0.0 {
        return field.to_vec();
    }
    let radius = (4.0 * sigma).ceil() as i64;
    let mut kernel = Vec::with_capacity((2 * radius + 1) as usize);
    let denom = 2.0 * sigma * sigma;
    for i in -radius..=radius {
        kernel.push((-(i * i) as f64 / denom).exp());
    }
    let norm: f64 = kernel.iter().sum();
    for k in &mut kernel {
        *k /= norm;
    }

    // Reflect indexing: -1 → 0, nx → nx-1 (edge sample mirrored).
    let reflect = |i: i64| -> usize {
        let n = nx as i64;
        let mut i = i;
        while i < 0 || i >= n {
            if i < 0 {
                i = -i - 1;
            }
            if i >= n {
                i = 2 * n - 1 - i;
            }
        }
        i as usize
    };

    let mut rows = vec![0.0; nx * nx];
    for y in 0..nx {
        for x in 0..nx {
            let mut acc = 0.0;
            for (ki, &w) in kernel.iter().enumerate() {
                let xi = reflect(x as i64 + ki as i64 - radius);
                acc += w * field[y * nx + xi];
            }
            rows[y * nx + x] = acc;
        }
    }
    let mut out = vec![0.0; nx * nx];
    for y in 0..nx {
        for x in 0..nx {
            let mut acc = 0.0;
            for (ki, &w) in kernel.iter().enumerate() {
                let yi = reflect(y as i64 + ki as i64 - radius);
                acc += w * rows[yi * nx + x];
            }
            out[y * nx + x] = acc;
        }
    }
    out
}
