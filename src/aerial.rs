// SPDX-License-Identifier: AGPL-3.0-only

//! Aerial image formation: mask ⊗ PSF with an explicit normalization policy.
//!
//! Two policies coexist in the process-window studies and are deliberately
//! NOT unified:
//!
//! - `PeakNormalized` divides by the post-dose maximum, so dose only shapes
//!   contrast relative to the print threshold (contrast-curve and roughness
//!   studies).
//! - `DoseScaled` keeps the raw convolution scale times dose, so dose moves
//!   the absolute threshold crossing (dose-to-failure sensitivity studies).
//!
//! Mixing the two inside one sweep changes every downstream metric, which
//! is why the policy is a required argument rather than a default.

use serde::Serialize;

use crate::error::LithoError;
use crate::fourier::fftconvolve_same;
use crate::optics::Psf;
use crate::tolerances::DIVISION_GUARD;

/// How the post-dose aerial intensity is scaled.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum NormalizationPolicy {
    /// Divide by the field maximum after the dose multiply; dose affects
    /// contrast shape only.
    PeakNormalized,
    /// No renormalization; dose is a true multiplicative exposure scale.
    DoseScaled,
}

/// Form the aerial intensity field from a `{0,1}` mask and a centered PSF.
///
/// Convolution is linear "same" via zero-padded FFT. Under `PeakNormalized`
/// an all-zero result (all-opaque mask) is rejected as degenerate input
/// instead of dividing by zero.
pub fn form_aerial_image(
    mask: &[f64],
    psf: &Psf,
    dose: f64,
    policy: NormalizationPolicy,
) -> Result<Vec<f64>, LithoError> {
    let nx = psf.nx;
    debug_assert_eq!(mask.len(), nx * nx);
    let mut aerial = fftconvolve_same(mask, &psf.field, nx);

    // FFT rounding can leave tiny negative excursions in an exactly
    // non-negative convolution; clamp them so Poisson means stay valid.
    for v in &mut aerial {
        *v = v.max(0.0) * dose;
    }

    match policy {
        NormalizationPolicy::PeakNormalized => {
            let max = aerial.iter().copied().fold(f64::MIN, f64::max);
            if max <= DIVISION_GUARD {
                return Err(LithoError::DegenerateField(
                    "aerial image is identically zero; cannot peak-normalize".into(),
                ));
            }
            for v in &mut aerial {
                *v /= max;
            }
        }
        NormalizationPolicy::DoseScaled => {}
    }
    Ok(aerial)
}
