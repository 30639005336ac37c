// SPDX-License-Identifier: AGPL-3.0-only

//! Centralized validation tolerances with physical justification.
//!
//! Every tolerance threshold used by tests and the validation binary is
//! defined here with documentation of its origin and rationale. No ad-hoc
//! magic numbers at call sites.
//!
//! | Category | Basis | Example |
//! |----------|-------|---------|
//! | Machine precision | IEEE 754 f64 | 1e-10 for exact arithmetic |
//! | Numerical method | FFT rounding, interpolation | 1e-6 for FFT round trips |
//! | Statistical | Monte-Carlo sample counts | 3–4σ of the estimator |
//! | Geometric | Grid discretization | sub-pixel edge placement |

/// Tolerance for operations that should be exact in f64 arithmetic.
///
/// f64 has ~15.9 significant digits; 1e-10 allows several digits of
/// accumulated rounding in compositions of exact operations.
pub const EXACT_F64: f64 = 1e-10;

/// Tolerance for values reconstructed through a forward/inverse FFT pair.
///
/// rustfft is unnormalized; after explicit 1/N scaling the round trip
/// accumulates O(log N) rounding steps per axis. 1e-9 holds comfortably
/// for grids up to 1024×1024.
pub const FFT_ROUNDTRIP: f64 = 1e-9;

/// Guard against division by a vanishing normalizer (field maximum,
/// autocorrelation lag-0). Anything below this is treated as zero signal.
pub const DIVISION_GUARD: f64 = 1e-12;

/// Sub-pixel edge interpolation accuracy on an exactly linear profile.
///
/// Linear interpolation between two samples is exact up to f64 rounding;
/// the looser bound absorbs the subtraction cancellation near-threshold.
pub const EDGE_INTERP_ABS: f64 = 1e-9;

/// CD regression: printed two-line pattern at nx=512, pupil radius 60,
/// line width 6, spacing 30, nominal dose.
///
/// The mask is symmetric so line-center separation is exactly the drawn
/// spacing; the convolved separation may shift by discretization of the
/// 6-px lines on the half-pixel grid. 2 px covers that plus interpolation.
pub const CD_REGRESSION_ABS: f64 = 2.0;

/// Poisson sampler mean convergence, 10⁴ pixels × 2000 photons at I=0.5.
///
/// Standard error of the mean: sqrt(I/ppp/n) = sqrt(0.5/2000/10⁴) ≈ 1.6e-4.
/// 1e-3 is ~6σ.
pub const SHOT_NOISE_MEAN_ABS: f64 = 1e-3;

/// Poisson sampler variance convergence, relative to the I/ppp prediction.
///
/// Relative sampling error of a variance estimate over n=10⁴ draws is
/// ~sqrt(2/n) ≈ 1.4%; 10% is ~7σ.
pub const SHOT_NOISE_VAR_REL: f64 = 0.10;

/// LER/LWR recovery of injected Gaussian σ, averaged over positions.
///
/// Per-position std over 200 trials has ~5% relative error; averaging
/// across 64 positions tightens it well below the 10% bound used here.
pub const ROUGHNESS_RECOVERY_REL: f64 = 0.10;

/// Single-position LER/LWR recovery, without cross-row averaging.
///
/// One per-row std estimate over 200 trials keeps the full ~5% relative
/// sampling error of sqrt(1/(2n)); 25% is a 5σ bound.
pub const ROUGHNESS_POINTWISE_REL: f64 = 0.25;

/// Minimum aerial-image valley contrast for the resolved two-line fixture.
///
/// At pupil radius 60 on a 512 grid the Airy core is ≈5 px wide; lines
/// 30 px apart are fully resolved and the valley stays below half peak.
pub const TWO_LINE_VALLEY_MAX: f64 = 0.9;
