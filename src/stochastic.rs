// SPDX-License-Identifier: AGPL-3.0-only

//! Photon shot-noise sampling for stochastic exposure trials.
//!
//! At low EUV doses the photon count per pixel is small enough that
//! Poisson arrival statistics dominate every other stochastic effect.
//! One realization draws, per pixel, a Poisson count with mean
//! `I·photons_per_pixel` and divides back by the budget to return to
//! intensity units: mean is preserved, variance is `I/photons_per_pixel`.
//!
//! The generator is owned by the caller and threaded in by reference.
//! Nothing here seeds or shares global RNG state — reproducibility is the
//! sweep engine's job, which derives one seed per (cell, trial) so parallel
//! execution replays exactly.

use rand::Rng;
use rand_distr::{Distribution, Poisson};

use crate::error::LithoError;

/// Draw one shot-noise realization of an aerial intensity field.
///
/// Pixels with non-positive mean intensity receive zero photons
/// deterministically (a Poisson with mean 0 is the point mass at 0).
/// `photons_per_pixel` must be positive and finite.
pub fn sample_noisy_intensity<R: Rng + ?Sized>(
    intensity: &[f64],
    photons_per_pixel: f64,
    rng: &mut R,
) -> Result<Vec<f64>, LithoError> {
    if !photons_per_pixel.is_finite() || photons_per_pixel <= 0.0 {
        return Err(LithoError::InvalidPhotonBudget(photons_per_pixel));
    }

    let mut noisy = Vec::with_capacity(intensity.len());
    for &i in intensity {
        let mean = i * photons_per_pixel;
        if mean <= 0.0 {
            noisy.push(0.0);
            continue;
        }
        // Mean is positive and finite here, so the distribution is valid.
        let poisson = Poisson::new(mean)
            .map_err(|_| LithoError::DegenerateField(format!("invalid Poisson mean {mean}")))?;
        let photons: f64 = poisson.sample(rng);
        noisy.push(photons / photons_per_pixel);
    }
    Ok(noisy)
}

/// Photon budget coupled to dose: a higher dose delivers proportionally
/// more photons per pixel, so shot noise shrinks as `1/sqrt(dose)`.
///
/// Stochastic process-window sweeps that vary dose pass the cell's dose
/// here instead of reusing the nominal budget.
pub fn scaled_photon_budget(base_photons: f64, dose: f64) -> Result<f64, LithoError> {
    let scaled = base_photons * dose;
    if !scaled.is_finite() || scaled <= 0.0 {
        return Err(LithoError::InvalidPhotonBudget(scaled));
    }
    Ok(scaled)
}

/// Derive a per-trial seed from a base seed, cell index, and trial index.
///
/// The spacing constant keeps (cell, trial) streams disjoint for any
/// realistic trial count; the same derivation runs on every worker, so
/// sweep results do not depend on rayon's scheduling.
#[must_use]
pub fn trial_seed(base_seed: u64, cell: usize, trial: usize) -> u64 {
    base_seed
        .wrapping_add((cell as u64).wrapping_mul(1_000_003))
        .wrapping_add(trial as u64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use crate::tolerances::{SHOT_NOISE_MEAN_ABS, SHOT_NOISE_VAR_REL};

    #[test]
    fn rejects_nonpositive_photon_budget() {
        let mut rng = StdRng::seed_from_u64(1);
        assert!(sample_noisy_intensity(&[0.5], 0.0, &mut rng).is_err());
        assert!(sample_noisy_intensity(&[0.5], -10.0, &mut rng).is_err());
        assert!(sample_noisy_intensity(&[0.5], f64::NAN, &mut rng).is_err());
    }

    #[test]
    fn zero_intensity_stays_exactly_zero() {
        let mut rng = StdRng::seed_from_u64(2);
        let noisy = sample_noisy_intensity(&[0.0; 64], 1200.0, &mut rng).unwrap();
        assert!(noisy.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn sample_mean_and_variance_match_poisson_scaling() {
        // 10⁴ pixels at I=0.5, 2000 photons/px: mean → 0.5 within ~6σ,
        // variance → I/ppp within 10%.
        let n = 10_000;
        let ppp = 2000.0;
        let intensity = vec![0.5; n];
        let mut rng = StdRng::seed_from_u64(42);
        let noisy = sample_noisy_intensity(&intensity, ppp, &mut rng).unwrap();

        let mean: f64 = noisy.iter().sum::<f64>() / n as f64;
        assert!(
            (mean - 0.5).abs() < SHOT_NOISE_MEAN_ABS,
            "sample mean {mean} should converge to 0.5"
        );

        let var: f64 = noisy.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / (n - 1) as f64;
        let predicted = 0.5 / ppp;
        assert!(
            ((var - predicted) / predicted).abs() < SHOT_NOISE_VAR_REL,
            "sample variance {var} should match Poisson prediction {predicted}"
        );
    }

    #[test]
    fn same_seed_reproduces_realization() {
        let intensity = vec![0.7; 256];
        let a = sample_noisy_intensity(&intensity, 800.0, &mut StdRng::seed_from_u64(7)).unwrap();
        let b = sample_noisy_intensity(&intensity, 800.0, &mut StdRng::seed_from_u64(7)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn different_seeds_decorrelate() {
        let intensity = vec![0.7; 256];
        let a = sample_noisy_intensity(&intensity, 800.0, &mut StdRng::seed_from_u64(7)).unwrap();
        let b = sample_noisy_intensity(&intensity, 800.0, &mut StdRng::seed_from_u64(8)).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn photon_budget_scales_linearly_with_dose() {
        let budget = scaled_photon_budget(1000.0, 1.5).unwrap();
        assert!((budget - 1500.0).abs() < f64::EPSILON);
        assert!(scaled_photon_budget(1000.0, 0.0).is_err());
        assert!(scaled_photon_budget(1000.0, -0.5).is_err());
        assert!(scaled_photon_budget(f64::INFINITY, 1.0).is_err());
    }

    #[test]
    fn trial_seed_is_disjoint_across_cells_and_trials() {
        assert_ne!(trial_seed(0, 0, 1), trial_seed(0, 1, 0));
        assert_ne!(trial_seed(5, 3, 2), trial_seed(5, 2, 3));
        assert_eq!(trial_seed(9, 4, 7), trial_seed(9, 4, 7));
    }
}
