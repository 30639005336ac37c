// SPDX-License-Identifier: AGPL-3.0-only

//! Line-edge and line-width roughness over Monte-Carlo edge ensembles.
//!
//! Each stochastic trial yields one left and one right edge position per
//! scan row. Rows where the line failed to print carry NaN; the ensemble
//! statistics skip those entries instead of poisoning the mean, so a
//! handful of severed trials degrades the estimate gracefully.
//!
//! LER and LWR are population standard deviations across trials at each
//! row position, then averaged over rows. Spectral character comes from
//! the per-trial power spectrum and the edge autocorrelation, both
//! averaged over trials that printed every row.

use crate::fourier::fft1_real;
use crate::tolerances::DIVISION_GUARD;

/// Per-row left/right edge positions extracted from a printed field.
///
/// Row `y` gets the first and last printed column index as `f64`; a row
/// with no printed pixel gets NaN in both.
#[must_use]
pub fn extract_line_edges(printed: &[bool], nx: usize) -> (Vec<f64>, Vec<f64>) {
    debug_assert_eq!(printed.len(), nx * nx);
    let mut left = Vec::with_capacity(nx);
    let mut right = Vec::with_capacity(nx);
    for y in 0..nx {
        let row = &printed[y * nx..(y + 1) * nx];
        let first = row.iter().position(|&p| p);
        let last = row.iter().rposition(|&p| p);
        match (first, last) {
            (Some(f), Some(l)) => {
                left.push(f as f64);
                right.push(l as f64);
            }
            _ => {
                left.push(f64::NAN);
                right.push(f64::NAN);
            }
        }
    }
    (left, right)
}

/// Ensemble roughness of a line across stochastic trials.
///
/// Roughness is fundamentally a per-row quantity: the std of an edge
/// position across trials at each scan row. The profile vectors carry
/// those row-resolved values (for roughness-vs-position plots and local
/// hotspot readout); the scalar fields are their row averages.
#[derive(Clone, Debug)]
pub struct RoughnessStats {
    /// Per-row mean left edge position across trials.
    pub mean_left: Vec<f64>,
    /// Per-row mean right edge position across trials.
    pub mean_right: Vec<f64>,
    /// Per-row mean line width across trials.
    pub mean_width: Vec<f64>,
    /// Per-row left-edge std across trials (LER profile).
    pub ler_left_profile: Vec<f64>,
    /// Per-row right-edge std across trials.
    pub ler_right_profile: Vec<f64>,
    /// Per-row width std across trials (LWR profile).
    pub lwr_profile: Vec<f64>,
    /// Left-edge LER: the profile averaged over rows.
    pub ler_left: f64,
    /// Right-edge LER.
    pub ler_right: f64,
    /// LWR: the width-std profile averaged over rows.
    pub lwr: f64,
}

fn nan_mean(values: impl Iterator<Item = f64>) -> f64 {
    let mut sum = 0.0;
    let mut count = 0usize;
    for v in values {
        if !v.is_nan() {
            sum += v;
            count += 1;
        }
    }
    if count == 0 {
        f64::NAN
    } else {
        sum / count as f64
    }
}

/// Population std (ddof = 0) over non-NaN entries; NaN when none remain.
fn nan_std(values: &[f64]) -> f64 {
    let mean = nan_mean(values.iter().copied());
    if mean.is_nan() {
        return f64::NAN;
    }
    let mut sum = 0.0;
    let mut count = 0usize;
    for &v in values {
        if !v.is_nan() {
            sum += (v - mean) * (v - mean);
            count += 1;
        }
    }
    (sum / count as f64).sqrt()
}

/// Compute LER/LWR from per-trial edge vectors.
///
/// `left_trials[t]` and `right_trials[t]` are the per-row edges of trial
/// `t`; all trials must share a row count. Statistics at each row are
/// NaN-aware across trials, and the scalar LER/LWR values average the
/// per-row deviations over rows that have at least one valid trial.
#[must_use]
pub fn compute_roughness(left_trials: &[Vec<f64>], right_trials: &[Vec<f64>]) -> RoughnessStats {
    debug_assert_eq!(left_trials.len(), right_trials.len());
    let rows = left_trials.first().map_or(0, Vec::len);

    let mut mean_left = Vec::with_capacity(rows);
    let mut mean_right = Vec::with_capacity(rows);
    let mut mean_width = Vec::with_capacity(rows);
    let mut std_left = Vec::with_capacity(rows);
    let mut std_right = Vec::with_capacity(rows);
    let mut std_width = Vec::with_capacity(rows);

    for y in 0..rows {
        let lefts: Vec<f64> = left_trials.iter().map(|t| t[y]).collect();
        let rights: Vec<f64> = right_trials.iter().map(|t| t[y]).collect();
        let widths: Vec<f64> = lefts
            .iter()
            .zip(&rights)
            .map(|(&l, &r)| r - l)
            .collect();
        mean_left.push(nan_mean(lefts.iter().copied()));
        mean_right.push(nan_mean(rights.iter().copied()));
        mean_width.push(nan_mean(widths.iter().copied()));
        std_left.push(nan_std(&lefts));
        std_right.push(nan_std(&rights));
        std_width.push(nan_std(&widths));
    }

    RoughnessStats {
        ler_left: nan_mean(std_left.iter().copied()),
        ler_right: nan_mean(std_right.iter().copied()),
        lwr: nan_mean(std_width.iter().copied()),
        mean_left,
        mean_right,
        mean_width,
        ler_left_profile: std_left,
        ler_right_profile: std_right,
        lwr_profile: std_width,
    }
}

/// Mean power spectral density of an edge ensemble.
///
/// Each signal is mean-subtracted, transformed, and `|F|²` kept for the
/// first `len/2` bins (the non-redundant half of a real signal). Trials
/// containing any NaN are skipped; the result averages the rest. Empty
/// input or all-NaN trials yield an empty spectrum.
#[must_use]
pub fn compute_psd(signals: &[Vec<f64>]) -> Vec<f64> {
    let len = signals.first().map_or(0, Vec::len);
    let half = len / 2;
    let mut psd = vec![0.0; half];
    let mut used = 0usize;

    for signal in signals {
        if signal.iter().any(|v| v.is_nan()) {
            continue;
        }
        let mean = signal.iter().sum::<f64>() / len as f64;
        let centered: Vec<f64> = signal.iter().map(|&v| v - mean).collect();
        let spectrum = fft1_real(&centered);
        for (bin, value) in psd.iter_mut().zip(&spectrum[..half]) {
            *bin += value.norm_sqr();
        }
        used += 1;
    }

    if used == 0 {
        return Vec::new();
    }
    for bin in &mut psd {
        *bin /= used as f64;
    }
    psd
}

/// Mean normalized edge autocorrelation and its 1/e correlation length.
///
/// The raw (biased) autocorrelation of each NaN-free mean-subtracted
/// trial is averaged, then normalized by its lag-0 value. Correlation
/// length is the first lag where the normalized curve drops below 1/e;
/// a curve that never drops saturates to the signal length.
#[must_use]
pub fn mean_autocorrelation(signals: &[Vec<f64>]) -> (Vec<f64>, usize) {
    let len = signals.first().map_or(0, Vec::len);
    let mut acf = vec![0.0; len];
    let mut used = 0usize;

    for signal in signals {
        if signal.iter().any(|v| v.is_nan()) {
            continue;
        }
        let mean = signal.iter().sum::<f64>() / len as f64;
        let centered: Vec<f64> = signal.iter().map(|&v| v - mean).collect();
        for lag in 0..len {
            let mut sum = 0.0;
            for i in 0..len - lag {
                sum += centered[i] * centered[i + lag];
            }
            acf[lag] += sum;
        }
        used += 1;
    }

    if used == 0 || len == 0 {
        return (acf, len);
    }

    let lag0 = acf[0] / used as f64;
    if lag0.abs() < DIVISION_GUARD {
        // Flat ensemble: define the curve as the lag-0 spike and report a
        // saturated correlation length.
        let mut flat = vec![0.0; len];
        flat[0] = 1.0;
        return (flat, len);
    }
    for value in &mut acf {
        *value /= used as f64 * lag0;
    }

    let threshold = (-1.0f64).exp();
    let corr_len = acf
        .iter()
        .position(|&v| v < threshold)
        .unwrap_or(len);
    (acf, corr_len)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use rand_distr::{Distribution, Normal};

    use crate::tolerances::{EXACT_F64, ROUGHNESS_POINTWISE_REL, ROUGHNESS_RECOVERY_REL};

    #[test]
    fn extract_edges_finds_first_and_last_column() {
        let nx = 4;
        let mut printed = vec![false; nx * nx];
        printed[1] = true;
        printed[2] = true;
        printed[2 * nx + 3] = true;
        let (left, right) = extract_line_edges(&printed, nx);
        assert!((left[0] - 1.0).abs() < EXACT_F64);
        assert!((right[0] - 2.0).abs() < EXACT_F64);
        assert!(left[1].is_nan() && right[1].is_nan());
        assert!((left[2] - 3.0).abs() < EXACT_F64);
        assert!((right[2] - 3.0).abs() < EXACT_F64);
    }

    #[test]
    fn roughness_of_identical_trials_is_zero() {
        let edge = vec![10.0; 32];
        let left: Vec<Vec<f64>> = vec![edge.clone(); 5];
        let right: Vec<Vec<f64>> = vec![vec![16.0; 32]; 5];
        let stats = compute_roughness(&left, &right);
        assert!(stats.ler_left.abs() < EXACT_F64);
        assert!(stats.ler_right.abs() < EXACT_F64);
        assert!(stats.lwr.abs() < EXACT_F64);
        assert!((stats.mean_width[0] - 6.0).abs() < EXACT_F64);
        assert_eq!(stats.ler_left_profile.len(), 32);
        assert!(stats.ler_left_profile.iter().all(|&v| v.abs() < EXACT_F64));
        assert!(stats.lwr_profile.iter().all(|&v| v.abs() < EXACT_F64));
    }

    #[test]
    fn nan_rows_are_skipped_not_poisoning() {
        let mut a = vec![10.0; 8];
        a[3] = f64::NAN;
        let b = vec![12.0; 8];
        let stats = compute_roughness(&[a, b.clone()], &[vec![20.0; 8], vec![20.0; 8]]);
        // Row 3 has one valid trial; its mean is that trial's value.
        assert!((stats.mean_left[3] - 12.0).abs() < EXACT_F64);
        assert!((stats.mean_left[0] - 11.0).abs() < EXACT_F64);
        assert!(!stats.ler_left.is_nan());
    }

    #[test]
    fn ler_recovers_injected_sigma() {
        // Edges are base + N(0, σ) independently per trial and row: the
        // per-row std across 200 trials estimates σ within 10%.
        let sigma = 1.5;
        let rows = 64;
        let trials = 200;
        let normal = Normal::new(0.0, sigma).unwrap();
        let mut rng = StdRng::seed_from_u64(2024);

        let left: Vec<Vec<f64>> = (0..trials)
            .map(|_| (0..rows).map(|_| 10.0 + normal.sample(&mut rng)).collect())
            .collect();
        let right: Vec<Vec<f64>> = (0..trials)
            .map(|_| (0..rows).map(|_| 30.0 + normal.sample(&mut rng)).collect())
            .collect();

        let stats = compute_roughness(&left, &right);
        assert!(
            ((stats.ler_left - sigma) / sigma).abs() < ROUGHNESS_RECOVERY_REL,
            "recovered LER {} vs injected {sigma}",
            stats.ler_left
        );
        // Row-resolved profile: every position estimates the same σ.
        assert_eq!(stats.ler_left_profile.len(), rows);
        assert_eq!(stats.lwr_profile.len(), rows);
        let mid = stats.ler_left_profile[rows / 2];
        assert!(
            ((mid - sigma) / sigma).abs() < ROUGHNESS_POINTWISE_REL,
            "per-row LER {mid} vs injected {sigma}"
        );
        // Independent edges: width variance is the sum, LWR ≈ σ·√2.
        let expected_lwr = sigma * std::f64::consts::SQRT_2;
        assert!(
            ((stats.lwr - expected_lwr) / expected_lwr).abs() < ROUGHNESS_RECOVERY_REL,
            "recovered LWR {} vs expected {expected_lwr}",
            stats.lwr
        );
    }

    #[test]
    fn psd_of_pure_tone_concentrates_in_one_bin() {
        let len = 64;
        let k = 5;
        let signal: Vec<f64> = (0..len)
            .map(|i| (2.0 * std::f64::consts::PI * k as f64 * i as f64 / len as f64).sin())
            .collect();
        let psd = compute_psd(&[signal]);
        assert_eq!(psd.len(), len / 2);
        let peak = psd
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.total_cmp(b.1))
            .map(|(i, _)| i)
            .unwrap();
        assert_eq!(peak, k);
    }

    #[test]
    fn psd_skips_nan_trials() {
        let mut bad = vec![1.0; 16];
        bad[7] = f64::NAN;
        let good = vec![0.0; 16];
        let psd = compute_psd(&[bad, good]);
        // Only the flat trial survives: zero power everywhere.
        assert!(psd.iter().all(|&v| v.abs() < EXACT_F64));
    }

    #[test]
    fn autocorrelation_starts_at_one_and_finds_1_over_e_lag() {
        let len = 128;
        // Slowly decaying correlated signal: cosine with long period.
        let signal: Vec<f64> = (0..len)
            .map(|i| (2.0 * std::f64::consts::PI * i as f64 / len as f64).cos())
            .collect();
        let (acf, corr_len) = mean_autocorrelation(&[signal]);
        assert!((acf[0] - 1.0).abs() < EXACT_F64);
        assert!(corr_len > 1 && corr_len < len);
    }

    #[test]
    fn flat_ensemble_saturates_correlation_length() {
        let signals = vec![vec![3.0; 32]; 4];
        let (acf, corr_len) = mean_autocorrelation(&signals);
        assert!((acf[0] - 1.0).abs() < EXACT_F64);
        assert!(acf[1..].iter().all(|&v| v.abs() < EXACT_F64));
        assert_eq!(corr_len, 32);
    }
}
