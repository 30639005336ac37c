// SPDX-License-Identifier: AGPL-3.0-only

//! End-to-end lithography pipeline validation.
//!
//! Exercises the full imaging chain on the canonical two-line study
//! geometry and checks every stage against analytically known targets.
//!
//! # Validation targets
//!
//! | Check | Criterion | Basis |
//! |-------|-----------|-------|
//! | PSF normalization | peak exactly 1.0 at grid center | Peak-normalized kernel |
//! | CD regression | line-pair separation ≈ spacing | Mask/aerial alignment |
//! | Shot-noise statistics | mean → I, var → I/ppp | Poisson scaling |
//! | Failure classification | bridged → Short, severed → Open | Component analysis |
//! | LER recovery | injected σ recovered within 10% | Ensemble statistics |
//! | Dose sweep | CD monotone in dose, no degenerate cells | Mack monotonicity |

use rand::rngs::StdRng;
use rand::SeedableRng;

use lithosim::aerial::{form_aerial_image, NormalizationPolicy};
use lithosim::metrology::{
    classify_connectivity, compute_roughness, extract_line_edges, find_subpixel_edges, Printability,
};
use lithosim::optics::{build_psf, PupilSpec};
use lithosim::patterns::{two_lines_mask, two_lines_spans};
use lithosim::resist::{expose_and_develop, ResistParams};
use lithosim::stochastic::{sample_noisy_intensity, trial_seed};
use lithosim::sweep::{run_sweep, Aggregate, SweepAxis, SweepConfig};
use lithosim::tolerances;
use lithosim::validation::ValidationHarness;

fn main() {
    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║  Stochastic Lithography Pipeline Validation                ║");
    println!("║  pupil → PSF → aerial → resist → metrology → sweep         ║");
    println!("╚══════════════════════════════════════════════════════════════╝");
    println!();

    let mut harness = ValidationHarness::new("litho_pipeline");

    // ═══ Test 1: PSF normalization and centering ═══
    println!("═══ PSF Normalization ═══");
    harness.stage("optics");
    let nx = 512;
    let spec = match PupilSpec::new(nx, 60.0, 0.0) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("pupil spec: {e}");
            std::process::exit(1);
        }
    };
    let psf = match build_psf(&spec) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("PSF build: {e}");
            std::process::exit(1);
        }
    };
    let (argmax, peak) = psf
        .field
        .iter()
        .enumerate()
        .fold((0usize, f64::MIN), |(bi, bv), (i, &v)| {
            if v > bv {
                (i, v)
            } else {
                (bi, bv)
            }
        });
    println!("  peak {peak:.12} at index {argmax} (center {})", (nx / 2) * nx + nx / 2);
    harness.check_abs("PSF peak is 1.0", peak, 1.0, tolerances::EXACT_F64);
    harness.check_bool("PSF peak at grid center", argmax == (nx / 2) * nx + nx / 2);
    println!();

    // ═══ Test 2: CD regression on the two-line geometry ═══
    println!("═══ CD Regression (width 6, spacing 30) ═══");
    harness.stage("metrology");
    let width = 6;
    let spacing = 30;
    let mask = two_lines_mask(nx, width, spacing);
    let params = ResistParams::reference();
    match form_aerial_image(&mask, &psf, 1.0, NormalizationPolicy::PeakNormalized) {
        Ok(aerial) => {
            let resp = expose_and_develop(&aerial, &params, 1.0);
            let c = nx / 2;
            let profile = &resp.clear_depth[c * nx..(c + 1) * nx];
            let edges = find_subpixel_edges(profile, params.resist_thickness);
            println!("  {} threshold crossings on the center row", edges.len());
            harness.check_bool("two lines give four edges", edges.len() == 4);
            if edges.len() == 4 {
                let left_mid = (edges[0] + edges[1]) / 2.0;
                let right_mid = (edges[2] + edges[3]) / 2.0;
                let separation = right_mid - left_mid;
                println!("  line midpoints {left_mid:.2} / {right_mid:.2}, separation {separation:.3}");
                harness.check_abs(
                    "line separation matches mask spacing",
                    separation,
                    spacing as f64,
                    tolerances::CD_REGRESSION_ABS,
                );
            }
        }
        Err(e) => {
            println!("  FAIL: aerial image: {e}");
            harness.check_bool("aerial image forms", false);
        }
    }
    println!();

    // ═══ Test 3: Poisson shot-noise statistics ═══
    println!("═══ Shot-Noise Statistics ═══");
    harness.stage("stochastic");
    let n_px = 20_000;
    let ppp = 1500.0;
    let flat = vec![0.6; n_px];
    let mut rng = StdRng::seed_from_u64(trial_seed(99, 0, 0));
    match sample_noisy_intensity(&flat, ppp, &mut rng) {
        Ok(noisy) => {
            let mean: f64 = noisy.iter().sum::<f64>() / n_px as f64;
            let var: f64 =
                noisy.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / (n_px - 1) as f64;
            let predicted_var = 0.6 / ppp;
            println!("  mean {mean:.6} (target 0.6), var {var:.3e} (target {predicted_var:.3e})");
            harness.check_abs("noisy mean preserved", mean, 0.6, tolerances::SHOT_NOISE_MEAN_ABS);
            harness.check_rel(
                "noisy variance follows I/ppp",
                var,
                predicted_var,
                tolerances::SHOT_NOISE_VAR_REL,
            );
        }
        Err(e) => {
            println!("  FAIL: sampling: {e}");
            harness.check_bool("shot-noise sampling runs", false);
        }
    }
    println!();

    // ═══ Test 4: Open/short classification ═══
    println!("═══ Failure Classification ═══");
    harness.stage("connectivity");
    let small = 64;
    let spans = two_lines_spans(small, 6, 20);
    let ideal: Vec<bool> = two_lines_mask(small, 6, 20).iter().map(|&v| v > 0.5).collect();
    harness.check_bool(
        "intact lines classify Pass",
        classify_connectivity(&ideal, small, 2, &spans) == Printability::Pass,
    );
    let mut bridged = ideal.clone();
    for x in 0..small {
        bridged[(small / 2) * small + x] = true;
    }
    harness.check_bool(
        "bridged lines classify Short",
        classify_connectivity(&bridged, small, 2, &spans) == Printability::Short,
    );
    let mut severed = ideal.clone();
    for x in 0..small {
        severed[(small / 2) * small + x] &= !(spans[0].0..spans[0].1).contains(&x);
    }
    harness.check_bool(
        "severed line classifies Open",
        classify_connectivity(&severed, small, 2, &spans) == Printability::Open,
    );
    println!("  Pass / Short / Open checked on synthetic two-line prints");
    println!();

    // ═══ Test 5: LER recovery from a noisy ensemble ═══
    println!("═══ LER Recovery ═══");
    harness.stage("roughness");
    let sigma = 1.2;
    let rows = 64;
    let trials = 300;
    use rand_distr::{Distribution, Normal};
    let normal = match Normal::new(0.0, sigma) {
        Ok(n) => n,
        Err(e) => {
            eprintln!("normal distribution: {e}");
            std::process::exit(1);
        }
    };
    let mut rng = StdRng::seed_from_u64(trial_seed(7, 0, 0));
    let left: Vec<Vec<f64>> = (0..trials)
        .map(|_| (0..rows).map(|_| 20.0 + normal.sample(&mut rng)).collect())
        .collect();
    let right: Vec<Vec<f64>> = (0..trials)
        .map(|_| (0..rows).map(|_| 44.0 + normal.sample(&mut rng)).collect())
        .collect();
    let stats = compute_roughness(&left, &right);
    println!("  recovered LER {:.4} vs injected {sigma}", stats.ler_left);
    harness.check_rel(
        "LER recovers injected sigma",
        stats.ler_left,
        sigma,
        tolerances::ROUGHNESS_RECOVERY_REL,
    );
    let expected_lwr = sigma * std::f64::consts::SQRT_2;
    harness.check_rel(
        "LWR of independent edges is sigma*sqrt(2)",
        stats.lwr,
        expected_lwr,
        tolerances::ROUGHNESS_RECOVERY_REL,
    );
    println!();

    // ═══ Test 6: Dose sweep through the full pipeline ═══
    println!("═══ Dose Sweep (stochastic CD) ═══");
    harness.stage("sweep");
    let sweep_nx = 128;
    let sweep_spec = match PupilSpec::new(sweep_nx, 15.0, 0.0) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("sweep pupil: {e}");
            std::process::exit(1);
        }
    };
    let sweep_psf = match build_psf(&sweep_spec) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("sweep PSF: {e}");
            std::process::exit(1);
        }
    };
    let sweep_mask = two_lines_mask(sweep_nx, 8, 40);
    let sweep_params = ResistParams::reference();
    let config = SweepConfig {
        axis1: SweepAxis::linspace("dose", 0.9, 1.4, 6),
        axis2: None,
        trials_per_cell: 16,
        base_seed: 2026,
    };
    let ppp_sweep = 5000.0;
    let result = run_sweep(
        &config,
        |point, rng| {
            let aerial = form_aerial_image(
                &sweep_mask,
                &sweep_psf,
                point.value1,
                NormalizationPolicy::DoseScaled,
            )
            .ok()?;
            let noisy = sample_noisy_intensity(&aerial, ppp_sweep, rng).ok()?;
            let resp = expose_and_develop(&noisy, &sweep_params, 1.0);
            let (lefts, rights) = extract_line_edges(&resp.printed, sweep_nx);
            let c = sweep_nx / 2;
            if lefts[c].is_nan() {
                return None;
            }
            Some(rights[c] - lefts[c])
        },
        Aggregate::Mean,
    );
    match result {
        Ok(sweep) => {
            let mut last_cd = f64::MIN;
            let mut monotone = true;
            let mut any_valid = true;
            for (i, cell) in sweep.cells.iter().enumerate() {
                match cell.aggregate {
                    Some(cd) => {
                        println!(
                            "  dose {:.2}: mean printed extent {cd:.2} px ({} valid, {} degenerate)",
                            sweep.config.axis1.values[i], cell.valid_trials, cell.degenerate_trials
                        );
                        if cd < last_cd - tolerances::CD_REGRESSION_ABS {
                            monotone = false;
                        }
                        last_cd = cd;
                    }
                    None => {
                        println!("  dose {:.2}: no valid trials", sweep.config.axis1.values[i]);
                        any_valid = false;
                    }
                }
            }
            harness.check_bool("every dose cell has valid trials", any_valid);
            harness.check_bool("printed extent monotone in dose", monotone);
        }
        Err(e) => {
            println!("  FAIL: sweep: {e}");
            harness.check_bool("dose sweep runs", false);
        }
    }
    println!();

    harness.finish();
}
