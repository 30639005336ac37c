// SPDX-License-Identifier: AGPL-3.0-only

//! Pass/fail check accumulation for validation binaries.
//!
//! A harness collects named checks grouped by pipeline stage (optics,
//! resist, metrology, sweep, ...), prints a per-stage summary, emits one
//! machine-readable JSON line, and exits 0 only when every check passed.
//! Tolerance values come from [`crate::tolerances`] at the call sites so
//! the printed thresholds match the documented constants.

use serde::Serialize;
use std::process;

/// How an observed value is compared against its target.
#[derive(Clone, Copy, Debug, Serialize)]
pub enum ToleranceMode {
    /// |observed - expected| < tolerance
    Absolute,
    /// |observed - expected| / |expected| < tolerance
    Relative,
    /// observed < threshold
    UpperBound,
    /// observed > threshold
    LowerBound,
    /// observed is a 0/1 predicate
    Predicate,
}

impl std::fmt::Display for ToleranceMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Absolute => write!(f, "abs"),
            Self::Relative => write!(f, "rel"),
            Self::UpperBound => write!(f, "<"),
            Self::LowerBound => write!(f, ">"),
            Self::Predicate => write!(f, "bool"),
        }
    }
}

/// One named check, tagged with the pipeline stage it belongs to.
#[derive(Clone, Debug, Serialize)]
pub struct Check {
    pub stage: String,
    pub label: String,
    pub observed: f64,
    pub expected: f64,
    pub tolerance: f64,
    pub mode: ToleranceMode,
    pub passed: bool,
}

/// Machine-readable run summary; `finish` serializes this as one JSON line.
#[derive(Clone, Debug, Serialize)]
pub struct ValidationSummary<'a> {
    pub name: &'a str,
    pub passed: usize,
    pub total: usize,
    pub all_passed: bool,
    pub checks: &'a [Check],
}

/// Accumulates checks across pipeline stages and reports an exit code.
#[derive(Debug, Default)]
#[must_use]
pub struct ValidationHarness {
    /// Name of the validation binary.
    pub name: String,
    /// All checks performed, in insertion order.
    pub checks: Vec<Check>,
    stage: String,
}

impl ValidationHarness {
    #[must_use = "validation harness must be used to run checks"]
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            checks: Vec::new(),
            stage: "general".to_string(),
        }
    }

    /// Set the stage tag applied to subsequent checks.
    pub fn stage(&mut self, stage: &str) {
        self.stage = stage.to_string();
    }

    fn record(
        &mut self,
        label: &str,
        observed: f64,
        expected: f64,
        tolerance: f64,
        mode: ToleranceMode,
        passed: bool,
    ) {
        self.checks.push(Check {
            stage: self.stage.clone(),
            label: label.to_string(),
            observed,
            expected,
            tolerance,
            mode,
            passed,
        });
    }

    /// |observed - expected| < tolerance
    pub fn check_abs(&mut self, label: &str, observed: f64, expected: f64, tolerance: f64) {
        let passed = (observed - expected).abs() < tolerance;
        self.record(label, observed, expected, tolerance, ToleranceMode::Absolute, passed);
    }

    /// |observed - expected| / |expected| < tolerance; falls back to an
    /// absolute comparison when the expected value is zero.
    pub fn check_rel(&mut self, label: &str, observed: f64, expected: f64, tolerance: f64) {
        let passed = if expected.abs() > f64::EPSILON {
            ((observed - expected) / expected).abs() < tolerance
        } else {
            observed.abs() < tolerance
        };
        self.record(label, observed, expected, tolerance, ToleranceMode::Relative, passed);
    }

    /// observed < threshold (strict; equality fails)
    pub fn check_upper(&mut self, label: &str, observed: f64, threshold: f64) {
        let passed = observed < threshold;
        self.record(label, observed, threshold, threshold, ToleranceMode::UpperBound, passed);
    }

    /// observed > threshold (strict; equality fails)
    pub fn check_lower(&mut self, label: &str, observed: f64, threshold: f64) {
        let passed = observed > threshold;
        self.record(label, observed, threshold, threshold, ToleranceMode::LowerBound, passed);
    }

    /// Boolean pass/fail predicate.
    pub fn check_bool(&mut self, label: &str, passed: bool) {
        let observed = f64::from(u8::from(passed));
        self.record(label, observed, 1.0, 0.0, ToleranceMode::Predicate, passed);
    }

    #[must_use]
    pub fn passed_count(&self) -> usize {
        self.checks.iter().filter(|c| c.passed).count()
    }

    #[must_use]
    pub const fn total_count(&self) -> usize {
        self.checks.len()
    }

    #[must_use]
    pub fn all_passed(&self) -> bool {
        self.checks.iter().all(|c| c.passed)
    }

    /// Stages that contain at least one failed check, deduplicated.
    #[must_use]
    pub fn failed_stages(&self) -> Vec<&str> {
        let mut stages: Vec<&str> = Vec::new();
        for check in self.checks.iter().filter(|c| !c.passed) {
            if !stages.contains(&check.stage.as_str()) {
                stages.push(&check.stage);
            }
        }
        stages
    }

    /// Borrowing view of the run for serialization.
    #[must_use]
    pub fn summary(&self) -> ValidationSummary<'_> {
        ValidationSummary {
            name: &self.name,
            passed: self.passed_count(),
            total: self.total_count(),
            all_passed: self.all_passed(),
            checks: &self.checks,
        }
    }

    /// Print the per-stage report and one JSON summary line, then exit
    /// 0 (all checks passed) or 1 (any failed).
    pub fn finish(&self) -> ! {
        println!();
        let mut current = "";
        for check in &self.checks {
            if check.stage != current {
                println!("[{}]", check.stage);
                current = &check.stage;
            }
            let verdict = if check.passed { " ok " } else { "FAIL" };
            println!(
                "  {verdict} {} | observed {:.6e}, target {:.6e} ({} {:.2e})",
                check.label, check.observed, check.expected, check.mode, check.tolerance
            );
        }
        println!();
        println!(
            "{}: {}/{} checks passed",
            self.name,
            self.passed_count(),
            self.total_count()
        );
        if !self.all_passed() {
            println!("failing stages: {}", self.failed_stages().join(", "));
        }
        match serde_json::to_string(&self.summary()) {
            Ok(json) => println!("{json}"),
            Err(e) => eprintln!("summary serialization failed: {e}"),
        }
        process::exit(i32::from(!self.all_passed()));
    }
}
