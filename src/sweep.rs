// SPDX-License-Identifier: AGPL-3.0-only

//! Process-window sweep engine.
//!
//! A sweep evaluates a caller-supplied simulation over a 1-D or 2-D grid
//! of process parameters, running many stochastic trials per cell and
//! reducing them to one statistic. Cells execute in parallel under rayon,
//! but every trial seeds its own `StdRng` from `(base_seed, cell, trial)`,
//! so results are bit-identical regardless of thread count or schedule.
//!
//! Degenerate trials — the simulation returning `None` because a feature
//! failed to print or a metric had no data — are counted per cell and
//! excluded from the aggregate. They never abort the sweep: a cell at the
//! edge of the process window reporting "0 valid trials" is the result.

use rand::rngs::StdRng;
use rand::SeedableRng;
use rayon::prelude::*;
use serde::Serialize;

use crate::error::LithoError;
use crate::stochastic::trial_seed;

/// One named parameter axis of a sweep grid.
#[derive(Clone, Debug, Serialize)]
pub struct SweepAxis {
    pub label: String,
    pub values: Vec<f64>,
}

impl SweepAxis {
    #[must_use]
    pub fn new(label: &str, values: Vec<f64>) -> Self {
        Self {
            label: label.to_string(),
            values,
        }
    }

    /// Evenly spaced inclusive range, the usual dose/focus ladder.
    #[must_use]
    pub fn linspace(label: &str, start: f64, end: f64, count: usize) -> Self {
        let values = if count <= 1 {
            vec![start]
        } else {
            let step = (end - start) / (count - 1) as f64;
            (0..count).map(|i| start + step * i as f64).collect()
        };
        Self::new(label, values)
    }
}

/// Sweep grid: one or two axes, trial count, base seed.
#[derive(Clone, Debug, Serialize)]
pub struct SweepConfig {
    pub axis1: SweepAxis,
    pub axis2: Option<SweepAxis>,
    pub trials_per_cell: usize,
    pub base_seed: u64,
}

/// Parameter values handed to the simulation for one cell.
#[derive(Clone, Copy, Debug)]
pub struct SweepPoint {
    pub value1: f64,
    /// Second-axis value; 0.0 for 1-D sweeps (the closure ignores it).
    pub value2: f64,
    pub cell: usize,
}

/// Reduction applied to a cell's valid trial statistics.
#[derive(Clone, Copy, Debug, Serialize)]
pub enum Aggregate {
    /// Largest absolute value across trials (worst-case EPE style).
    WorstAbs,
    /// Arithmetic mean across trials (CD style).
    Mean,
}

/// Per-cell sweep outcome.
#[derive(Clone, Debug, Serialize)]
pub struct CellStats {
    /// Aggregated statistic; `None` when no trial produced a value.
    pub aggregate: Option<f64>,
    pub valid_trials: usize,
    pub degenerate_trials: usize,
}

/// Full sweep result: config echo plus row-major cell grid
/// (`axis1` indexes rows, `axis2` columns; 1-D sweeps have one column).
#[derive(Clone, Debug, Serialize)]
pub struct SweepResult {
    pub config: SweepConfig,
    pub aggregate: Aggregate,
    pub cells: Vec<CellStats>,
}

impl SweepResult {
    /// Cell stats at `(i1, i2)`; `i2` is ignored for 1-D sweeps.
    #[must_use]
    pub fn cell(&self, i1: usize, i2: usize) -> &CellStats {
        let cols = self.config.axis2.as_ref().map_or(1, |a| a.values.len());
        &self.cells[i1 * cols + i2.min(cols - 1)]
    }
}

fn reduce(values: &[f64], aggregate: Aggregate) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(match aggregate {
        Aggregate::WorstAbs => values.iter().fold(0.0f64, |acc, v| acc.max(v.abs())),
        Aggregate::Mean => values.iter().sum::<f64>() / values.len() as f64,
    })
}

/// Run a sweep. `simulate` maps one `(point, rng)` trial to a statistic,
/// or `None` when the trial is degenerate.
pub fn run_sweep<F>(
    config: &SweepConfig,
    simulate: F,
    aggregate: Aggregate,
) -> Result<SweepResult, LithoError>
where
    F: Fn(&SweepPoint, &mut StdRng) -> Option<f64> + Sync,
{
    if config.trials_per_cell == 0 {
        return Err(LithoError::InvalidSweep(
            "trials_per_cell must be at least 1".to_string(),
        ));
    }
    if config.axis1.values.is_empty() {
        return Err(LithoError::InvalidSweep(format!(
            "axis '{}' has no values",
            config.axis1.label
        )));
    }
    if let Some(axis2) = &config.axis2 {
        if axis2.values.is_empty() {
            return Err(LithoError::InvalidSweep(format!(
                "axis '{}' has no values",
                axis2.label
            )));
        }
    }

    let points: Vec<SweepPoint> = match &config.axis2 {
        Some(axis2) => {
            let cols = axis2.values.len();
            config
                .axis1
                .values
                .iter()
                .enumerate()
                .flat_map(|(i1, &v1)| {
                    axis2
                        .values
                        .iter()
                        .enumerate()
                        .map(move |(i2, &v2)| SweepPoint {
                            value1: v1,
                            value2: v2,
                            cell: i1 * cols + i2,
                        })
                })
                .collect()
        }
        None => config
            .axis1
            .values
            .iter()
            .enumerate()
            .map(|(i1, &v1)| SweepPoint {
                value1: v1,
                value2: 0.0,
                cell: i1,
            })
            .collect(),
    };

    let cells: Vec<CellStats> = points
        .par_iter()
        .map(|point| {
            let mut valid = Vec::with_capacity(config.trials_per_cell);
            let mut degenerate = 0usize;
            for trial in 0..config.trials_per_cell {
                let seed = trial_seed(config.base_seed, point.cell, trial);
                let mut rng = StdRng::seed_from_u64(seed);
                match simulate(point, &mut rng) {
                    Some(value) => valid.push(value),
                    None => degenerate += 1,
                }
            }
            CellStats {
                aggregate: reduce(&valid, aggregate),
                valid_trials: valid.len(),
                degenerate_trials: degenerate,
            }
        })
        .collect();

    Ok(SweepResult {
        config: config.clone(),
        aggregate,
        cells,
    })
}
