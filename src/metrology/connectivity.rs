// SPDX-License-Identifier: AGPL-3.0-only

//! Connected-component failure classification for multi-feature prints.
//!
//! A two-line target that prints as one blob has bridged (Short); a line
//! with a fully empty scan row inside its span has severed (Open). The
//! check order matters and matches the stochastic failure studies: merged
//! features are shorts even when they also have gaps.

use serde::Serialize;

/// Outcome of printing a multi-feature target.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum Printability {
    /// Expected features merged into fewer connected components.
    Short,
    /// A feature is severed: some row in its span printed nothing.
    Open,
    /// Expected component count and no severed rows.
    Pass,
}

/// Label 8-connected components of a printed field.
///
/// Returns per-pixel labels (0 = background, 1.. = component id) and the
/// component count. Iterative flood fill; no recursion.
#[must_use]
pub fn label_components(printed: &[bool], nx: usize) -> (Vec<u32>, usize) {
    debug_assert_eq!(printed.len(), nx * nx);
    let mut labels = vec![0u32; nx * nx];
    let mut next_label = 0u32;
    let mut stack = Vec::new();

    for start in 0..printed.len() {
        if !printed[start] || labels[start] != 0 {
            continue;
        }
        next_label += 1;
        labels[start] = next_label;
        stack.push(start);
        while let Some(idx) = stack.pop() {
            let y = (idx / nx) as i64;
            let x = (idx % nx) as i64;
            for dy in -1..=1i64 {
                for dx in -1..=1i64 {
                    if dy == 0 && dx == 0 {
                        continue;
                    }
                    let ny = y + dy;
                    let nxp = x + dx;
                    if ny < 0 || nxp < 0 || ny >= nx as i64 || nxp >= nx as i64 {
                        continue;
                    }
                    let nidx = (ny as usize) * nx + nxp as usize;
                    if printed[nidx] && labels[nidx] == 0 {
                        labels[nidx] = next_label;
                        stack.push(nidx);
                    }
                }
            }
        }
    }
    (labels, next_label as usize)
}

/// Classify a printed field against an expected feature count and the
/// column spans `[start, end)` each feature should occupy.
///
/// Fewer components than expected → `Short`. Otherwise any row with zero
/// printed pixels inside some feature's span → `Open`. Otherwise `Pass`.
/// Spans are clamped to the grid; a span covering no columns is vacuous
/// and skipped.
#[must_use]
pub fn classify_connectivity(
    printed: &[bool],
    nx: usize,
    expected_features: usize,
    spans: &[(usize, usize)],
) -> Printability {
    let (_, count) = label_components(printed, nx);
    if count < expected_features {
        return Printability::Short;
    }
    for &(start, end) in spans {
        let start = start.min(nx);
        let end = end.min(nx);
        if start >= end {
            continue;
        }
        for y in 0..nx {
            let row = &printed[y * nx..(y + 1) * nx];
            if !row[start..end].iter().any(|&p| p) {
                return Printability::Open;
            }
        }
    }
    Printability::Pass
}
