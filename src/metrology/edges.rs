// SPDX-License-Identifier: AGPL-3.0-only

//! Sub-pixel edge extraction and the scalar dimensions built on it.
//!
//! Edges are threshold crossings of a 1-D continuous profile (a row or
//! column of clear depth or aerial intensity). Crossings between adjacent
//! samples are located by linear interpolation; a profile that never
//! crosses yields an empty set, not an error.

/// Find all sub-pixel threshold crossings of a profile, in index order.
///
/// A strict sign change between `profile[i]` and `profile[i+1]` places an
/// edge at `i + (threshold − p[i]) / (p[i+1] − p[i])`. A sample exactly at
/// threshold is attributed to the lower index: the edge lands on `i`
/// itself and the pair `(i−1, i)` contributes nothing. Polarity is not
/// classified; callers needing rising/falling inspect `p[i+1] − p[i]`.
#[must_use]
pub fn find_subpixel_edges(profile: &[f64], threshold: f64) -> Vec<f64> {
    let mut edges = Vec::new();
    for i in 0..profile.len().saturating_sub(1) {
        let lo = profile[i] - threshold;
        let hi = profile[i + 1] - threshold;
        if lo == 0.0 {
            // Exactly-at-sample crossing belongs to the lower index; a
            // flat plateau at threshold contributes only its first sample.
            if hi != 0.0 {
                edges.push(i as f64);
            }
        } else if lo * hi < 0.0 {
            edges.push(i as f64 + (threshold - profile[i]) / (profile[i + 1] - profile[i]));
        }
    }
    edges
}

/// Critical dimension: distance between the first left/right edge pair.
///
/// `None` when fewer than two edges exist — a missing metric, reported as
/// such so sweeps can distinguish "no data" from a computed zero.
#[must_use]
pub fn compute_cd(edges: &[f64]) -> Option<f64> {
    if edges.len() < 2 {
        return None;
    }
    Some(edges[1] - edges[0])
}

/// Edge placement error: signed distance of an edge from its design target.
#[must_use]
pub fn compute_epe(edge: f64, target: f64) -> f64 {
    edge - target
}
